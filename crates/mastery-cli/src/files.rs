//! Input file discovery and loading.

use mastery_core::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Expand files and directories into a sorted list of markdown files.
///
/// Directories are searched recursively for `*.md`. Files are taken as-is
/// whatever their extension.
pub fn discover_markdown(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let pattern = path.join("**").join("*.md");
            let pattern = pattern.to_string_lossy();
            let entries = glob::glob(&pattern)
                .map_err(|e| Error::parse(format!("Invalid search pattern {pattern}: {e}")))?;
            for entry in entries {
                match entry {
                    Ok(file) if file.is_file() => files.push(file),
                    Ok(_) => {}
                    Err(e) => log::warn!("Skipping unreadable entry: {e}"),
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(Error::not_found("path", path.display().to_string()));
        }
    }

    files.sort();
    files.dedup();
    log::debug!("Discovered {} markdown files", files.len());
    Ok(files)
}

/// Read a UTF-8 file.
pub async fn read_to_string(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))
}

/// Read and deserialize a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_to_string(path).await?;
    serde_json::from_str(&text)
        .map_err(|e| Error::parse(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_markdown_recurses_and_sorts() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("unit-2");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("b.md"), "# B").unwrap();
        std::fs::write(dir.path().join("a.md"), "# A").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        std::fs::write(nested.join("c.md"), "# C").unwrap();

        let files = discover_markdown(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md", "unit-2/c.md"]);
    }

    #[test]
    fn test_discover_markdown_dedups_explicit_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("lesson.md");
        std::fs::write(&file, "# L").unwrap();

        let files = discover_markdown(&[file.clone(), dir.path().to_path_buf()]).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_discover_markdown_missing_path() {
        let err = discover_markdown(&[PathBuf::from("/definitely/not/here")]).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_load_json_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_json::<serde_json::Value>(&path).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("bad.json"));
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let err = read_to_string(Path::new("/definitely/not/here.md"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
