//! Handler functions for config CLI commands.
//!
//! Implements the `path`, `get`, and `init` subcommands, parameterized over
//! any type implementing [`ConfigManager`].

use crate::cli::ConfigAction;
use crate::config::MasteryConfig;
use mastery_core::traits::ConfigManager;
use mastery_core::{Error, Result};
use std::path::PathBuf;

// ============================================================================
// Command dispatch
// ============================================================================

/// Handle a config subcommand using [`MasteryConfig`].
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path::<MasteryConfig>(config_path),
        ConfigAction::Get { key } => {
            let value = cmd_config_get::<MasteryConfig>(config_path, &key)?;
            println!("{value}");
            Ok(())
        }
        ConfigAction::Init { file, force } => {
            let path = cmd_config_init::<MasteryConfig>(file.as_deref(), force)?;
            println!("Config file created at {}", path.display());
            Ok(())
        }
    }
}

// ============================================================================
// Generic command handlers
// ============================================================================

/// Show the resolved config file path.
pub fn cmd_config_path<C: ConfigManager>(config_path: Option<&str>) -> Result<()> {
    match C::resolve_config_path(config_path) {
        Some(path) => {
            println!("{}", path.display());
            if !path.exists() {
                eprintln!(
                    "(file does not exist; run `{} config init` to create it)",
                    C::project_name()
                );
            }
            Ok(())
        }
        None => Err(Error::config(
            "Could not determine config directory for this platform",
        )),
    }
}

/// Look up a configuration value by dotted key, formatted for display.
pub fn cmd_config_get<C: ConfigManager>(config_path: Option<&str>, key: &str) -> Result<String> {
    let config = C::load(config_path)?;
    let value = toml::Value::try_from(&config).map_err(|e| Error::config(e.to_string()))?;
    get_nested_value(&value, key)
        .map(format_toml_value)
        .ok_or_else(|| Error::config(format!("Key '{key}' not found in configuration")))
}

/// Create a default configuration file and return its path.
pub fn cmd_config_init<C: ConfigManager>(file: Option<&str>, force: bool) -> Result<PathBuf> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => C::default_config_path()
            .ok_or_else(|| Error::config("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let toml_str = C::default().to_toml_string()?;
    std::fs::write(&path, &toml_str).map_err(|e| Error::io_with_path(e, &path))?;
    log::debug!("Wrote default config to {}", path.display());
    Ok(path)
}

// ============================================================================
// TOML dotted-key helpers
// ============================================================================

/// Navigate a dotted key path in a TOML value tree.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    let mut current = value;
    for part in key.split('.') {
        current = current.as_table()?.get(part)?;
    }
    Some(current)
}

/// Format a TOML value for display on stdout.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_default(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, MasteryConfig::default().to_toml_string().unwrap()).unwrap();
        path
    }

    // ------------------------------------------------------------------------
    // cmd_config_path tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_path_explicit() {
        let result = cmd_config_path::<MasteryConfig>(Some("/explicit/config.toml"));
        assert!(result.is_ok());
    }

    // ------------------------------------------------------------------------
    // cmd_config_get tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_get_nested_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        let value =
            cmd_config_get::<MasteryConfig>(path.to_str(), "import.default_estimated_minutes")
                .unwrap();
        assert_eq!(value, "30");
        let value = cmd_config_get::<MasteryConfig>(path.to_str(), "logging.level").unwrap();
        assert_eq!(value, "info");
    }

    #[test]
    fn test_cmd_config_get_missing_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        let err = cmd_config_get::<MasteryConfig>(path.to_str(), "import.nope").unwrap_err();
        assert!(err.to_string().contains("import.nope"));
    }

    #[test]
    fn test_cmd_config_get_table() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        let value = cmd_config_get::<MasteryConfig>(path.to_str(), "resolver").unwrap();
        assert!(value.contains("recommendation_limit = 5"));
    }

    // ------------------------------------------------------------------------
    // cmd_config_init tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_init_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let written = cmd_config_init::<MasteryConfig>(path.to_str(), false).unwrap();
        assert_eq!(written, path);

        let loaded = MasteryConfig::load(path.to_str()).unwrap();
        assert_eq!(loaded, MasteryConfig::default());
    }

    #[test]
    fn test_cmd_config_init_refuses_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        assert!(cmd_config_init::<MasteryConfig>(path.to_str(), false).is_err());
        assert!(cmd_config_init::<MasteryConfig>(path.to_str(), true).is_ok());
    }

    // ------------------------------------------------------------------------
    // Helper tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_get_nested_value() {
        let value: toml::Value = toml::from_str("[a]\nb = { c = 1 }\n").unwrap();
        assert_eq!(
            get_nested_value(&value, "a.b.c").and_then(|v| v.as_integer()),
            Some(1)
        );
        assert!(get_nested_value(&value, "a.x").is_none());
    }

    #[test]
    fn test_format_toml_value() {
        assert_eq!(format_toml_value(&toml::Value::Boolean(true)), "true");
        assert_eq!(format_toml_value(&toml::Value::String("x".into())), "x");
        assert_eq!(format_toml_value(&toml::Value::Float(0.8)), "0.8");
    }
}
