//! Import and validation diagnostics.
//!
//! Problems found in lesson content are data, not `Err` values: they are
//! collected while compiling and returned alongside the (possibly absent)
//! structured lesson.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a fatal problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The document could not be read as a lesson at all.
    Parsing,
    /// A value violates a lesson rule.
    Validation,
}

/// Category of a non-fatal problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Missing or thin lesson content.
    Content,
    /// Missing or suspicious metadata.
    Metadata,
    /// Markup that was not understood.
    Format,
}

/// A problem that prevents the lesson from being imported.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// A problem worth reporting that does not block import.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportWarning {
    pub kind: WarningKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(f, "[{section}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Errors and warnings collected during a pass over a lesson.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub errors: Vec<ImportError>,
    pub warnings: Vec<ImportWarning>,
}

impl Diagnostics {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fatal problem.
    pub fn error(&mut self, kind: ErrorKind, message: impl Into<String>, field: Option<&str>) {
        let message = message.into();
        log::debug!("import error: {message}");
        self.errors.push(ImportError {
            kind,
            message,
            field: field.map(str::to_string),
        });
    }

    /// Record a non-fatal problem.
    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>, section: Option<&str>) {
        let message = message.into();
        log::debug!("import warning: {message}");
        self.warnings.push(ImportWarning {
            kind,
            message,
            section: section.map(str::to_string),
        });
    }

    /// Whether no errors were recorded.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether neither errors nor warnings were recorded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_and_display() {
        let mut diags = Diagnostics::new();
        assert!(diags.is_clean());

        diags.warn(WarningKind::Content, "no questions", Some("Exercise 1"));
        assert!(diags.is_ok());
        assert!(!diags.is_clean());
        assert_eq!(diags.warnings[0].to_string(), "[Exercise 1] no questions");

        diags.error(ErrorKind::Validation, "out of range", Some("masteryThreshold"));
        assert!(!diags.is_ok());
        assert_eq!(diags.errors[0].to_string(), "masteryThreshold: out of range");
    }

    #[test]
    fn test_kinds_serialize_snake_case() {
        let json = serde_json::to_string(&ErrorKind::Parsing).unwrap();
        assert_eq!(json, "\"parsing\"");
        let json = serde_json::to_string(&WarningKind::Metadata).unwrap();
        assert_eq!(json, "\"metadata\"");
    }
}
