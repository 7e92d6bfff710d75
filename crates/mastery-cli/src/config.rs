//! Configuration for the `mastery` binary.
//!
//! Loaded from TOML through [`ConfigManager`]; every table and field is
//! optional.
//!
//! ```toml
//! [import]
//! default_difficulty = "beginner"
//! default_estimated_minutes = 30
//! default_mastery_threshold = 0.8
//! fail_on_warnings = false
//!
//! [export]
//! include_metadata = true
//! include_exercises = true
//! include_assessments = true
//! format = "markdown"
//!
//! [resolver]
//! recommendation_limit = 5
//! sequential_lessons = false
//!
//! [logging]
//! level = "info"
//! ```

use mastery_content::{ExportOptions, ImportOptions};
use mastery_core::ConfigManager;
use mastery_graph::ResolverOptions;
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasteryConfig {
    /// Defaults and strictness for lesson import.
    pub import: ImportOptions,
    /// What `export` renders unless overridden by flags.
    pub export: ExportOptions,
    /// Learning path and recommendation tuning.
    pub resolver: ResolverOptions,
    /// Log output.
    pub logging: LoggingConfig,
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base filter level (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ConfigManager for MasteryConfig {
    fn project_name() -> &'static str {
        "mastery"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mastery_content::{Difficulty, ExportFormat};

    #[test]
    fn test_env_var_name() {
        assert_eq!(MasteryConfig::env_var_name(), "MASTERY_CONFIG");
    }

    #[test]
    fn test_defaults() {
        let config = MasteryConfig::default();
        assert_eq!(config.import.default_estimated_minutes, 30);
        assert_eq!(config.import.default_difficulty, Difficulty::Beginner);
        assert!(config.export.include_metadata);
        assert_eq!(config.resolver.recommendation_limit, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[import]\nfail_on_warnings = true\ndefault_difficulty = \"advanced\"\n\n[export]\nformat = \"json\"\n\n[resolver]\nsequential_lessons = true\n",
        )
        .unwrap();

        let config = MasteryConfig::load(path.to_str()).unwrap();
        assert!(config.import.fail_on_warnings);
        assert_eq!(config.import.default_difficulty, Difficulty::Advanced);
        assert_eq!(config.import.default_mastery_threshold, 0.8);
        assert_eq!(config.export.format, ExportFormat::Json);
        assert!(config.export.include_exercises);
        assert!(config.resolver.sequential_lessons);
        assert_eq!(config.resolver.recommendation_limit, 5);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = MasteryConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[import]"));
        assert!(text.contains("[logging]"));
        let parsed: MasteryConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
