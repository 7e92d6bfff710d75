//! Shared traits.
//!
//! [`ConfigManager`] gives any serde-backed configuration struct a uniform
//! way to locate, load, and render its TOML file. Resolution order for the
//! config file path:
//!
//! 1. An explicit path (e.g. a `--config` flag)
//! 2. The `<PROJECT>_CONFIG` environment variable
//! 3. `<platform config dir>/<project>/config.toml`
//!
//! A missing file is not an error: defaults are used.

use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// TOML-backed configuration with path resolution and defaults.
pub trait ConfigManager: Serialize + DeserializeOwned + Default {
    /// Project name used for the config directory and env var prefix.
    fn project_name() -> &'static str;

    /// Name of the environment variable holding an explicit config path.
    fn env_var_name() -> String {
        format!(
            "{}_CONFIG",
            Self::project_name().to_uppercase().replace(['-', ' '], "_")
        )
    }

    /// Default config file location for this platform.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// Resolve the config path: explicit > env var > platform default.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(Self::env_var_name())
            && !path.trim().is_empty()
        {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Load configuration, falling back to defaults when no file exists.
    fn load(explicit: Option<&str>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit) else {
            log::debug!("No config directory for this platform; using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            log::debug!("Config file {} not found; using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
        let config = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Render the configuration as pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}
