//! Mastery Core: shared errors, identifiers, and configuration traits.
//!
//! This crate has no internal Mastery dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`traits`]: The [`ConfigManager`] trait for TOML-backed configuration
//! - [`util`]: ID utilities

pub mod error;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use traits::ConfigManager;

// Convenience re-exports from util
pub use util::ids::normalize_id;
