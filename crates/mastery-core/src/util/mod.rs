//! Utility modules shared across Mastery crates.
//!
//! # Modules
//!
//! - [`ids`]: ID normalization and computation

pub mod ids;
