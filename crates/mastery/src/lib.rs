//! Mastery learning content platform: umbrella crate.
//!
//! This crate re-exports all Mastery components for convenience.
//! Use feature flags to enable specific functionality.

#![doc = include_str!("../README.md")]

pub use mastery_content as content;
pub use mastery_core as core;

#[cfg(feature = "graph")]
pub use mastery_graph as graph;
