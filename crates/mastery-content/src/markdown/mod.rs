//! Markdown front end: frontmatter, blocks, and the section tree.
//!
//! - [`frontmatter`]: `---` delimited `key: value` metadata
//! - [`blocks`]: top-level block tokenization with raw source slices
//! - [`sections`]: heading hierarchy and section classification
//! - [`helpers`]: label, list, and quote utilities
//!
//! These stages know nothing about lessons; the extractor turns their output
//! into [`ParsedLessonData`](crate::model::ParsedLessonData).

pub mod blocks;
pub mod frontmatter;
pub mod helpers;
pub mod sections;

// Re-export key types and functions
pub use blocks::{Block, BlockKind, tokenize};
pub use frontmatter::{
    Frontmatter, FrontmatterResult, FrontmatterValue, extract_frontmatter, strip_frontmatter,
};
pub use helpers::{labeled_value, parse_comma_list};
pub use sections::{Section, SectionId, SectionTree, SectionType, classify_section};
