//! Block-level tokenization.
//!
//! Splits a markdown body into top-level blocks using `pulldown-cmark`,
//! keeping each block's raw source slice so later stages can re-read the
//! author's exact text (question markers, check-mark glyphs, label lines)
//! without fighting the inline event stream.
//!
//! ```rust
//! use mastery_content::markdown::blocks::{tokenize, BlockKind};
//!
//! let blocks = tokenize("# Title\n\nIntro text.\n\n- one\n- two\n");
//! assert_eq!(blocks.len(), 3);
//! assert_eq!(blocks[0].kind, BlockKind::Heading);
//! assert_eq!(blocks[0].level, Some(1));
//! assert_eq!(blocks[0].text, "Title");
//! assert_eq!(blocks[2].kind, BlockKind::List);
//! assert!(blocks[2].raw.contains("- two"));
//! ```

use pulldown_cmark::{Event, Options, Parser, Tag};

/// Kind of top-level block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Paragraph,
    List,
    Table,
    Code,
    Quote,
    Rule,
    Html,
    /// Anything else (footnote definitions, metadata blocks).
    Other,
}

/// A top-level markdown block.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// What kind of block this is.
    pub kind: BlockKind,
    /// Heading level (1-6); `None` for non-headings.
    pub level: Option<u8>,
    /// Plain heading text with inline formatting stripped; empty for
    /// non-headings.
    pub text: String,
    /// Exact source slice, trailing whitespace removed.
    pub raw: String,
}

impl Block {
    /// Whether this block is a heading.
    pub fn is_heading(&self) -> bool {
        self.kind == BlockKind::Heading
    }
}

/// Tokenize markdown into top-level blocks in document order.
pub fn tokenize(markdown: &str) -> Vec<Block> {
    let parser = Parser::new_ext(
        markdown,
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
    );

    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut current: Option<(BlockKind, Option<u8>, usize)> = None;
    let mut heading_text = String::new();

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    let (kind, level) = classify_tag(&tag);
                    current = Some((kind, level, range.start));
                    heading_text.clear();
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0
                    && let Some((kind, level, start)) = current.take()
                {
                    let end = range.end.max(start);
                    blocks.push(Block {
                        kind,
                        level,
                        text: if kind == BlockKind::Heading {
                            heading_text.trim().to_string()
                        } else {
                            String::new()
                        },
                        raw: markdown[start..end].trim_end().to_string(),
                    });
                }
            }
            Event::Text(text) | Event::Code(text) if depth > 0 => {
                if matches!(current, Some((BlockKind::Heading, _, _))) {
                    heading_text.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak if depth > 0 => {
                if matches!(current, Some((BlockKind::Heading, _, _))) {
                    heading_text.push(' ');
                }
            }
            Event::Rule if depth == 0 => {
                blocks.push(Block {
                    kind: BlockKind::Rule,
                    level: None,
                    text: String::new(),
                    raw: markdown[range].trim_end().to_string(),
                });
            }
            _ => {}
        }
    }

    blocks
}

fn classify_tag(tag: &Tag<'_>) -> (BlockKind, Option<u8>) {
    match tag {
        Tag::Heading { level, .. } => (BlockKind::Heading, Some(*level as u8)),
        Tag::Paragraph => (BlockKind::Paragraph, None),
        Tag::List(_) => (BlockKind::List, None),
        Tag::Table(_) => (BlockKind::Table, None),
        Tag::CodeBlock(_) => (BlockKind::Code, None),
        Tag::BlockQuote(_) => (BlockKind::Quote, None),
        Tag::HtmlBlock => (BlockKind::Html, None),
        _ => (BlockKind::Other, None),
    }
}
