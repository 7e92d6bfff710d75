//! Section tree construction and classification.
//!
//! Headings split a lesson body into sections. Each section owns the blocks
//! between its heading and the next heading, and sits under the nearest
//! preceding heading with a strictly lower level. Sections are stored in an
//! arena in document order and refer to each other by [`SectionId`].
//!
//! Titles are classified into a [`SectionType`] by an ordered list of
//! anchored patterns with a substring fallback; the first match wins.
//!
//! ```rust
//! use mastery_content::markdown::sections::{classify_section, SectionType};
//!
//! assert_eq!(classify_section("Lesson Overview"), SectionType::Overview);
//! assert_eq!(classify_section("Quiz: Nouns"), SectionType::Assessment);
//! assert_eq!(classify_section("Worked Example"), SectionType::Unclassified);
//! ```

use super::blocks::Block;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Index of a section within a [`SectionTree`].
pub type SectionId = usize;

/// What role a section plays in a lesson.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Overview,
    Assessment,
    Content,
    Exercise,
    Enrichment,
    Notes,
    /// No pattern matched.
    #[serde(rename = "none")]
    Unclassified,
}

impl SectionType {
    /// Returns the type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Assessment => "assessment",
            Self::Content => "content",
            Self::Exercise => "exercise",
            Self::Enrichment => "enrichment",
            Self::Notes => "notes",
            Self::Unclassified => "none",
        }
    }
}

static PRIMARY_RULES: LazyLock<Vec<(Regex, SectionType)>> = LazyLock::new(|| {
    [
        (
            r"^(lesson\s+)?(overview|introduction)\b|^learning\s+objectives\b",
            SectionType::Overview,
        ),
        (
            r"^(exercise|practice|activity|activities|worksheet)\b|^(guided|independent)\s+practice\b",
            SectionType::Exercise,
        ),
        (
            r"^(assessment|quiz|test|exit\s+ticket|mastery\s+check)\b|^check\s+(for|your)\s+understanding\b",
            SectionType::Assessment,
        ),
        (
            r"^(enrichment|extension|challenge|going\s+further)\b",
            SectionType::Enrichment,
        ),
        (
            r"^((teacher|instructor)'?s?\s+)?notes?\b",
            SectionType::Notes,
        ),
        (
            r"^(key\s+)?(concepts?|content|instruction|explanation|vocabulary)\b|^(lesson|direct)\s+(content|instruction)\b",
            SectionType::Content,
        ),
    ]
    .into_iter()
    .map(|(pattern, ty)| {
        let re = Regex::new(&format!("(?i){pattern}")).expect("valid section pattern");
        (re, ty)
    })
    .collect()
});

const FALLBACK_RULES: [(&str, SectionType); 6] = [
    ("overview", SectionType::Overview),
    ("exercise", SectionType::Exercise),
    ("assessment", SectionType::Assessment),
    ("concept", SectionType::Content),
    ("enrichment", SectionType::Enrichment),
    ("note", SectionType::Notes),
];

/// Classify a section title.
///
/// Tries the anchored patterns first, then case-insensitive substring
/// fallbacks, and returns [`SectionType::Unclassified`] when nothing matches.
pub fn classify_section(title: &str) -> SectionType {
    let title = title.trim();
    if let Some((_, ty)) = PRIMARY_RULES.iter().find(|(re, _)| re.is_match(title)) {
        return *ty;
    }
    let lower = title.to_lowercase();
    FALLBACK_RULES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, ty)| *ty)
        .unwrap_or(SectionType::Unclassified)
}

/// A heading and the content directly under it.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    /// Heading text.
    pub title: String,
    /// Heading level, 1-6.
    pub level: u8,
    /// Classification of the title.
    pub section_type: SectionType,
    /// Raw markdown of the blocks between this heading and the next heading
    /// of any level.
    pub raw_content: String,
    /// Parent section, if any.
    pub parent: Option<SectionId>,
    /// Child sections in document order.
    pub children: Vec<SectionId>,
}

/// Sections of a lesson body arranged by heading level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectionTree {
    sections: Vec<Section>,
    roots: Vec<SectionId>,
    preamble: String,
}

impl SectionTree {
    /// Build the tree from tokenized blocks.
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let mut tree = SectionTree::default();
        let mut stack: Vec<SectionId> = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for block in blocks {
            let Some(level) = block.level.filter(|_| block.is_heading()) else {
                pending.push(&block.raw);
                continue;
            };

            tree.flush(stack.last().copied(), &mut pending);

            while let Some(&top) = stack.last() {
                if tree.sections[top].level >= level {
                    stack.pop();
                } else {
                    break;
                }
            }

            let id = tree.sections.len();
            let parent = stack.last().copied();
            tree.sections.push(Section {
                title: block.text.clone(),
                level,
                section_type: classify_section(&block.text),
                raw_content: String::new(),
                parent,
                children: Vec::new(),
            });
            match parent {
                Some(p) => tree.sections[p].children.push(id),
                None => tree.roots.push(id),
            }
            stack.push(id);
        }

        tree.flush(stack.last().copied(), &mut pending);
        tree
    }

    fn flush(&mut self, owner: Option<SectionId>, pending: &mut Vec<&str>) {
        if pending.is_empty() {
            return;
        }
        let text = pending.join("\n\n");
        pending.clear();
        match owner {
            Some(id) => self.sections[id].raw_content = text,
            None => self.preamble = text,
        }
    }

    /// All sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Ids of top-level sections.
    pub fn roots(&self) -> &[SectionId] {
        &self.roots
    }

    /// Look up a section.
    pub fn get(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id)
    }

    /// Content before the first heading.
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the body had no headings.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Drop a section's classification so extraction treats it as plain
    /// structure. Used for the heading that carries the lesson title.
    pub fn mark_unclassified(&mut self, id: SectionId) {
        if let Some(section) = self.sections.get_mut(id) {
            section.section_type = SectionType::Unclassified;
        }
    }

    /// Ids of sections with the given type, in document order.
    pub fn of_type(&self, section_type: SectionType) -> impl Iterator<Item = SectionId> + '_ {
        self.sections
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.section_type == section_type)
            .map(|(id, _)| id)
    }

    /// A section's own content followed by every unclassified descendant,
    /// each rendered with its heading.
    ///
    /// Typed descendants are skipped since they are extracted in their own
    /// right.
    pub fn body_with_untyped_descendants(&self, id: SectionId) -> String {
        let mut parts = Vec::new();
        self.collect_body(id, &mut parts);
        parts.join("\n\n")
    }

    fn collect_body(&self, id: SectionId, parts: &mut Vec<String>) {
        let Some(section) = self.sections.get(id) else {
            return;
        };
        if !section.raw_content.is_empty() {
            parts.push(section.raw_content.clone());
        }
        for &child in &section.children {
            let Some(child_section) = self.sections.get(child) else {
                continue;
            };
            if child_section.section_type == SectionType::Unclassified {
                parts.push(format!(
                    "{} {}",
                    "#".repeat(child_section.level as usize),
                    child_section.title
                ));
                self.collect_body(child, parts);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
