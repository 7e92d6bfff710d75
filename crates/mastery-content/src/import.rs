//! Lesson import pipeline.
//!
//! [`import_lesson`] runs the full compiler over one markdown document:
//! frontmatter, block tokenization, section tree, then extraction. It never
//! returns `Err`; content problems come back as diagnostics and `success`
//! is true exactly when no errors were recorded.
//!
//! [`import_batch`] runs the same pipeline over many documents and
//! aggregates the results. One document failing does not affect the others.
//!
//! ```rust
//! use mastery_content::{import_lesson, ImportOptions};
//!
//! let result = import_lesson("# Nouns\n\n## Key Concepts\n\nA noun names a thing.\n", &ImportOptions::default());
//! assert!(result.is_success());
//! assert_eq!(result.data().unwrap().metadata.title, "Nouns");
//! ```

use crate::diagnostics::{Diagnostics, ErrorKind, ImportError, ImportWarning};
use crate::extractor::{extract_lesson, title_section};
use crate::markdown::blocks::tokenize;
use crate::markdown::frontmatter::extract_frontmatter;
use crate::markdown::sections::SectionTree;
use crate::model::{
    DEFAULT_ESTIMATED_MINUTES, DEFAULT_MASTERY_THRESHOLD, Difficulty, ParsedLessonData,
};
use serde::{Deserialize, Serialize};

/// Defaults and strictness for import.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Difficulty used when none is given.
    pub default_difficulty: Difficulty,
    /// Estimated minutes used when none are given.
    pub default_estimated_minutes: u32,
    /// Mastery threshold used when none is given.
    pub default_mastery_threshold: f64,
    /// Treat any warning as an import failure.
    pub fail_on_warnings: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            default_difficulty: Difficulty::default(),
            default_estimated_minutes: DEFAULT_ESTIMATED_MINUTES,
            default_mastery_threshold: DEFAULT_MASTERY_THRESHOLD,
            fail_on_warnings: false,
        }
    }
}

/// Outcome of importing one document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImportResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<ParsedLessonData>,
    errors: Vec<ImportError>,
    warnings: Vec<ImportWarning>,
}

impl ImportResult {
    /// Build a result; data is kept only when there are no errors.
    fn from_parts(data: Option<ParsedLessonData>, diags: Diagnostics) -> Self {
        let success = diags.errors.is_empty();
        Self {
            success,
            data: if success { data } else { None },
            errors: diags.errors,
            warnings: diags.warnings,
        }
    }

    /// Whether the document imported without errors.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The structured lesson, present exactly when [`is_success`](Self::is_success).
    pub fn data(&self) -> Option<&ParsedLessonData> {
        self.data.as_ref()
    }

    /// Take the structured lesson.
    pub fn into_data(self) -> Option<ParsedLessonData> {
        self.data
    }

    /// Fatal problems.
    pub fn errors(&self) -> &[ImportError] {
        &self.errors
    }

    /// Non-fatal problems.
    pub fn warnings(&self) -> &[ImportWarning] {
        &self.warnings
    }
}

/// Import a single lesson document.
pub fn import_lesson(raw: &str, options: &ImportOptions) -> ImportResult {
    let mut diags = Diagnostics::new();

    if raw.trim().is_empty() {
        diags.error(ErrorKind::Parsing, "Document is empty", None);
        return ImportResult::from_parts(None, diags);
    }

    let fm = extract_frontmatter(raw);
    let blocks = tokenize(fm.body());
    let fm_empty = fm.frontmatter().is_none_or(|f| f.is_empty());
    if blocks.is_empty() && fm_empty {
        diags.error(
            ErrorKind::Parsing,
            "Document contains no lesson content",
            None,
        );
        return ImportResult::from_parts(None, diags);
    }

    let mut tree = SectionTree::from_blocks(&blocks);
    if let Some(id) = title_section(fm.frontmatter(), &tree) {
        tree.mark_unclassified(id);
    }
    log::debug!(
        "Parsed {} blocks into {} sections",
        blocks.len(),
        tree.len()
    );

    let data = extract_lesson(fm.frontmatter(), &tree, options, &mut diags);

    if options.fail_on_warnings && !diags.warnings.is_empty() {
        let count = diags.warnings.len();
        diags.error(
            ErrorKind::Validation,
            format!("{count} warning(s) treated as errors"),
            None,
        );
    }

    if diags.is_ok() {
        log::debug!(
            "Imported lesson '{}' ({} exercises, {} assessments, {} warnings)",
            data.metadata.title,
            data.exercises.len(),
            data.assessments.len(),
            diags.warnings.len()
        );
    } else {
        log::warn!("Lesson import failed with {} error(s)", diags.errors.len());
    }

    ImportResult::from_parts(Some(data), diags)
}

// ============================================================================
// Batch import
// ============================================================================

/// One document's outcome within a batch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchEntry {
    /// Caller-supplied document name (usually a file path).
    pub name: String,
    /// The import outcome.
    pub result: ImportResult,
}

/// Aggregated outcome of a batch import.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BatchImportReport {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
    pub entries: Vec<BatchEntry>,
}

impl BatchImportReport {
    /// Successful lessons ordered by unit then lesson number.
    ///
    /// Lessons without numbers sort after numbered ones; ties keep input
    /// order.
    pub fn lessons_in_dependency_order(&self) -> Vec<(&str, &ParsedLessonData)> {
        let mut lessons: Vec<_> = self
            .entries
            .iter()
            .filter_map(|e| e.result.data().map(|d| (e.name.as_str(), d)))
            .collect();
        lessons.sort_by_key(|(_, d)| {
            (
                d.metadata.unit_number.unwrap_or(u32::MAX),
                d.metadata.lesson_number.unwrap_or(u32::MAX),
            )
        });
        lessons
    }

    /// Entries that failed to import.
    pub fn failures(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().filter(|e| !e.result.is_success())
    }
}

/// Import many documents independently.
///
/// `documents` yields `(name, markdown)` pairs.
pub fn import_batch<I, N, S>(documents: I, options: &ImportOptions) -> BatchImportReport
where
    I: IntoIterator<Item = (N, S)>,
    N: Into<String>,
    S: AsRef<str>,
{
    let mut report = BatchImportReport::default();

    for (name, raw) in documents {
        let name = name.into();
        let result = import_lesson(raw.as_ref(), options);
        if result.is_success() {
            report.successful += 1;
        } else {
            log::warn!("Failed to import {name}");
            report.failed += 1;
        }
        report.total_files += 1;
        report.entries.push(BatchEntry { name, result });
    }

    log::info!(
        "Batch import: {} total, {} successful, {} failed",
        report.total_files,
        report.successful,
        report.failed
    );
    report
}
