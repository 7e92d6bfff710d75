//! Lesson markdown compiler for Mastery.
//!
//! Turns semi-structured lesson markdown into [`ParsedLessonData`] and back.
//!
//! # Modules
//!
//! - [`markdown`]: frontmatter, block tokenizer, section tree
//! - [`model`]: the structured lesson types
//! - [`import`]: single and batch import with diagnostics
//! - [`validator`]: structural checks over parsed lessons
//! - [`exporter`]: markdown and JSON rendering
//!
//! # Example
//!
//! ```rust
//! use mastery_content::{export_lesson, import_lesson, ExportOptions, ImportOptions};
//!
//! let source = "---\ntitle: Nouns\n---\n\n## Key Concepts\n\nA noun names a thing.\n";
//! let result = import_lesson(source, &ImportOptions::default());
//! let lesson = result.into_data().unwrap();
//! assert_eq!(lesson.metadata.title, "Nouns");
//!
//! let markdown = export_lesson(&lesson, &ExportOptions::default()).unwrap();
//! let again = import_lesson(&markdown, &ImportOptions::default()).into_data().unwrap();
//! assert_eq!(again.content, lesson.content);
//! ```

pub mod diagnostics;
pub mod exporter;
mod extractor;
pub mod import;
pub mod markdown;
pub mod model;
pub mod questions;
pub mod validator;

// Re-export commonly used types
pub use diagnostics::{Diagnostics, ErrorKind, ImportError, ImportWarning, WarningKind};
pub use exporter::{ExportFormat, ExportOptions, export_lesson, render_markdown};
pub use import::{
    BatchEntry, BatchImportReport, ImportOptions, ImportResult, import_batch, import_lesson,
};
pub use model::{
    Assessment, AssessmentType, CorrectAnswer, Difficulty, Exercise, ExerciseType,
    LessonMetadata, Objective, ObjectiveCategory, ParsedLessonData, Question, QuestionKind,
    QuestionType,
};
pub use validator::validate_lesson;
