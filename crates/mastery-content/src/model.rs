//! Structured lesson model.
//!
//! These are the types the compiler produces from lesson markdown and the
//! renderer consumes to write it back out. They serialize to camelCase JSON
//! for the persistence and API layers.

use mastery_core::normalize_id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Title used when neither frontmatter nor a top-level heading provides one.
pub const DEFAULT_TITLE: &str = "Untitled Lesson";

/// Default estimated lesson length in minutes.
pub const DEFAULT_ESTIMATED_MINUTES: u32 = 30;

/// Default fraction of correct work required for mastery.
pub const DEFAULT_MASTERY_THRESHOLD: f64 = 0.8;

// ============================================================================
// Metadata
// ============================================================================

/// Lesson difficulty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Introductory material (the default).
    #[default]
    Beginner,
    /// Builds on prior lessons.
    Intermediate,
    /// Extension-level material.
    Advanced,
}

impl Difficulty {
    /// Returns the difficulty name as written in lesson files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse a difficulty label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "beginner" | "easy" | "basic" => Some(Self::Beginner),
            "intermediate" | "medium" => Some(Self::Intermediate),
            "advanced" | "hard" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Lesson-level metadata, each field carrying a documented default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonMetadata {
    /// Lesson title. Defaults to [`DEFAULT_TITLE`] during import.
    pub title: String,
    /// Short summary. Defaults to empty.
    pub description: String,
    /// Defaults to [`Difficulty::Beginner`].
    pub difficulty: Difficulty,
    /// Defaults to [`DEFAULT_ESTIMATED_MINUTES`].
    pub estimated_minutes: u32,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Ids of content that must be mastered first.
    pub prerequisites: Vec<String>,
    /// Fraction in `[0, 1]`. Defaults to [`DEFAULT_MASTERY_THRESHOLD`].
    pub mastery_threshold: f64,
    /// Unit number from frontmatter or a `Unit N, Lesson M:` title prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<u32>,
    /// Lesson number from frontmatter or a `Unit N, Lesson M:` title prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_number: Option<u32>,
}

impl Default for LessonMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            difficulty: Difficulty::default(),
            estimated_minutes: DEFAULT_ESTIMATED_MINUTES,
            tags: Vec::new(),
            prerequisites: Vec::new(),
            mastery_threshold: DEFAULT_MASTERY_THRESHOLD,
            unit_number: None,
            lesson_number: None,
        }
    }
}

// ============================================================================
// Objectives
// ============================================================================

/// Bloom-style objective category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveCategory {
    Knowledge,
    Comprehension,
    #[default]
    Application,
    Analysis,
    Synthesis,
    Evaluation,
}

impl ObjectiveCategory {
    /// Returns the category name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Knowledge => "knowledge",
            Self::Comprehension => "comprehension",
            Self::Application => "application",
            Self::Analysis => "analysis",
            Self::Synthesis => "synthesis",
            Self::Evaluation => "evaluation",
        }
    }

    /// Parse a category label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "knowledge" | "remember" => Some(Self::Knowledge),
            "comprehension" | "understand" => Some(Self::Comprehension),
            "application" | "apply" => Some(Self::Application),
            "analysis" | "analyze" => Some(Self::Analysis),
            "synthesis" | "create" => Some(Self::Synthesis),
            "evaluation" | "evaluate" => Some(Self::Evaluation),
            _ => None,
        }
    }
}

/// A single learning objective.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub description: String,
    #[serde(default)]
    pub category: ObjectiveCategory,
}

impl Objective {
    /// Creates an objective with the default category.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            category: ObjectiveCategory::default(),
        }
    }
}

// ============================================================================
// Questions
// ============================================================================

/// The five supported question types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    FillInBlank,
    DragAndDrop,
    SentenceBuilder,
    Essay,
}

impl QuestionType {
    /// Returns the snake_case type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::FillInBlank => "fill_in_blank",
            Self::DragAndDrop => "drag_and_drop",
            Self::SentenceBuilder => "sentence_builder",
            Self::Essay => "essay",
        }
    }

    /// Parse a type label, accepting `_`, `-` or space separators.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "multiple_choice" | "mc" => Some(Self::MultipleChoice),
            "fill_in_blank" | "fill_in_the_blank" | "fill_blank" => Some(Self::FillInBlank),
            "drag_and_drop" | "drag_drop" | "matching" => Some(Self::DragAndDrop),
            "sentence_builder" | "sentence_building" => Some(Self::SentenceBuilder),
            "essay" | "open_response" | "short_answer" => Some(Self::Essay),
            _ => None,
        }
    }
}

/// Type-specific question payload, including the correct answer.
///
/// Keyed by question type so consumers match exhaustively instead of
/// inspecting a loosely typed answer field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum QuestionKind {
    /// Lettered options with the correct one referenced by index.
    MultipleChoice {
        options: Vec<String>,
        correct_index: Option<usize>,
    },
    /// One accepted answer per blank, in order.
    FillInBlank { answers: Vec<String> },
    /// Items dragged onto targets; `answer` maps item to target.
    DragAndDrop {
        items: Vec<String>,
        targets: Vec<String>,
        answer: BTreeMap<String, String>,
    },
    /// A word bank and the correctly ordered sentence.
    SentenceBuilder {
        words: Vec<String>,
        answer: Vec<String>,
    },
    /// Free response, graded against an optional rubric.
    Essay {
        rubric: Option<String>,
        sample_answer: Option<String>,
    },
}

impl QuestionKind {
    /// Returns the type tag for this payload.
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::MultipleChoice { .. } => QuestionType::MultipleChoice,
            Self::FillInBlank { .. } => QuestionType::FillInBlank,
            Self::DragAndDrop { .. } => QuestionType::DragAndDrop,
            Self::SentenceBuilder { .. } => QuestionType::SentenceBuilder,
            Self::Essay { .. } => QuestionType::Essay,
        }
    }
}

/// The shape of a correct answer, as seen by graders and the API layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    /// A single string (multiple choice, essay sample).
    Text(String),
    /// An ordered list (blanks, sentence tokens).
    List(Vec<String>),
    /// Item to target mapping (drag and drop).
    Mapping(BTreeMap<String, String>),
}

/// An exercise or assessment question.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_text: String,
    pub question_data: QuestionKind,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorrect_feedback: Option<String>,
}

impl Question {
    /// Creates a question with no hints or feedback.
    pub fn new(question_text: impl Into<String>, question_data: QuestionKind) -> Self {
        Self {
            question_text: question_text.into(),
            question_data,
            hints: Vec::new(),
            correct_feedback: None,
            incorrect_feedback: None,
        }
    }

    /// Returns the question type.
    pub fn question_type(&self) -> QuestionType {
        self.question_data.question_type()
    }

    /// Returns the correct answer in its type-appropriate shape.
    ///
    /// A multiple-choice question without a resolved option yields an empty
    /// string.
    pub fn correct_answer(&self) -> CorrectAnswer {
        match &self.question_data {
            QuestionKind::MultipleChoice {
                options,
                correct_index,
            } => CorrectAnswer::Text(
                correct_index
                    .and_then(|i| options.get(i))
                    .cloned()
                    .unwrap_or_default(),
            ),
            QuestionKind::FillInBlank { answers } => CorrectAnswer::List(answers.clone()),
            QuestionKind::DragAndDrop { answer, .. } => CorrectAnswer::Mapping(answer.clone()),
            QuestionKind::SentenceBuilder { answer, .. } => CorrectAnswer::List(answer.clone()),
            QuestionKind::Essay { sample_answer, .. } => {
                CorrectAnswer::Text(sample_answer.clone().unwrap_or_default())
            }
        }
    }
}

// ============================================================================
// Exercises and assessments
// ============================================================================

/// Exercise purpose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    #[default]
    Practice,
    Guided,
    Independent,
    Enrichment,
    Remediation,
}

impl ExerciseType {
    /// Returns the type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Practice => "practice",
            Self::Guided => "guided",
            Self::Independent => "independent",
            Self::Enrichment => "enrichment",
            Self::Remediation => "remediation",
        }
    }

    /// Parse a type label, case-insensitively. Trailing words are ignored,
    /// so `guided practice` parses as [`ExerciseType::Guided`].
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        let first = lower.split_whitespace().next().unwrap_or("");
        match first {
            "practice" => Some(Self::Practice),
            "guided" => Some(Self::Guided),
            "independent" => Some(Self::Independent),
            "enrichment" | "extension" | "challenge" => Some(Self::Enrichment),
            "remediation" | "review" => Some(Self::Remediation),
            _ => None,
        }
    }
}

/// An exercise extracted from an exercise-typed section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exercise_type: ExerciseType,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub order_index: usize,
}

/// Assessment purpose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentType {
    Diagnostic,
    #[default]
    Formative,
    Summative,
}

impl AssessmentType {
    /// Returns the type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diagnostic => "diagnostic",
            Self::Formative => "formative",
            Self::Summative => "summative",
        }
    }

    /// Parse an explicit type label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "diagnostic" | "pre-assessment" | "pretest" => Some(Self::Diagnostic),
            "formative" => Some(Self::Formative),
            "summative" => Some(Self::Summative),
            _ => None,
        }
    }

    /// Infer the type from an assessment title.
    pub fn infer_from_title(title: &str) -> Self {
        let lower = title.to_lowercase();
        if lower.contains("diagnostic") || lower.contains("pre-") || lower.contains("pretest") {
            Self::Diagnostic
        } else if lower.contains("summative")
            || lower.contains("final")
            || lower.contains("unit test")
        {
            Self::Summative
        } else {
            Self::Formative
        }
    }
}

/// An assessment extracted from an assessment-typed section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assessment_type: AssessmentType,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passing_score: Option<f64>,
    #[serde(default)]
    pub order_index: usize,
}

// ============================================================================
// ParsedLessonData
// ============================================================================

/// The full structured lesson produced by the compiler.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedLessonData {
    #[serde(default)]
    pub metadata: LessonMetadata,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    /// Main lesson content as markdown.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
}

impl ParsedLessonData {
    /// Kebab-case slug derived from the title.
    pub fn slug(&self) -> String {
        normalize_id(&self.metadata.title)
    }

    /// Total questions across exercises and assessments.
    pub fn question_count(&self) -> usize {
        self.exercises.iter().map(|e| e.questions.len()).sum::<usize>()
            + self
                .assessments
                .iter()
                .map(|a| a.questions.len())
                .sum::<usize>()
    }
}
