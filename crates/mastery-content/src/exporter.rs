//! Lesson export.
//!
//! Renders [`ParsedLessonData`] back to lesson markdown in the same
//! conventions the importer reads, or to pretty-printed JSON. Importing an
//! exported markdown lesson yields equivalent data.
//!
//! The markdown layout is:
//!
//! 1. Frontmatter with camelCase keys in a fixed order (optional)
//! 2. `# Title`, prefixed `Unit N, Lesson M:` when both numbers are known
//! 3. `## Lesson Overview` with objectives and labeled metadata
//! 4. The content markdown, verbatim
//! 5. One `## Exercise N: ...` section per exercise (optional)
//! 6. One `## Assessment N: ...` section per assessment (optional)

use crate::model::{
    Assessment, Exercise, ObjectiveCategory, ParsedLessonData, Question, QuestionKind,
};
use crate::questions::CHECK_MARKS;
use mastery_core::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Output format for [`export_lesson`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Json,
}

impl ExportFormat {
    /// Parse a format name.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "markdown" | "md" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// What to include in an export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub include_metadata: bool,
    pub include_exercises: bool,
    pub include_assessments: bool,
    pub format: ExportFormat,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_metadata: true,
            include_exercises: true,
            include_assessments: true,
            format: ExportFormat::Markdown,
        }
    }
}

/// Render a lesson in the requested format.
///
/// Only JSON serialization can fail.
pub fn export_lesson(lesson: &ParsedLessonData, options: &ExportOptions) -> Result<String> {
    match options.format {
        ExportFormat::Markdown => Ok(render_markdown(lesson, options)),
        ExportFormat::Json => export_json(lesson, options),
    }
}

fn export_json(lesson: &ParsedLessonData, options: &ExportOptions) -> Result<String> {
    let mut filtered = lesson.clone();
    if !options.include_exercises {
        filtered.exercises.clear();
    }
    if !options.include_assessments {
        filtered.assessments.clear();
    }
    Ok(serde_json::to_string_pretty(&filtered)?)
}

/// Render a lesson as markdown.
pub fn render_markdown(lesson: &ParsedLessonData, options: &ExportOptions) -> String {
    let mut out = String::new();
    let meta = &lesson.metadata;

    if options.include_metadata {
        out.push_str(&render_frontmatter(lesson));
        out.push('\n');
    }

    match (meta.unit_number, meta.lesson_number) {
        (Some(unit), Some(number)) => {
            let _ = writeln!(out, "# Unit {unit}, Lesson {number}: {}", meta.title);
        }
        _ => {
            let _ = writeln!(out, "# {}", meta.title);
        }
    }

    out.push_str("\n## Lesson Overview\n\n");
    if !lesson.objectives.is_empty() {
        out.push_str("**Learning Objectives:**\n");
        for objective in &lesson.objectives {
            if objective.category == ObjectiveCategory::default() {
                let _ = writeln!(out, "- {}", objective.description);
            } else {
                let _ = writeln!(
                    out,
                    "- [{}] {}",
                    objective.category.as_str(),
                    objective.description
                );
            }
        }
        out.push('\n');
    }
    let _ = writeln!(out, "**Estimated Time:** {} minutes", meta.estimated_minutes);
    let _ = writeln!(out, "**Difficulty:** {}", meta.difficulty.as_str());
    let _ = writeln!(
        out,
        "**Mastery Threshold:** {}",
        format_percent(meta.mastery_threshold)
    );
    if !meta.description.is_empty() {
        let _ = writeln!(out, "**Description:** {}", meta.description);
    }

    if !lesson.content.trim().is_empty() {
        out.push('\n');
        out.push_str(lesson.content.trim_end());
        out.push('\n');
    }

    if options.include_exercises {
        for (i, exercise) in lesson.exercises.iter().enumerate() {
            out.push('\n');
            render_exercise(&mut out, i + 1, exercise);
        }
    }

    if options.include_assessments {
        for (i, assessment) in lesson.assessments.iter().enumerate() {
            out.push('\n');
            render_assessment(&mut out, i + 1, assessment);
        }
    }

    out
}

fn render_frontmatter(lesson: &ParsedLessonData) -> String {
    let meta = &lesson.metadata;
    let mut out = String::from("---\n");
    let _ = writeln!(out, "title: {}", quoted(&meta.title));
    let _ = writeln!(out, "description: {}", quoted(&meta.description));
    let _ = writeln!(out, "difficulty: {}", quoted(meta.difficulty.as_str()));
    let _ = writeln!(out, "estimatedMinutes: {}", meta.estimated_minutes);
    let _ = writeln!(out, "masteryThreshold: {}", meta.mastery_threshold);
    let _ = writeln!(out, "tags: {}", quoted_list(&meta.tags));
    let _ = writeln!(out, "prerequisites: {}", quoted_list(&meta.prerequisites));
    if let Some(unit) = meta.unit_number {
        let _ = writeln!(out, "unit: {unit}");
    }
    if let Some(number) = meta.lesson_number {
        let _ = writeln!(out, "lesson: {number}");
    }
    out.push_str("---\n");
    out
}

fn render_exercise(out: &mut String, number: usize, exercise: &Exercise) {
    if exercise.title.is_empty() {
        let _ = writeln!(out, "## Exercise {number}\n");
    } else {
        let _ = writeln!(out, "## Exercise {number}: {}\n", exercise.title);
    }
    let _ = writeln!(out, "**Type:** {}", exercise.exercise_type.as_str());
    if !exercise.description.is_empty() {
        let _ = writeln!(out, "**Instructions:** {}", quoted(&exercise.description));
    }
    render_questions(out, &exercise.questions);
}

fn render_assessment(out: &mut String, number: usize, assessment: &Assessment) {
    if assessment.title.is_empty() {
        let _ = writeln!(out, "## Assessment {number}\n");
    } else {
        let _ = writeln!(out, "## Assessment {number}: {}\n", assessment.title);
    }
    let _ = writeln!(out, "**Type:** {}", assessment.assessment_type.as_str());
    if let Some(score) = assessment.passing_score {
        let _ = writeln!(out, "**Passing Score:** {}", format_percent(score));
    }
    if !assessment.description.is_empty() {
        let _ = writeln!(out, "**Instructions:** {}", quoted(&assessment.description));
    }
    render_questions(out, &assessment.questions);
}

fn render_questions(out: &mut String, questions: &[Question]) {
    for (i, question) in questions.iter().enumerate() {
        out.push('\n');
        render_question(out, i + 1, question);
    }
}

fn render_question(out: &mut String, number: usize, question: &Question) {
    const INDENT: &str = "   ";
    let _ = writeln!(out, "{number}. **{}**", question.question_text);

    match &question.question_data {
        QuestionKind::MultipleChoice {
            options,
            correct_index,
        } => {
            for (i, option) in options.iter().enumerate() {
                let letter = option_letter(i);
                if Some(i) == *correct_index {
                    let _ = writeln!(out, "{INDENT}- {letter}) {option} {}", CHECK_MARKS[0]);
                } else {
                    let _ = writeln!(out, "{INDENT}- {letter}) {option}");
                }
            }
        }
        QuestionKind::FillInBlank { answers } => {
            let _ = writeln!(out, "{INDENT}Question Type: fill_in_blank");
            let _ = writeln!(out, "{INDENT}Answer: {}", answers.join("; "));
        }
        QuestionKind::DragAndDrop {
            items,
            targets,
            answer,
        } => {
            let _ = writeln!(out, "{INDENT}Question Type: drag_and_drop");
            for item in items {
                if let Some(target) = answer.get(item) {
                    let _ = writeln!(out, "{INDENT}- {item} -> {target}");
                }
            }
            if items.iter().any(|item| !answer.contains_key(item)) {
                let _ = writeln!(out, "{INDENT}Items: {}", items.join(", "));
            }
            if !targets.is_empty() {
                let _ = writeln!(out, "{INDENT}Targets: {}", targets.join(", "));
            }
        }
        QuestionKind::SentenceBuilder { words, answer } => {
            let _ = writeln!(out, "{INDENT}Question Type: sentence_builder");
            let _ = writeln!(out, "{INDENT}Words: {}", words.join(", "));
            if !answer.is_empty() {
                let _ = writeln!(out, "{INDENT}Answer: {}", answer.join(", "));
            }
        }
        QuestionKind::Essay {
            rubric,
            sample_answer,
        } => {
            let _ = writeln!(out, "{INDENT}Question Type: essay");
            if let Some(rubric) = rubric {
                let _ = writeln!(out, "{INDENT}Rubric: {rubric}");
            }
            if let Some(sample) = sample_answer {
                let _ = writeln!(out, "{INDENT}Sample Answer: {sample}");
            }
        }
    }

    for hint in &question.hints {
        let _ = writeln!(out, "{INDENT}Hint: \"{hint}\"");
    }
    if let Some(feedback) = &question.correct_feedback {
        let _ = writeln!(out, "{INDENT}**Feedback if correct:** {feedback}");
    }
    if let Some(feedback) = &question.incorrect_feedback {
        let _ = writeln!(out, "{INDENT}**Feedback if incorrect:** {feedback}");
    }
}

fn option_letter(index: usize) -> char {
    (b'a' + (index % 26) as u8) as char
}

fn quoted(value: &str) -> String {
    format!("\"{value}\"")
}

fn quoted_list(values: &[String]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| serde_json::to_string(v).unwrap_or_else(|_| quoted(v)))
        .collect();
    format!("[{}]", items.join(", "))
}

fn format_percent(fraction: f64) -> String {
    let percent = fraction * 100.0;
    if (percent - percent.round()).abs() < 1e-9 {
        format!("{}%", percent.round() as i64)
    } else {
        format!("{percent:.1}%")
    }
}
