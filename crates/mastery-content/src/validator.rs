//! Structural validation of parsed lessons.
//!
//! Runs over [`ParsedLessonData`] from any source (a fresh import, JSON from
//! storage) and reports problems in the same shape as import diagnostics.
//! Errors mark data that should not be persisted; warnings mark thin or
//! suspicious content.

use crate::diagnostics::{Diagnostics, ErrorKind, WarningKind};
use crate::model::{ParsedLessonData, Question, QuestionKind};

/// Durations beyond this many minutes are flagged as implausible.
pub const MAX_PLAUSIBLE_MINUTES: u32 = 480;

/// Validate a lesson's structure and content.
pub fn validate_lesson(lesson: &ParsedLessonData) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let meta = &lesson.metadata;

    if meta.title.trim().is_empty() {
        diags.error(ErrorKind::Validation, "Lesson title is required", Some("title"));
    }
    if meta.description.trim().is_empty() {
        diags.warn(WarningKind::Metadata, "Lesson has no description", None);
    }
    if !(0.0..=1.0).contains(&meta.mastery_threshold) {
        diags.error(
            ErrorKind::Validation,
            format!(
                "Mastery threshold {} is outside [0, 1]",
                meta.mastery_threshold
            ),
            Some("masteryThreshold"),
        );
    }
    if meta.estimated_minutes == 0 {
        diags.warn(
            WarningKind::Metadata,
            "Estimated time must be at least one minute",
            None,
        );
    } else if meta.estimated_minutes > MAX_PLAUSIBLE_MINUTES {
        diags.warn(
            WarningKind::Metadata,
            format!(
                "Estimated time of {} minutes is unusually long",
                meta.estimated_minutes
            ),
            None,
        );
    }

    if lesson.objectives.is_empty() {
        diags.warn(WarningKind::Content, "Lesson has no learning objectives", None);
    }
    if lesson.content.trim().is_empty() {
        diags.warn(WarningKind::Content, "Lesson has no instructional content", None);
    }

    for exercise in &lesson.exercises {
        if exercise.questions.is_empty() {
            diags.warn(
                WarningKind::Content,
                format!("Exercise '{}' contains no questions", exercise.title),
                Some(&exercise.title),
            );
        }
        for (i, question) in exercise.questions.iter().enumerate() {
            validate_question(question, i + 1, &exercise.title, &mut diags);
        }
    }

    for assessment in &lesson.assessments {
        if assessment.questions.is_empty() {
            diags.warn(
                WarningKind::Content,
                format!("Assessment '{}' contains no questions", assessment.title),
                Some(&assessment.title),
            );
        }
        if let Some(score) = assessment.passing_score
            && !(0.0..=1.0).contains(&score)
        {
            diags.error(
                ErrorKind::Validation,
                format!("Passing score {score} is outside [0, 1]"),
                Some("passingScore"),
            );
        }
        for (i, question) in assessment.questions.iter().enumerate() {
            validate_question(question, i + 1, &assessment.title, &mut diags);
        }
    }

    diags
}

fn validate_question(question: &Question, number: usize, owner: &str, diags: &mut Diagnostics) {
    if question.question_text.trim().is_empty() {
        diags.warn(
            WarningKind::Format,
            format!("Question {number} has no text"),
            Some(owner),
        );
    }

    match &question.question_data {
        QuestionKind::MultipleChoice {
            options,
            correct_index,
        } => {
            if options.len() < 2 {
                diags.warn(
                    WarningKind::Format,
                    format!("Question {number} has fewer than two options"),
                    Some(owner),
                );
            }
            match correct_index {
                Some(i) if *i >= options.len() => diags.error(
                    ErrorKind::Validation,
                    format!("Question {number} marks option {} which does not exist", i + 1),
                    Some("correctIndex"),
                ),
                Some(_) => {}
                None => diags.warn(
                    WarningKind::Content,
                    format!("Question {number} has no correct answer"),
                    Some(owner),
                ),
            }
        }
        QuestionKind::FillInBlank { answers } if answers.is_empty() => diags.warn(
            WarningKind::Content,
            format!("Question {number} has no accepted answers"),
            Some(owner),
        ),
        QuestionKind::DragAndDrop { answer, .. } if answer.is_empty() => diags.warn(
            WarningKind::Content,
            format!("Question {number} has no item-to-target pairs"),
            Some(owner),
        ),
        QuestionKind::SentenceBuilder { answer, .. } if answer.is_empty() => diags.warn(
            WarningKind::Content,
            format!("Question {number} has no target sentence"),
            Some(owner),
        ),
        _ => {}
    }
}
