//! Lesson extraction from a classified section tree.
//!
//! Each field of [`ParsedLessonData`] comes from a fixed fallback chain:
//!
//! | Field | Sources, in order |
//! |---|---|
//! | title | frontmatter `title`, first level-1 heading, [`DEFAULT_TITLE`] |
//! | description | frontmatter, overview `Description:` label |
//! | difficulty | frontmatter, overview `Difficulty:` label, import default |
//! | estimated minutes | frontmatter, overview `Estimated Time:` label, import default |
//! | mastery threshold | frontmatter, overview `Mastery Threshold:` label, import default |
//! | objectives | frontmatter `objectives`, overview bullet lists |
//! | content | every content-typed section, with its heading |
//!
//! Frontmatter keys are accepted in camelCase or snake_case.

use crate::diagnostics::{Diagnostics, ErrorKind, WarningKind};
use crate::import::ImportOptions;
use crate::markdown::frontmatter::{Frontmatter, FrontmatterValue};
use crate::markdown::helpers::{
    bullet_items, labeled_value, labeled_value_any, leading_integer, parse_fraction, strip_quotes,
};
use crate::markdown::sections::{Section, SectionId, SectionTree, SectionType};
use crate::model::{
    Assessment, AssessmentType, DEFAULT_TITLE, Difficulty, Exercise, ExerciseType, LessonMetadata,
    Objective, ObjectiveCategory, ParsedLessonData,
};
use crate::questions::parse_questions;
use regex::Regex;
use std::sync::LazyLock;

static NUMBERED_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:unit\s+(\d+)\s*[,.:\-]?\s*)?lesson\s+(\d+)\s*[:.\-\x{2013}\x{2014}]\s*(.+)$",
    )
    .expect("valid numbered title regex")
});

static SECTION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:exercise|practice|activity|assessment|quiz|test|enrichment)\s*\d*\s*[:.\-\x{2013}\x{2014}]\s*(.+)$",
    )
    .expect("valid section prefix regex")
});

static OBJECTIVES_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:\*\*)?(?:learning\s+)?objectives(?:\*\*)?\s*:?\s*(?:\*\*)?\s*$")
        .expect("valid objectives label regex")
});

static OBJECTIVE_CATEGORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([A-Za-z]+)\]\s*(.+)$").expect("valid objective category regex")
});

/// Extract structured lesson data.
///
/// Out-of-range mastery thresholds are recorded as errors; everything else
/// degrades to defaults with a warning.
pub(crate) fn extract_lesson(
    frontmatter: Option<&Frontmatter>,
    tree: &SectionTree,
    options: &ImportOptions,
    diags: &mut Diagnostics,
) -> ParsedLessonData {
    let overview = overview_text(tree);

    let metadata = extract_metadata(frontmatter, tree, &overview, options, diags);
    let objectives = extract_objectives(frontmatter, tree, diags);
    let content = extract_content(tree);
    let exercises = extract_exercises(tree, diags);
    let assessments = extract_assessments(tree, diags);

    ParsedLessonData {
        metadata,
        objectives,
        content,
        exercises,
        assessments,
    }
}

/// The level-1 heading that carries the lesson title.
///
/// That is the first level-1 heading, unless frontmatter names a different
/// title, in which case the heading is ordinary content.
pub(crate) fn title_section(
    frontmatter: Option<&Frontmatter>,
    tree: &SectionTree,
) -> Option<SectionId> {
    let id = tree.sections().iter().position(|s| s.level == 1)?;
    let heading = heading_title(&tree.get(id)?.title);
    let declared = frontmatter
        .and_then(|f| f.get_any(&["title"]))
        .and_then(FrontmatterValue::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty());
    match declared {
        Some(title) if title != heading => None,
        _ => Some(id),
    }
}

/// Heading text with any `Unit N, Lesson M:` prefix removed.
fn heading_title(heading: &str) -> &str {
    NUMBERED_TITLE
        .captures(heading)
        .and_then(|caps| caps.get(3))
        .map_or(heading, |m| m.as_str())
        .trim()
}

fn overview_text(tree: &SectionTree) -> String {
    tree.of_type(SectionType::Overview)
        .map(|id| tree.body_with_untyped_descendants(id))
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ============================================================================
// Metadata
// ============================================================================

fn extract_metadata(
    fm: Option<&Frontmatter>,
    tree: &SectionTree,
    overview: &str,
    options: &ImportOptions,
    diags: &mut Diagnostics,
) -> LessonMetadata {
    let lookup = |keys: &[&str]| fm.and_then(|f| f.get_any(keys));

    let first_h1 = tree.sections().iter().find(|s| s.level == 1);
    let numbered = first_h1.and_then(|s| NUMBERED_TITLE.captures(&s.title));

    let title = match lookup(&["title"]).and_then(FrontmatterValue::as_str) {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => match (first_h1, &numbered) {
            (_, Some(caps)) => caps.get(3).map_or("", |m| m.as_str()).trim().to_string(),
            (Some(h1), None) => h1.title.clone(),
            (None, None) => {
                diags.warn(
                    WarningKind::Content,
                    format!("No title found; using \"{DEFAULT_TITLE}\""),
                    None,
                );
                DEFAULT_TITLE.to_string()
            }
        },
    };

    let description = lookup(&["description"])
        .and_then(FrontmatterValue::as_str)
        .map(str::to_string)
        .or_else(|| labeled_value(overview, "Description").map(|d| strip_quotes(&d).to_string()))
        .unwrap_or_default();

    let difficulty = match lookup(&["difficulty"])
        .and_then(FrontmatterValue::as_str)
        .map(str::to_string)
        .or_else(|| labeled_value(overview, "Difficulty"))
    {
        Some(label) => Difficulty::from_label(&label).unwrap_or_else(|| {
            diags.warn(
                WarningKind::Metadata,
                format!(
                    "Unknown difficulty '{label}'; using {}",
                    options.default_difficulty.as_str()
                ),
                None,
            );
            options.default_difficulty
        }),
        None => options.default_difficulty,
    };

    let estimated_minutes = match lookup(&["estimatedMinutes", "estimated_minutes", "duration"]) {
        Some(FrontmatterValue::Number(n)) if *n >= 0.0 => n.round() as u32,
        Some(FrontmatterValue::Text(t)) if leading_integer(t).is_some() => {
            leading_integer(t).unwrap_or(options.default_estimated_minutes)
        }
        Some(other) => {
            diags.warn(
                WarningKind::Metadata,
                format!("Invalid estimated minutes {other:?}; using default"),
                None,
            );
            options.default_estimated_minutes
        }
        None => labeled_value_any(overview, &["Estimated Time", "Duration"])
            .and_then(|t| leading_integer(&t))
            .unwrap_or(options.default_estimated_minutes),
    };

    let mastery_threshold = match lookup(&["masteryThreshold", "mastery_threshold"]) {
        Some(FrontmatterValue::Number(n)) => *n,
        Some(FrontmatterValue::Text(t)) => parse_fraction(t).unwrap_or(f64::NAN),
        Some(_) => f64::NAN,
        None => labeled_value(overview, "Mastery Threshold")
            .and_then(|t| parse_fraction(&t))
            .unwrap_or(options.default_mastery_threshold),
    };
    if !(0.0..=1.0).contains(&mastery_threshold) {
        diags.error(
            ErrorKind::Validation,
            format!("Mastery threshold {mastery_threshold} is outside [0, 1]"),
            Some("masteryThreshold"),
        );
    }

    let capture_number = |group: usize| {
        numbered
            .as_ref()
            .and_then(|caps| caps.get(group))
            .and_then(|m| m.as_str().parse::<u32>().ok())
    };
    let unit_number = lookup(&["unit", "unitNumber", "unit_number"])
        .and_then(as_count)
        .or_else(|| capture_number(1));
    let lesson_number = lookup(&["lesson", "lessonNumber", "lesson_number"])
        .and_then(as_count)
        .or_else(|| capture_number(2));

    LessonMetadata {
        title,
        description,
        difficulty,
        estimated_minutes,
        tags: fm.map(|f| f.get_list("tags")).unwrap_or_default(),
        prerequisites: fm.map(|f| f.get_list("prerequisites")).unwrap_or_default(),
        mastery_threshold,
        unit_number,
        lesson_number,
    }
}

fn as_count(value: &FrontmatterValue) -> Option<u32> {
    match value {
        FrontmatterValue::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as u32),
        FrontmatterValue::Text(t) => t.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Objectives and content
// ============================================================================

fn extract_objectives(
    fm: Option<&Frontmatter>,
    tree: &SectionTree,
    diags: &mut Diagnostics,
) -> Vec<Objective> {
    let mut objectives: Vec<Objective> = fm
        .map(|f| f.get_list("objectives"))
        .unwrap_or_default()
        .iter()
        .map(|text| parse_objective(text))
        .collect();

    let overview_ids: Vec<SectionId> = tree.of_type(SectionType::Overview).collect();
    for &id in &overview_ids {
        let Some(section) = tree.get(id) else {
            continue;
        };
        let body = tree.body_with_untyped_descendants(id);
        let items = if section.title.to_lowercase().contains("objectives") {
            bullet_items(&body)
        } else {
            bullets_after_label(&body)
        };
        objectives.extend(items.iter().map(|text| parse_objective(text)));
    }

    if objectives.is_empty() && !overview_ids.is_empty() {
        diags.warn(
            WarningKind::Content,
            "No learning objectives found in overview",
            None,
        );
    }

    objectives
}

/// Bullet lines following a `Learning Objectives:` label line, allowing
/// blank lines in between.
fn bullets_after_label(body: &str) -> Vec<String> {
    let mut lines = body.lines();
    if !lines.any(|line| OBJECTIVES_LABEL.is_match(line)) {
        return Vec::new();
    }

    let mut items = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match bullet_items(line).pop() {
            Some(item) => items.push(item),
            None => break,
        }
    }
    items
}

fn parse_objective(text: &str) -> Objective {
    if let Some(caps) = OBJECTIVE_CATEGORY.captures(text.trim())
        && let (Some(label), Some(rest)) = (caps.get(1), caps.get(2))
        && let Some(category) = ObjectiveCategory::from_label(label.as_str())
    {
        return Objective {
            description: rest.as_str().trim().to_string(),
            category,
        };
    }
    Objective::new(text.trim())
}

fn extract_content(tree: &SectionTree) -> String {
    tree.of_type(SectionType::Content)
        .filter_map(|id| {
            let section = tree.get(id)?;
            let body = tree.body_with_untyped_descendants(id);
            let heading = format!("{} {}", "#".repeat(section.level as usize), section.title);
            Some(if body.is_empty() {
                heading
            } else {
                format!("{heading}\n\n{body}")
            })
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ============================================================================
// Exercises and assessments
// ============================================================================

fn extract_exercises(tree: &SectionTree, diags: &mut Diagnostics) -> Vec<Exercise> {
    let mut exercises = Vec::new();

    for (id, section) in tree.sections().iter().enumerate() {
        let enrichment = match section.section_type {
            SectionType::Exercise => false,
            SectionType::Enrichment => true,
            _ => continue,
        };

        let body = tree.body_with_untyped_descendants(id);
        let questions = parse_questions(&body, &section.title, diags);
        if questions.is_empty() {
            if !enrichment {
                diags.warn(
                    WarningKind::Content,
                    format!("Exercise '{}' contains no questions", section.title),
                    Some(&section.title),
                );
            } else {
                // Reading-only enrichment is not an exercise.
                continue;
            }
        }

        let exercise_type = labeled_value(&body, "Type")
            .and_then(|label| ExerciseType::from_label(&label))
            .or_else(|| ExerciseType::from_label(&section.title))
            .unwrap_or(if enrichment {
                ExerciseType::Enrichment
            } else {
                ExerciseType::Practice
            });

        exercises.push(Exercise {
            title: strip_section_prefix(section),
            description: instructions(&body),
            exercise_type,
            questions,
            order_index: exercises.len(),
        });
    }

    exercises
}

fn extract_assessments(tree: &SectionTree, diags: &mut Diagnostics) -> Vec<Assessment> {
    let mut assessments = Vec::new();

    for id in tree.of_type(SectionType::Assessment) {
        let Some(section) = tree.get(id) else {
            continue;
        };
        let body = tree.body_with_untyped_descendants(id);
        let questions = parse_questions(&body, &section.title, diags);
        if questions.is_empty() {
            diags.warn(
                WarningKind::Content,
                format!("Assessment '{}' contains no questions", section.title),
                Some(&section.title),
            );
        }

        let assessment_type = labeled_value(&body, "Type")
            .and_then(|label| AssessmentType::from_label(&label))
            .unwrap_or_else(|| AssessmentType::infer_from_title(&section.title));

        assessments.push(Assessment {
            title: strip_section_prefix(section),
            description: instructions(&body),
            assessment_type,
            questions,
            passing_score: labeled_value(&body, "Passing Score").and_then(|s| parse_fraction(&s)),
            order_index: assessments.len(),
        });
    }

    assessments
}

fn strip_section_prefix(section: &Section) -> String {
    SECTION_PREFIX
        .captures(section.title.trim())
        .and_then(|caps| caps.get(1))
        .map_or_else(|| section.title.trim().to_string(), |m| m.as_str().trim().to_string())
}

fn instructions(body: &str) -> String {
    labeled_value_any(body, &["Instructions", "Description"])
        .map(|text| strip_quotes(&text).to_string())
        .unwrap_or_default()
}
