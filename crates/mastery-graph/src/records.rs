//! Curriculum and learner progress records.
//!
//! These are the plain in-memory shapes the persistence layer hands to the
//! resolver. Every record carries its natural foreign keys (lesson → unit,
//! exercise → lesson, ...); the graph builder turns those into dependency
//! edges.

use chrono::{DateTime, Utc};
use mastery_content::{AssessmentType, ExerciseType};
use mastery_content::model::DEFAULT_MASTERY_THRESHOLD;
use serde::{Deserialize, Serialize};

fn default_threshold() -> f64 {
    DEFAULT_MASTERY_THRESHOLD
}

// ============================================================================
// Content records
// ============================================================================

/// A unit: an ordered group of lessons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order_index: u32,
    /// Fraction of lessons that must be mastered for the unit to count.
    #[serde(default = "default_threshold")]
    pub mastery_threshold: f64,
    /// Ids of units or lessons that must be satisfied before this unit opens.
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl UnitRecord {
    /// Creates a unit with the default mastery threshold.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            order_index: 0,
            mastery_threshold: DEFAULT_MASTERY_THRESHOLD,
            prerequisites: Vec::new(),
        }
    }
}

/// A lesson within a unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub id: String,
    pub unit_id: String,
    pub title: String,
    #[serde(default)]
    pub order_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(default = "default_threshold")]
    pub mastery_threshold: f64,
    /// Explicit prerequisite ids (lessons, units, or objectives).
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl LessonRecord {
    /// Creates a lesson in `unit_id`.
    pub fn new(
        id: impl Into<String>,
        unit_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            unit_id: unit_id.into(),
            title: title.into(),
            order_index: 0,
            estimated_minutes: None,
            mastery_threshold: DEFAULT_MASTERY_THRESHOLD,
            prerequisites: Vec::new(),
        }
    }

    /// Sets the order index.
    pub fn with_order(mut self, order_index: u32) -> Self {
        self.order_index = order_index;
        self
    }

    /// Adds an explicit prerequisite.
    pub fn with_prerequisite(mut self, id: impl Into<String>) -> Self {
        self.prerequisites.push(id.into());
        self
    }
}

/// A learning objective, attached to a lesson, a unit, or both.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
    pub description: String,
    #[serde(default)]
    pub order_index: u32,
}

/// An exercise belonging to a lesson.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    pub id: String,
    pub lesson_id: String,
    pub title: String,
    #[serde(default)]
    pub exercise_type: ExerciseType,
    #[serde(default)]
    pub order_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

impl ExerciseRecord {
    /// Creates a practice exercise.
    pub fn new(
        id: impl Into<String>,
        lesson_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            lesson_id: lesson_id.into(),
            title: title.into(),
            exercise_type: ExerciseType::default(),
            order_index: 0,
            estimated_minutes: None,
        }
    }

    /// Sets the exercise type.
    pub fn with_type(mut self, exercise_type: ExerciseType) -> Self {
        self.exercise_type = exercise_type;
        self
    }

    /// Sets the order index.
    pub fn with_order(mut self, order_index: u32) -> Self {
        self.order_index = order_index;
        self
    }

    /// Enrichment exercises are optional.
    pub fn is_required(&self) -> bool {
        self.exercise_type != ExerciseType::Enrichment
    }
}

/// An assessment. Lesson-level when `lesson_id` is set, otherwise unit-level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub assessment_type: AssessmentType,
    #[serde(default)]
    pub order_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passing_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

impl AssessmentRecord {
    /// Creates an assessment attached to a lesson.
    pub fn for_lesson(
        id: impl Into<String>,
        lesson_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            lesson_id: Some(lesson_id.into()),
            unit_id: None,
            title: title.into(),
            assessment_type: AssessmentType::default(),
            order_index: 0,
            passing_score: None,
            estimated_minutes: None,
        }
    }

    /// Creates an assessment attached to a unit.
    pub fn for_unit(
        id: impl Into<String>,
        unit_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            lesson_id: None,
            unit_id: Some(unit_id.into()),
            title: title.into(),
            assessment_type: AssessmentType::Summative,
            order_index: 0,
            passing_score: None,
            estimated_minutes: None,
        }
    }
}

/// A snapshot of every content entity in a curriculum.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Curriculum {
    pub units: Vec<UnitRecord>,
    pub lessons: Vec<LessonRecord>,
    pub objectives: Vec<ObjectiveRecord>,
    pub exercises: Vec<ExerciseRecord>,
    pub assessments: Vec<AssessmentRecord>,
}

impl Curriculum {
    /// Parse a curriculum snapshot from JSON.
    pub fn from_json(json: &str) -> mastery_core::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Looks up a unit by id.
    pub fn unit(&self, id: &str) -> Option<&UnitRecord> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Looks up a lesson by id.
    pub fn lesson(&self, id: &str) -> Option<&LessonRecord> {
        self.lessons.iter().find(|l| l.id == id)
    }

    /// Units sorted by order index.
    pub fn units_in_order(&self) -> Vec<&UnitRecord> {
        let mut units: Vec<_> = self.units.iter().collect();
        units.sort_by_key(|u| u.order_index);
        units
    }

    /// Lessons of a unit sorted by order index.
    pub fn lessons_of(&self, unit_id: &str) -> Vec<&LessonRecord> {
        let mut lessons: Vec<_> = self.lessons.iter().filter(|l| l.unit_id == unit_id).collect();
        lessons.sort_by_key(|l| l.order_index);
        lessons
    }

    /// Exercises of a lesson sorted by order index.
    pub fn exercises_of(&self, lesson_id: &str) -> Vec<&ExerciseRecord> {
        let mut exercises: Vec<_> = self
            .exercises
            .iter()
            .filter(|e| e.lesson_id == lesson_id)
            .collect();
        exercises.sort_by_key(|e| e.order_index);
        exercises
    }

    /// Lesson-level assessments sorted by order index.
    pub fn assessments_of_lesson(&self, lesson_id: &str) -> Vec<&AssessmentRecord> {
        let mut assessments: Vec<_> = self
            .assessments
            .iter()
            .filter(|a| a.lesson_id.as_deref() == Some(lesson_id))
            .collect();
        assessments.sort_by_key(|a| a.order_index);
        assessments
    }

    /// Unit-level assessments (no lesson) sorted by order index.
    pub fn assessments_of_unit(&self, unit_id: &str) -> Vec<&AssessmentRecord> {
        let mut assessments: Vec<_> = self
            .assessments
            .iter()
            .filter(|a| a.lesson_id.is_none() && a.unit_id.as_deref() == Some(unit_id))
            .collect();
        assessments.sort_by_key(|a| a.order_index);
        assessments
    }
}

// ============================================================================
// Progress records
// ============================================================================

/// Where a learner stands on one piece of content.
///
/// Variants are ordered, so `status >= ProgressStatus::InProgress` reads as
/// "has at least been started".
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Mastered,
}

impl ProgressStatus {
    /// Returns the status name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Mastered => "mastered",
        }
    }
}

/// One learner's progress on one content item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRecord {
    pub content_id: String,
    pub status: ProgressStatus,
    /// Best score as a fraction in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub mastery_achieved: bool,
    pub needs_remediation: bool,
    pub eligible_for_enrichment: bool,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    /// Creates a record with the given status.
    pub fn new(content_id: impl Into<String>, status: ProgressStatus) -> Self {
        Self {
            content_id: content_id.into(),
            status,
            ..Self::default()
        }
    }

    /// Creates a mastered record with a perfect score.
    pub fn mastered(content_id: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            status: ProgressStatus::Mastered,
            score: Some(1.0),
            mastery_achieved: true,
            attempts: 1,
            ..Self::default()
        }
    }

    /// Sets the score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Effective status: a mastery flag always reads as mastered.
    pub fn effective_status(&self) -> ProgressStatus {
        if self.mastery_achieved {
            ProgressStatus::Mastered
        } else {
            self.status
        }
    }
}

/// Parse a learner's progress records from a JSON array.
pub fn progress_from_json(json: &str) -> mastery_core::Result<Vec<ProgressRecord>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curriculum_from_json_defaults() {
        let json = r#"{
            "units": [{ "id": "u1", "title": "Nouns" }],
            "lessons": [{ "id": "l1", "unitId": "u1", "title": "What is a noun?" }],
            "exercises": [{ "id": "e1", "lessonId": "l1", "title": "Sort", "exerciseType": "enrichment" }]
        }"#;
        let curriculum = Curriculum::from_json(json).unwrap();
        assert_eq!(curriculum.units[0].mastery_threshold, 0.8);
        assert_eq!(curriculum.lessons[0].order_index, 0);
        assert!(!curriculum.exercises[0].is_required());
        assert!(curriculum.objectives.is_empty());
    }

    #[test]
    fn test_curriculum_from_bad_json() {
        let err = Curriculum::from_json("{units").unwrap_err();
        assert!(matches!(err, mastery_core::Error::Json(_)));
    }

    #[test]
    fn test_lessons_of_sorted() {
        let mut curriculum = Curriculum::default();
        curriculum.lessons.push(LessonRecord::new("l2", "u1", "Two").with_order(2));
        curriculum.lessons.push(LessonRecord::new("l1", "u1", "One").with_order(1));
        curriculum.lessons.push(LessonRecord::new("x", "u2", "Other"));
        let ids: Vec<_> = curriculum.lessons_of("u1").iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l2"]);
    }

    #[test]
    fn test_unit_and_lesson_assessments_split() {
        let mut curriculum = Curriculum::default();
        curriculum.assessments.push(AssessmentRecord::for_lesson("a1", "l1", "Quiz"));
        curriculum.assessments.push(AssessmentRecord::for_unit("a2", "u1", "Unit test"));
        assert_eq!(curriculum.assessments_of_lesson("l1").len(), 1);
        assert_eq!(curriculum.assessments_of_unit("u1")[0].id, "a2");
    }

    #[test]
    fn test_status_ordering() {
        assert!(ProgressStatus::InProgress > ProgressStatus::NotStarted);
        assert!(ProgressStatus::Mastered > ProgressStatus::Completed);
    }

    #[test]
    fn test_effective_status() {
        let mut record = ProgressRecord::new("l1", ProgressStatus::InProgress);
        assert_eq!(record.effective_status(), ProgressStatus::InProgress);
        record.mastery_achieved = true;
        assert_eq!(record.effective_status(), ProgressStatus::Mastered);
    }

    #[test]
    fn test_progress_json_with_timestamp() {
        let json = r#"[{
            "contentId": "l1",
            "status": "in_progress",
            "score": 0.4,
            "lastAccessed": "2024-05-01T12:00:00Z"
        }]"#;
        let records = progress_from_json(json).unwrap();
        assert_eq!(records[0].status, ProgressStatus::InProgress);
        assert!(records[0].last_accessed.is_some());
        assert!(!records[0].mastery_achieved);
    }
}
