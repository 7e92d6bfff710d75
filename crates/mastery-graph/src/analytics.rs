//! Curriculum-wide progress summaries.

use crate::records::ProgressStatus;
use crate::resolver::PrerequisiteResolver;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress within one unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitProgress {
    pub unit_id: String,
    pub title: String,
    pub status: ProgressStatus,
    /// Whether the unit or any of its lessons has recorded activity.
    pub has_activity: bool,
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub mastered_lessons: usize,
    /// Completed lessons as a percentage (0-100).
    pub percent_complete: f64,
}

/// Aggregate progress across a curriculum.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumProgress {
    pub total_units: usize,
    pub mastered_units: usize,
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub mastered_lessons: usize,
    pub lesson_completion_percent: f64,
    pub total_objectives: usize,
    pub mastered_objectives: usize,
    pub objective_mastery_percent: f64,
    pub total_exercises: usize,
    pub completed_exercises: usize,
    pub total_assessments: usize,
    pub completed_assessments: usize,
    /// Mean score over every scored record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    pub units: Vec<UnitProgress>,
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

impl PrerequisiteResolver<'_> {
    /// Summarize the learner's progress over the whole curriculum.
    ///
    /// "Completed" counts anything at least completed, so mastered items
    /// are included.
    pub fn analyze_progress(&self) -> CurriculumProgress {
        let c = self.curriculum;
        let at_least = |id: &str, floor: ProgressStatus| self.status_of(id) >= floor;
        let mastered = |id: &str| self.record(id).is_some_and(|r| r.mastery_achieved);

        let units: Vec<UnitProgress> = c
            .units_in_order()
            .into_iter()
            .map(|unit| {
                let lessons = c.lessons_of(&unit.id);
                let completed = lessons
                    .iter()
                    .filter(|l| at_least(l.id.as_str(), ProgressStatus::Completed))
                    .count();
                UnitProgress {
                    unit_id: unit.id.clone(),
                    title: unit.title.clone(),
                    status: self.unit_status(&unit.id),
                    has_activity: self.unit_has_activity(&unit.id),
                    total_lessons: lessons.len(),
                    completed_lessons: completed,
                    mastered_lessons: lessons.iter().filter(|l| mastered(l.id.as_str())).count(),
                    percent_complete: percent(completed, lessons.len()),
                }
            })
            .collect();

        let completed_lessons = c
            .lessons
            .iter()
            .filter(|l| at_least(l.id.as_str(), ProgressStatus::Completed))
            .count();
        let mastered_objectives = c.objectives.iter().filter(|o| mastered(o.id.as_str())).count();

        let scores: Vec<f64> = self.records.iter().filter_map(|r| r.score).collect();
        let average_score =
            (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64);

        CurriculumProgress {
            total_units: c.units.len(),
            mastered_units: units
                .iter()
                .filter(|u| u.status == ProgressStatus::Mastered)
                .count(),
            total_lessons: c.lessons.len(),
            completed_lessons,
            mastered_lessons: c.lessons.iter().filter(|l| mastered(l.id.as_str())).count(),
            lesson_completion_percent: percent(completed_lessons, c.lessons.len()),
            total_objectives: c.objectives.len(),
            mastered_objectives,
            objective_mastery_percent: percent(mastered_objectives, c.objectives.len()),
            total_exercises: c.exercises.len(),
            completed_exercises: c
                .exercises
                .iter()
                .filter(|e| at_least(e.id.as_str(), ProgressStatus::Completed))
                .count(),
            total_assessments: c.assessments.len(),
            completed_assessments: c
                .assessments
                .iter()
                .filter(|a| at_least(a.id.as_str(), ProgressStatus::Completed))
                .count(),
            average_score,
            last_activity: self.records.iter().filter_map(|r| r.last_accessed).max(),
            units,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::records::{
        Curriculum, LessonRecord, ObjectiveRecord, ProgressRecord, ProgressStatus, UnitRecord,
    };
    use crate::resolver::PrerequisiteResolver;
    use chrono::{TimeZone, Utc};

    fn curriculum() -> Curriculum {
        let mut c = Curriculum::default();
        c.units.push(UnitRecord::new("u1", "Nouns"));
        c.units.push(UnitRecord::new("u2", "Verbs"));
        c.lessons.push(LessonRecord::new("l1", "u1", "One"));
        c.lessons.push(LessonRecord::new("l2", "u1", "Two"));
        c.lessons.push(LessonRecord::new("l3", "u2", "Three"));
        c.lessons.push(LessonRecord::new("l4", "u2", "Four"));
        c.objectives.push(ObjectiveRecord {
            id: "o1".into(),
            unit_id: None,
            lesson_id: Some("l1".into()),
            description: "Name things".into(),
            order_index: 0,
        });
        c
    }

    #[test]
    fn test_empty_progress() {
        let c = curriculum();
        let summary = PrerequisiteResolver::new(&c, &[]).analyze_progress();
        assert_eq!(summary.total_lessons, 4);
        assert_eq!(summary.completed_lessons, 0);
        assert_eq!(summary.lesson_completion_percent, 0.0);
        assert_eq!(summary.average_score, None);
        assert_eq!(summary.units.len(), 2);
        assert_eq!(summary.units[0].status, ProgressStatus::NotStarted);
        assert!(!summary.units[0].has_activity);
    }

    #[test]
    fn test_counts_and_percentages() {
        let c = curriculum();
        let mut completed = ProgressRecord::new("l3", ProgressStatus::Completed).with_score(0.5);
        completed.last_accessed = Some(Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap());
        let mut mastered = ProgressRecord::mastered("l1");
        mastered.last_accessed = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let progress = vec![
            mastered,
            ProgressRecord::mastered("l2"),
            completed,
            ProgressRecord::mastered("o1"),
        ];

        let summary = PrerequisiteResolver::new(&c, &progress).analyze_progress();
        assert_eq!(summary.completed_lessons, 3);
        assert_eq!(summary.mastered_lessons, 2);
        assert_eq!(summary.lesson_completion_percent, 75.0);
        assert_eq!(summary.mastered_objectives, 1);
        assert_eq!(summary.objective_mastery_percent, 100.0);
        assert_eq!(summary.mastered_units, 1);
        assert_eq!(summary.units[1].percent_complete, 50.0);
        assert_eq!(summary.units[1].status, ProgressStatus::NotStarted);
        assert!(summary.units[1].has_activity);
        assert_eq!(summary.average_score, Some(0.875));
        assert_eq!(
            summary.last_activity,
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap())
        );
    }
}
