//! Content recommendations for a learner.

use crate::resolver::{LearningPathSegment, PrerequisiteResolver};
use crate::types::ContentType;
use mastery_content::ExerciseType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Recommendations split by purpose.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    /// Content flagged for review.
    pub remediation: Vec<LearningPathSegment>,
    /// Optional enrichment exercises for lessons the learner excelled at.
    pub enrichment: Vec<LearningPathSegment>,
    /// The head of the next-available listing.
    pub next: Vec<LearningPathSegment>,
}

impl Recommendations {
    /// Whether there is nothing to recommend.
    pub fn is_empty(&self) -> bool {
        self.remediation.is_empty() && self.enrichment.is_empty() && self.next.is_empty()
    }
}

impl PrerequisiteResolver<'_> {
    /// Partition the learner's progress into remediation, enrichment, and
    /// next-content recommendations.
    ///
    /// Records for ids outside the curriculum are ignored.
    pub fn recommended_content(&self) -> Recommendations {
        let mut recs = Recommendations::default();

        for record in self.records.iter().filter(|r| r.needs_remediation) {
            let unlocked = self.are_prerequisites_met(&record.content_id);
            recs.remediation
                .extend(self.segment(&record.content_id, true, unlocked));
        }

        let mut seen = HashSet::new();
        for record in self.records.iter().filter(|r| r.eligible_for_enrichment) {
            let Some(lesson_id) = self.owning_lesson(&record.content_id) else {
                continue;
            };
            for exercise in self.curriculum.exercises_of(lesson_id) {
                if exercise.exercise_type != ExerciseType::Enrichment
                    || !seen.insert(exercise.id.as_str())
                {
                    continue;
                }
                let unlocked = self.are_prerequisites_met(&exercise.id);
                recs.enrichment
                    .extend(self.segment(&exercise.id, false, unlocked));
            }
        }

        let mut next = self.next_available_content();
        next.truncate(self.options.recommendation_limit);
        recs.next = next;

        log::debug!(
            "Recommendations: {} remediation, {} enrichment, {} next",
            recs.remediation.len(),
            recs.enrichment.len(),
            recs.next.len()
        );
        recs
    }

    /// The lesson an item belongs to (a lesson belongs to itself).
    fn owning_lesson<'s>(&'s self, id: &'s str) -> Option<&'s str> {
        let node = self.graph().get_node(id)?;
        let c = self.curriculum;
        match node.content_type {
            ContentType::Lesson => Some(id),
            ContentType::Exercise => c
                .exercises
                .iter()
                .find(|e| e.id == id)
                .map(|e| e.lesson_id.as_str()),
            ContentType::Assessment => c
                .assessments
                .iter()
                .find(|a| a.id == id)
                .and_then(|a| a.lesson_id.as_deref()),
            ContentType::Objective => c
                .objectives
                .iter()
                .find(|o| o.id == id)
                .and_then(|o| o.lesson_id.as_deref()),
            ContentType::Unit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::records::{
        Curriculum, ExerciseRecord, LessonRecord, ProgressRecord, ProgressStatus, UnitRecord,
    };
    use crate::resolver::{PrerequisiteResolver, ResolverOptions};
    use mastery_content::ExerciseType;

    fn curriculum() -> Curriculum {
        let mut c = Curriculum::default();
        c.units.push(UnitRecord::new("u1", "Fractions"));
        for i in 1..=7 {
            c.lessons
                .push(LessonRecord::new(format!("l{i}"), "u1", format!("Lesson {i}")).with_order(i));
        }
        c.exercises.push(ExerciseRecord::new("e1", "l1", "Practice"));
        c.exercises.push(
            ExerciseRecord::new("x1", "l1", "Challenge").with_type(ExerciseType::Enrichment),
        );
        c.exercises.push(
            ExerciseRecord::new("x2", "l2", "Puzzle").with_type(ExerciseType::Enrichment),
        );
        c
    }

    #[test]
    fn test_remediation_and_enrichment() {
        let c = curriculum();
        let mut struggling = ProgressRecord::new("l2", ProgressStatus::Completed);
        struggling.needs_remediation = true;
        let mut excelling = ProgressRecord::mastered("e1");
        excelling.eligible_for_enrichment = true;
        let progress = vec![struggling, excelling];

        let recs = PrerequisiteResolver::new(&c, &progress).recommended_content();
        assert_eq!(recs.remediation.len(), 1);
        assert_eq!(recs.remediation[0].content_id, "l2");

        let enrichment: Vec<_> = recs.enrichment.iter().map(|s| s.content_id.as_str()).collect();
        assert_eq!(enrichment, vec!["x1"]);
        assert!(!recs.enrichment[0].is_required);
    }

    #[test]
    fn test_enrichment_deduplicated() {
        let c = curriculum();
        let mut a = ProgressRecord::mastered("l1");
        a.eligible_for_enrichment = true;
        let mut b = ProgressRecord::mastered("x1");
        b.eligible_for_enrichment = true;
        let progress = vec![a, b];
        let recs = PrerequisiteResolver::new(&c, &progress).recommended_content();
        assert_eq!(recs.enrichment.len(), 1);
    }

    #[test]
    fn test_next_is_limited() {
        let c = curriculum();
        let recs = PrerequisiteResolver::new(&c, &[]).recommended_content();
        assert_eq!(recs.next.len(), 5);
        assert!(recs.remediation.is_empty());

        let options = ResolverOptions {
            recommendation_limit: 2,
            ..ResolverOptions::default()
        };
        let recs = PrerequisiteResolver::with_options(&c, &[], options).recommended_content();
        assert_eq!(recs.next.len(), 2);
    }

    #[test]
    fn test_unknown_records_ignored() {
        let c = curriculum();
        let mut ghost = ProgressRecord::new("gone", ProgressStatus::InProgress);
        ghost.needs_remediation = true;
        ghost.eligible_for_enrichment = true;
        let progress = vec![ghost];
        let recs = PrerequisiteResolver::new(&c, &progress).recommended_content();
        assert!(recs.remediation.is_empty());
        assert!(recs.enrichment.is_empty());
    }
}
