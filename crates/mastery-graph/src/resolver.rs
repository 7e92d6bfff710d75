//! Mastery-gated access resolution.
//!
//! A [`PrerequisiteResolver`] pairs one curriculum snapshot with one
//! learner's progress records. It builds its own [`ContentGraph`] on
//! construction and answers access questions against it; create a new
//! resolver whenever the snapshot changes.
//!
//! # Access rules
//!
//! A node is unlocked when every dependency is satisfied:
//!
//! - a **containment** dependency is satisfied when the parent is itself
//!   unlocked (an exercise is open when its lesson is open);
//! - a **prerequisite** dependency is satisfied by mastery of the target:
//!   a unit counts once the fraction of its mastered lessons reaches the
//!   unit's threshold, a lesson or objective once its mastery flag is set,
//!   an exercise or assessment once it is completed.
//!
//! Anything that does not resolve (unknown ids, dangling dependencies,
//! containment cycles) is treated as unsatisfied.

use crate::builder::GraphBuilder;
use crate::records::{Curriculum, LessonRecord, ProgressRecord, ProgressStatus};
use crate::types::{ContentGraph, ContentType, DependencyKind};
use mastery_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// Default number of "next" items in recommendations.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Tuning for the resolver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Maximum number of next-content items in recommendations.
    pub recommendation_limit: usize,
    /// Require lessons to be mastered in order within each unit.
    pub sequential_lessons: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            sequential_lessons: false,
        }
    }
}

/// One entry of a learning path or content listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathSegment {
    pub content_id: String,
    pub content_type: ContentType,
    pub title: String,
    pub is_required: bool,
    pub is_unlocked: bool,
    pub progress: ProgressStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

/// Resolves access and ordering for one learner over one curriculum.
pub struct PrerequisiteResolver<'a> {
    pub(crate) curriculum: &'a Curriculum,
    pub(crate) records: &'a [ProgressRecord],
    progress: HashMap<&'a str, &'a ProgressRecord>,
    graph: ContentGraph,
    pub(crate) options: ResolverOptions,
}

impl<'a> PrerequisiteResolver<'a> {
    /// Creates a resolver with default options.
    pub fn new(curriculum: &'a Curriculum, progress: &'a [ProgressRecord]) -> Self {
        Self::with_options(curriculum, progress, ResolverOptions::default())
    }

    /// Creates a resolver with explicit options.
    ///
    /// When several records share a content id the last one wins.
    pub fn with_options(
        curriculum: &'a Curriculum,
        progress: &'a [ProgressRecord],
        options: ResolverOptions,
    ) -> Self {
        let (graph, _) = GraphBuilder::new()
            .with_sequential_lessons(options.sequential_lessons)
            .build(curriculum);
        let by_id = progress
            .iter()
            .map(|record| (record.content_id.as_str(), record))
            .collect();
        Self {
            curriculum,
            records: progress,
            progress: by_id,
            graph,
            options,
        }
    }

    /// The dependency graph built for this snapshot.
    pub fn graph(&self) -> &ContentGraph {
        &self.graph
    }

    pub(crate) fn record(&self, id: &str) -> Option<&'a ProgressRecord> {
        self.progress.get(id).copied()
    }

    fn is_mastered(&self, id: &str) -> bool {
        self.record(id).is_some_and(|r| r.mastery_achieved)
    }

    /// The learner's status on any content item.
    ///
    /// Units derive their status from their lessons; see
    /// [`unit_status`](Self::unit_status).
    pub fn status_of(&self, id: &str) -> ProgressStatus {
        match self.graph.get_node(id).map(|n| n.content_type) {
            Some(ContentType::Unit) => self.unit_status(id),
            _ => self
                .record(id)
                .map(ProgressRecord::effective_status)
                .unwrap_or_default(),
        }
    }

    // ========================================================================
    // Access checks
    // ========================================================================

    /// Whether every dependency of `node_id` is satisfied.
    ///
    /// Unknown ids are never unlocked.
    pub fn are_prerequisites_met(&self, node_id: &str) -> bool {
        self.unlocked(node_id, &mut HashSet::new())
    }

    fn unlocked(&self, id: &str, visiting: &mut HashSet<String>) -> bool {
        let Some(node) = self.graph.get_node(id) else {
            log::debug!("Unknown content id '{id}' is locked");
            return false;
        };
        if node.has_unresolved() {
            log::debug!("'{id}' has unresolved dependencies; locked");
            return false;
        }
        if !visiting.insert(id.to_string()) {
            log::warn!("Containment cycle through '{id}'; treating as locked");
            return false;
        }

        let met = node.dependencies.iter().all(|dep| match dep.kind {
            DependencyKind::Containment => self.unlocked(&dep.id, visiting),
            DependencyKind::Prerequisite => self.is_satisfied(&dep.id),
        });
        visiting.remove(id);
        met
    }

    /// Whether a prerequisite target counts as done.
    fn is_satisfied(&self, id: &str) -> bool {
        match self.graph.get_node(id).map(|n| n.content_type) {
            Some(ContentType::Unit) => self.is_unit_satisfied(id),
            Some(ContentType::Lesson | ContentType::Objective) => self.is_mastered(id),
            Some(ContentType::Exercise | ContentType::Assessment) => self
                .record(id)
                .is_some_and(|r| r.effective_status() >= ProgressStatus::Completed),
            None => false,
        }
    }

    /// Whether a unit counts as satisfied for prerequisite purposes.
    ///
    /// True when mastery is recorded for the unit itself, or when the
    /// fraction of mastered lessons reaches the unit's threshold. A unit
    /// without lessons is satisfied only through a direct record.
    pub fn is_unit_satisfied(&self, unit_id: &str) -> bool {
        if self.is_mastered(unit_id) {
            return true;
        }
        let Some(unit) = self.curriculum.unit(unit_id) else {
            return false;
        };
        let lessons = self.curriculum.lessons_of(unit_id);
        if lessons.is_empty() {
            return false;
        }
        self.mastered_fraction(&lessons) >= unit.mastery_threshold
    }

    fn mastered_fraction(&self, lessons: &[&LessonRecord]) -> f64 {
        let mastered = lessons.iter().filter(|l| self.is_mastered(&l.id)).count();
        mastered as f64 / lessons.len() as f64
    }

    /// Mean lesson score across a unit. Mastered lessons without a score
    /// count as 1.0, untouched lessons as 0.0.
    fn unit_score(&self, lessons: &[&LessonRecord]) -> f64 {
        let total: f64 = lessons
            .iter()
            .map(|lesson| match self.record(&lesson.id) {
                Some(r) => r
                    .score
                    .unwrap_or(if r.mastery_achieved { 1.0 } else { 0.0 }),
                None => 0.0,
            })
            .sum();
        total / lessons.len() as f64
    }

    /// The learner's status on a unit.
    ///
    /// - Mastered when mastery is recorded for the unit itself.
    /// - Not started while no lesson is mastered.
    /// - Mastered when the mastered-lesson fraction and the unit score both
    ///   reach the unit's threshold.
    /// - Otherwise in progress while some lessons remain, completed when all
    ///   are mastered.
    ///
    /// Use [`unit_has_activity`](Self::unit_has_activity) to tell an
    /// untouched unit from one that is started but has nothing mastered.
    pub fn unit_status(&self, unit_id: &str) -> ProgressStatus {
        if self.is_mastered(unit_id) {
            return ProgressStatus::Mastered;
        }
        let Some(unit) = self.curriculum.unit(unit_id) else {
            return ProgressStatus::NotStarted;
        };

        let lessons = self.curriculum.lessons_of(unit_id);
        let mastered = lessons.iter().filter(|l| self.is_mastered(&l.id)).count();
        if mastered == 0 {
            return ProgressStatus::NotStarted;
        }

        let threshold = unit.mastery_threshold;
        if self.mastered_fraction(&lessons) >= threshold && self.unit_score(&lessons) >= threshold {
            ProgressStatus::Mastered
        } else if mastered < lessons.len() {
            ProgressStatus::InProgress
        } else {
            ProgressStatus::Completed
        }
    }

    /// Whether the unit or any of its lessons has recorded activity.
    pub fn unit_has_activity(&self, unit_id: &str) -> bool {
        std::iter::once(unit_id)
            .chain(
                self.curriculum
                    .lessons_of(unit_id)
                    .into_iter()
                    .map(|l| l.id.as_str()),
            )
            .filter_map(|id| self.record(id))
            .any(|r| r.status > ProgressStatus::NotStarted || r.attempts > 0)
    }

    // ========================================================================
    // Listings
    // ========================================================================

    pub(crate) fn segment(
        &self,
        id: &str,
        is_required: bool,
        is_unlocked: bool,
    ) -> Option<LearningPathSegment> {
        let node = self.graph.get_node(id)?;
        Some(LearningPathSegment {
            content_id: node.id.clone(),
            content_type: node.content_type,
            title: node.title.clone(),
            is_required,
            is_unlocked,
            progress: self.status_of(id),
            estimated_minutes: self.estimated_minutes(id, node.content_type),
        })
    }

    fn estimated_minutes(&self, id: &str, content_type: ContentType) -> Option<u32> {
        let c = self.curriculum;
        match content_type {
            ContentType::Lesson => c.lesson(id).and_then(|l| l.estimated_minutes),
            ContentType::Exercise => c
                .exercises
                .iter()
                .find(|e| e.id == id)
                .and_then(|e| e.estimated_minutes),
            ContentType::Assessment => c
                .assessments
                .iter()
                .find(|a| a.id == id)
                .and_then(|a| a.estimated_minutes),
            ContentType::Unit | ContentType::Objective => None,
        }
    }

    /// Content the learner can work on now.
    ///
    /// First every unlocked lesson not yet mastered, then the unfinished
    /// exercises of unlocked lessons already in progress. Sorted with
    /// required items first, then by content type priority; ties keep
    /// curriculum order.
    pub fn next_available_content(&self) -> Vec<LearningPathSegment> {
        let lessons: Vec<&LessonRecord> = self
            .curriculum
            .units_in_order()
            .into_iter()
            .flat_map(|unit| self.curriculum.lessons_of(&unit.id))
            .collect();

        let mut segments = Vec::new();
        for lesson in &lessons {
            if !self.is_mastered(&lesson.id) && self.are_prerequisites_met(&lesson.id) {
                segments.extend(self.segment(&lesson.id, true, true));
            }
        }

        for lesson in &lessons {
            if self.status_of(&lesson.id) != ProgressStatus::InProgress
                || !self.are_prerequisites_met(&lesson.id)
            {
                continue;
            }
            for exercise in self.curriculum.exercises_of(&lesson.id) {
                if self.status_of(&exercise.id) < ProgressStatus::Completed {
                    segments.extend(self.segment(&exercise.id, exercise.is_required(), true));
                }
            }
        }

        segments.sort_by_key(|s| (Reverse(s.is_required), s.content_type.priority()));
        segments
    }

    /// An ordered, access-annotated path through one unit or all units.
    ///
    /// Each lesson is followed by its exercises (open once the lesson is
    /// started) and its assessments (open once the lesson is mastered).
    /// Unit-level assessments close each unit and open once the unit is
    /// satisfied.
    pub fn generate_learning_path(
        &self,
        target_unit_id: Option<&str>,
    ) -> Result<Vec<LearningPathSegment>> {
        let units = match target_unit_id {
            Some(id) => vec![
                self.curriculum
                    .unit(id)
                    .ok_or_else(|| Error::not_found("unit", id))?,
            ],
            None => self.curriculum.units_in_order(),
        };

        let mut path = Vec::new();
        for unit in units {
            for lesson in self.curriculum.lessons_of(&unit.id) {
                let unlocked = self.are_prerequisites_met(&lesson.id);
                let status = self.status_of(&lesson.id);
                path.extend(self.segment(&lesson.id, true, unlocked));

                for exercise in self.curriculum.exercises_of(&lesson.id) {
                    let open = unlocked && status >= ProgressStatus::InProgress;
                    path.extend(self.segment(&exercise.id, exercise.is_required(), open));
                }
                for assessment in self.curriculum.assessments_of_lesson(&lesson.id) {
                    let open = unlocked && status == ProgressStatus::Mastered;
                    path.extend(self.segment(&assessment.id, true, open));
                }
            }

            for assessment in self.curriculum.assessments_of_unit(&unit.id) {
                let open =
                    self.are_prerequisites_met(&assessment.id) && self.is_unit_satisfied(&unit.id);
                path.extend(self.segment(&assessment.id, true, open));
            }
        }

        log::debug!("Generated learning path with {} segments", path.len());
        Ok(path)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AssessmentRecord, ExerciseRecord, UnitRecord};
    use mastery_content::ExerciseType;

    fn curriculum() -> Curriculum {
        let mut c = Curriculum::default();
        let mut u1 = UnitRecord::new("u1", "Nouns");
        u1.order_index = 1;
        let mut u2 = UnitRecord::new("u2", "Verbs");
        u2.order_index = 2;
        u2.prerequisites.push("u1".into());
        c.units.extend([u2, u1]);

        c.lessons.push(LessonRecord::new("l1", "u1", "What is a noun?").with_order(1));
        c.lessons.push(
            LessonRecord::new("l2", "u1", "Proper nouns")
                .with_order(2)
                .with_prerequisite("l1"),
        );
        c.lessons.push(LessonRecord::new("l3", "u2", "Action verbs").with_order(1));

        c.exercises.push(ExerciseRecord::new("e1", "l1", "Find the noun").with_order(1));
        c.exercises.push(
            ExerciseRecord::new("e2", "l1", "Noun poetry")
                .with_type(ExerciseType::Enrichment)
                .with_order(2),
        );
        c.assessments.push(AssessmentRecord::for_lesson("a1", "l1", "Exit ticket"));
        c.assessments.push(AssessmentRecord::for_unit("a2", "u1", "Unit test"));
        c
    }

    fn ids(segments: &[LearningPathSegment]) -> Vec<&str> {
        segments.iter().map(|s| s.content_id.as_str()).collect()
    }

    // ------------------------------------------------------------------------
    // Prerequisite checks
    // ------------------------------------------------------------------------

    #[test]
    fn test_fresh_learner_access() {
        let c = curriculum();
        let resolver = PrerequisiteResolver::new(&c, &[]);
        assert!(resolver.are_prerequisites_met("u1"));
        assert!(resolver.are_prerequisites_met("l1"));
        assert!(resolver.are_prerequisites_met("e1"));
        assert!(!resolver.are_prerequisites_met("l2"));
        assert!(!resolver.are_prerequisites_met("u2"));
        assert!(!resolver.are_prerequisites_met("l3"));
    }

    #[test]
    fn test_unknown_id_is_locked() {
        let c = curriculum();
        let resolver = PrerequisiteResolver::new(&c, &[]);
        assert!(!resolver.are_prerequisites_met("missing"));
    }

    #[test]
    fn test_dangling_prerequisite_fails_closed() {
        let mut c = curriculum();
        c.lessons[0].prerequisites.push("deleted-lesson".into());
        let resolver = PrerequisiteResolver::new(&c, &[]);
        assert!(!resolver.are_prerequisites_met("l1"));
        assert!(!resolver.are_prerequisites_met("e1"));
        assert_eq!(resolver.graph().dangling().len(), 1);
    }

    #[test]
    fn test_mastery_unlocks_next_lesson() {
        let c = curriculum();
        let progress = vec![ProgressRecord::mastered("l1")];
        let resolver = PrerequisiteResolver::new(&c, &progress);
        assert!(resolver.are_prerequisites_met("l2"));
    }

    #[test]
    fn test_unit_prerequisite_uses_threshold() {
        let c = curriculum();
        // 1 of 2 lessons mastered is below the default 0.8 threshold
        let progress = vec![ProgressRecord::mastered("l1")];
        let resolver = PrerequisiteResolver::new(&c, &progress);
        assert!(!resolver.is_unit_satisfied("u1"));
        assert!(!resolver.are_prerequisites_met("l3"));

        let progress = vec![ProgressRecord::mastered("l1"), ProgressRecord::mastered("l2")];
        let resolver = PrerequisiteResolver::new(&c, &progress);
        assert!(resolver.is_unit_satisfied("u1"));
        assert!(resolver.are_prerequisites_met("l3"));
    }

    #[test]
    fn test_unit_without_lessons_is_unsatisfied() {
        let mut c = Curriculum::default();
        c.units.push(UnitRecord::new("empty", "Empty"));
        let resolver = PrerequisiteResolver::new(&c, &[]);
        assert!(!resolver.is_unit_satisfied("empty"));
        assert_eq!(resolver.unit_status("empty"), ProgressStatus::NotStarted);
    }

    #[test]
    fn test_sequential_lessons_option() {
        let mut c = curriculum();
        c.lessons[1].prerequisites.clear();
        let resolver = PrerequisiteResolver::new(&c, &[]);
        assert!(resolver.are_prerequisites_met("l2"));

        let options = ResolverOptions {
            sequential_lessons: true,
            ..ResolverOptions::default()
        };
        let resolver = PrerequisiteResolver::with_options(&c, &[], options);
        assert!(!resolver.are_prerequisites_met("l2"));
    }

    // ------------------------------------------------------------------------
    // Unit status
    // ------------------------------------------------------------------------

    fn two_lesson_unit() -> Curriculum {
        let mut c = Curriculum::default();
        let mut unit = UnitRecord::new("u", "Unit");
        unit.mastery_threshold = 0.5;
        c.units.push(unit);
        c.lessons.push(LessonRecord::new("a", "u", "A").with_order(1));
        c.lessons.push(LessonRecord::new("b", "u", "B").with_order(2));
        c
    }

    #[test]
    fn test_unit_status_progression() {
        let c = two_lesson_unit();
        assert_eq!(
            PrerequisiteResolver::new(&c, &[]).unit_status("u"),
            ProgressStatus::NotStarted
        );

        // Activity without a mastered lesson leaves the unit not started.
        let started = vec![ProgressRecord::new("a", ProgressStatus::InProgress)];
        let resolver = PrerequisiteResolver::new(&c, &started);
        assert_eq!(resolver.unit_status("u"), ProgressStatus::NotStarted);
        assert!(resolver.unit_has_activity("u"));
        assert!(!PrerequisiteResolver::new(&c, &[]).unit_has_activity("u"));

        let direct = vec![ProgressRecord::mastered("u")];
        assert_eq!(
            PrerequisiteResolver::new(&c, &direct).unit_status("u"),
            ProgressStatus::Mastered
        );
    }

    #[test]
    fn test_unit_mastery_boundary() {
        let c = two_lesson_unit();

        // Half the lessons mastered, but the unit score stays below 0.5.
        let low = vec![ProgressRecord::mastered("a").with_score(0.8)];
        assert_eq!(
            PrerequisiteResolver::new(&c, &low).unit_status("u"),
            ProgressStatus::InProgress
        );

        // Same count, and the score average reaches 0.5.
        let high = vec![
            ProgressRecord::mastered("a").with_score(0.8),
            ProgressRecord::new("b", ProgressStatus::InProgress).with_score(0.2),
        ];
        assert_eq!(
            PrerequisiteResolver::new(&c, &high).unit_status("u"),
            ProgressStatus::Mastered
        );
    }

    #[test]
    fn test_all_mastered_low_scores_is_completed() {
        let c = two_lesson_unit();
        let progress = vec![
            ProgressRecord::mastered("a").with_score(0.3),
            ProgressRecord::mastered("b").with_score(0.3),
        ];
        assert_eq!(
            PrerequisiteResolver::new(&c, &progress).unit_status("u"),
            ProgressStatus::Completed
        );
    }

    // ------------------------------------------------------------------------
    // Listings
    // ------------------------------------------------------------------------

    #[test]
    fn test_next_available_fresh() {
        let c = curriculum();
        let resolver = PrerequisiteResolver::new(&c, &[]);
        assert_eq!(ids(&resolver.next_available_content()), vec!["l1"]);
    }

    #[test]
    fn test_next_available_sorted_by_requirement_and_type() {
        let c = curriculum();
        let progress = vec![ProgressRecord::new("l1", ProgressStatus::InProgress)];
        let resolver = PrerequisiteResolver::new(&c, &progress);
        let next = resolver.next_available_content();
        assert_eq!(ids(&next), vec!["l1", "e1", "e2"]);
        assert!(!next[2].is_required);
        assert_eq!(next[0].progress, ProgressStatus::InProgress);
    }

    #[test]
    fn test_next_available_skips_finished_exercises() {
        let c = curriculum();
        let progress = vec![
            ProgressRecord::new("l1", ProgressStatus::InProgress),
            ProgressRecord::new("e1", ProgressStatus::Completed),
        ];
        let resolver = PrerequisiteResolver::new(&c, &progress);
        assert_eq!(ids(&resolver.next_available_content()), vec!["l1", "e2"]);
    }

    #[test]
    fn test_learning_path_gating() {
        let c = curriculum();
        let resolver = PrerequisiteResolver::new(&c, &[]);
        let path = resolver.generate_learning_path(Some("u1")).unwrap();
        assert_eq!(ids(&path), vec!["l1", "e1", "e2", "a1", "l2", "a2"]);

        let unlocked: Vec<bool> = path.iter().map(|s| s.is_unlocked).collect();
        assert_eq!(unlocked, vec![true, false, false, false, false, false]);
    }

    #[test]
    fn test_learning_path_after_mastery() {
        let c = curriculum();
        let progress = vec![ProgressRecord::mastered("l1")];
        let resolver = PrerequisiteResolver::new(&c, &progress);
        let path = resolver.generate_learning_path(Some("u1")).unwrap();
        let unlocked: HashMap<&str, bool> = path
            .iter()
            .map(|s| (s.content_id.as_str(), s.is_unlocked))
            .collect();
        assert!(unlocked["e1"]);
        assert!(unlocked["a1"]);
        assert!(unlocked["l2"]);
        assert!(!unlocked["a2"]);
    }

    #[test]
    fn test_learning_path_all_units_in_order() {
        let c = curriculum();
        let resolver = PrerequisiteResolver::new(&c, &[]);
        let path = resolver.generate_learning_path(None).unwrap();
        assert_eq!(path.first().unwrap().content_id, "l1");
        assert_eq!(path.last().unwrap().content_id, "l3");
    }

    #[test]
    fn test_learning_path_unknown_unit() {
        let c = curriculum();
        let resolver = PrerequisiteResolver::new(&c, &[]);
        let err = resolver.generate_learning_path(Some("u9")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
