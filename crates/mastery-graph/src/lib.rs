//! Content dependency graph and mastery-gated learning paths.
//!
//! Takes a [`Curriculum`] snapshot plus one learner's [`ProgressRecord`]s and
//! answers: what may the learner open, in what order, and what should they
//! do next.
//!
//! # Modules
//!
//! - [`records`]: curriculum and progress records
//! - [`types`]: graph node, dependency, and graph types
//! - [`builder`]: two-phase graph construction with dangling-reference tracking
//! - [`algorithms`]: topological prerequisite ordering and cycle detection
//! - [`resolver`]: access checks, unit status, next content, learning paths
//! - [`recommend`]: remediation / enrichment / next recommendations
//! - [`analytics`]: curriculum-wide progress summaries
//!
//! # Example
//!
//! ```rust
//! use mastery_graph::{Curriculum, LessonRecord, PrerequisiteResolver, ProgressRecord, UnitRecord};
//!
//! let mut curriculum = Curriculum::default();
//! curriculum.units.push(UnitRecord::new("nouns", "Nouns"));
//! curriculum.lessons.push(LessonRecord::new("intro", "nouns", "What is a noun?"));
//! curriculum
//!     .lessons
//!     .push(LessonRecord::new("proper", "nouns", "Proper nouns").with_prerequisite("intro"));
//!
//! let progress = vec![ProgressRecord::mastered("intro")];
//! let resolver = PrerequisiteResolver::new(&curriculum, &progress);
//! assert!(resolver.are_prerequisites_met("proper"));
//! ```

pub mod algorithms;
pub mod analytics;
pub mod builder;
pub mod recommend;
pub mod records;
pub mod resolver;
pub mod types;

// Re-export key types
pub use algorithms::{PrerequisitesResult, has_cycles, prerequisites_sorted};
pub use analytics::{CurriculumProgress, UnitProgress};
pub use builder::{BuildStats, GraphBuilder};
pub use recommend::Recommendations;
pub use records::{
    AssessmentRecord, Curriculum, ExerciseRecord, LessonRecord, ObjectiveRecord, ProgressRecord,
    ProgressStatus, UnitRecord, progress_from_json,
};
pub use resolver::{
    DEFAULT_RECOMMENDATION_LIMIT, LearningPathSegment, PrerequisiteResolver, ResolverOptions,
};
pub use types::{
    ContentGraph, ContentNode, ContentType, DanglingDependency, Dependency, DependencyKind,
};
