//! GraphBuilder for constructing content dependency graphs.
//!
//! Uses a two-phase build:
//!
//! - **Phase 1** creates one node per entity and records the dependencies it
//!   declares through its foreign keys and prerequisite lists.
//! - **Phase 2** resolves every declared dependency. Resolved ones become an
//!   edge plus a `dependents` entry on the target, so the two directions
//!   always agree. Unresolved ones are dropped from the edge set, kept on
//!   the node as `unresolved`, and reported through
//!   [`ContentGraph::dangling`].

use crate::records::Curriculum;
use crate::types::{ContentGraph, ContentNode, ContentType, DanglingDependency, Dependency};
use serde::Serialize;
use std::collections::HashSet;

/// Statistics from a graph build operation.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStats {
    /// Number of nodes created.
    pub nodes_created: usize,
    /// Number of edges created.
    pub edges_created: usize,
    /// Entities skipped because their id was already taken.
    pub duplicate_ids: Vec<String>,
    /// Dangling references, formatted as `from -> missing`.
    pub dangling_refs: Vec<String>,
    /// Repeated declarations of the same dependency.
    pub deduped_edges: usize,
}

/// Builder for [`ContentGraph`].
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    sequential_lessons: bool,
}

impl GraphBuilder {
    /// Creates a builder using only declared dependencies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also make each lesson depend on the previous lesson of its unit.
    pub fn with_sequential_lessons(mut self, enabled: bool) -> Self {
        self.sequential_lessons = enabled;
        self
    }

    /// Builds the graph from a curriculum snapshot.
    pub fn build(&self, curriculum: &Curriculum) -> (ContentGraph, BuildStats) {
        let mut state = BuildState::default();

        // Phase 1: nodes
        for unit in &curriculum.units {
            let deps = unit.prerequisites.iter().map(Dependency::prerequisite);
            state.add_node(&unit.id, ContentType::Unit, &unit.title, deps);
        }

        for lesson in &curriculum.lessons {
            let deps = std::iter::once(Dependency::containment(&lesson.unit_id))
                .chain(lesson.prerequisites.iter().map(Dependency::prerequisite));
            state.add_node(&lesson.id, ContentType::Lesson, &lesson.title, deps);
        }

        if self.sequential_lessons {
            for unit in &curriculum.units {
                for pair in curriculum.lessons_of(&unit.id).windows(2) {
                    state
                        .declared
                        .push((pair[1].id.clone(), Dependency::prerequisite(&pair[0].id)));
                }
            }
        }

        for objective in &curriculum.objectives {
            let deps = objective
                .lesson_id
                .iter()
                .chain(objective.unit_id.iter())
                .map(Dependency::containment);
            state.add_node(
                &objective.id,
                ContentType::Objective,
                &objective.description,
                deps,
            );
        }

        for exercise in &curriculum.exercises {
            let deps = std::iter::once(Dependency::containment(&exercise.lesson_id));
            state.add_node(&exercise.id, ContentType::Exercise, &exercise.title, deps);
        }

        for assessment in &curriculum.assessments {
            let parent = assessment.lesson_id.as_ref().or(assessment.unit_id.as_ref());
            let deps = parent.map(Dependency::containment);
            state.add_node(
                &assessment.id,
                ContentType::Assessment,
                &assessment.title,
                deps,
            );
        }

        // Phase 2: edges
        let BuildState {
            mut graph,
            mut stats,
            declared,
        } = state;
        let mut seen: HashSet<(String, Dependency)> = HashSet::new();
        for (from, dep) in declared {
            if !seen.insert((from.clone(), dep.clone())) {
                stats.deduped_edges += 1;
                continue;
            }
            resolve_dependency(&mut graph, &mut stats, from, dep);
        }

        log::debug!(
            "Built content graph: {} nodes, {} edges, {} dangling",
            stats.nodes_created,
            stats.edges_created,
            stats.dangling_refs.len()
        );
        (graph, stats)
    }
}

#[derive(Default)]
struct BuildState {
    graph: ContentGraph,
    stats: BuildStats,
    declared: Vec<(String, Dependency)>,
}

impl BuildState {
    fn add_node(
        &mut self,
        id: &str,
        content_type: ContentType,
        title: &str,
        deps: impl IntoIterator<Item = Dependency>,
    ) {
        if self.graph.contains_node(id) {
            log::warn!(
                "Duplicate content id '{id}' ({}); keeping the first",
                content_type.as_str()
            );
            self.stats.duplicate_ids.push(id.to_string());
            return;
        }

        let idx = self.graph.graph.add_node(id.to_string());
        self.graph.node_indices.insert(id.to_string(), idx);
        self.graph
            .nodes
            .insert(id.to_string(), ContentNode::new(id, content_type, title));
        self.graph.order.push(id.to_string());
        self.stats.nodes_created += 1;

        self.declared
            .extend(deps.into_iter().map(|dep| (id.to_string(), dep)));
    }
}

fn resolve_dependency(
    graph: &mut ContentGraph,
    stats: &mut BuildStats,
    from: String,
    dep: Dependency,
) {
    let (Some(from_idx), Some(to_idx)) = (graph.get_index(&from), graph.get_index(&dep.id)) else {
        log::warn!(
            "Dangling {} dependency: {} -> {}",
            dep.kind.name(),
            from,
            dep.id
        );
        stats.dangling_refs.push(format!("{} -> {}", from, dep.id));
        graph.dangling.push(DanglingDependency {
            from: from.clone(),
            missing: dep.id.clone(),
            kind: dep.kind,
        });
        if let Some(node) = graph.nodes.get_mut(&from) {
            node.unresolved.push(dep);
        }
        return;
    };

    graph.graph.add_edge(to_idx, from_idx, dep.kind);
    stats.edges_created += 1;

    if let Some(target) = graph.nodes.get_mut(&dep.id)
        && !target.dependents.contains(&from)
    {
        target.dependents.push(from.clone());
    }
    if let Some(node) = graph.nodes.get_mut(&from) {
        node.dependencies.push(dep);
    }
}

// ============================================================================
// Tests
// ============================================================================
