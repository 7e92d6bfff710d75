//! Graph algorithms over the content graph.
//!
//! Provides:
//! - Dependency closure in learning order (fundamentals first)
//! - Cycle detection

use crate::types::{ContentGraph, ContentNode};
use mastery_core::Result;
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use std::collections::{HashSet, VecDeque};

/// Result of prerequisites analysis.
#[derive(Clone, Debug)]
pub struct PrerequisitesResult {
    /// Transitive dependencies in topological order (learn first → learn last).
    pub ordered: Vec<ContentNode>,
    /// The target node.
    pub target: ContentNode,
    /// Whether cycles were detected (if true, ordering is approximate).
    pub has_cycles: bool,
}

/// Get everything a node transitively depends on, in learning order.
///
/// Walks dependency edges backwards from the target, then orders the
/// collected nodes with a topological sort of the whole graph. When the
/// graph has a cycle the nodes come back in insertion order and
/// `has_cycles` is set.
pub fn prerequisites_sorted(graph: &ContentGraph, target_id: &str) -> Result<PrerequisitesResult> {
    let target = graph
        .get_node(target_id)
        .ok_or_else(|| mastery_core::Error::not_found("node", target_id))?
        .clone();
    let target_idx = graph
        .get_index(target_id)
        .ok_or_else(|| mastery_core::Error::not_found("node index", target_id))?;

    let mut prereq_indices: HashSet<NodeIndex> = HashSet::new();
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();
    queue.push_back(target_idx);

    while let Some(current) = queue.pop_front() {
        for source in graph.graph.neighbors_directed(current, Direction::Incoming) {
            if source != target_idx && prereq_indices.insert(source) {
                queue.push_back(source);
            }
        }
    }

    if prereq_indices.is_empty() {
        return Ok(PrerequisitesResult {
            ordered: Vec::new(),
            target,
            has_cycles: false,
        });
    }

    let (ordered, has_cycles) = match toposort(&graph.graph, None) {
        Ok(all_sorted) => {
            let ordered = all_sorted
                .into_iter()
                .filter(|idx| prereq_indices.contains(idx))
                .filter_map(|idx| graph.get_node(&graph.graph[idx]).cloned())
                .collect();
            (ordered, false)
        }
        Err(cycle) => {
            log::warn!(
                "Dependency cycle through '{}'; prerequisite order is approximate",
                graph.graph[cycle.node_id()]
            );
            let ordered = graph
                .iter_nodes()
                .filter(|node| {
                    graph
                        .get_index(&node.id)
                        .is_some_and(|idx| prereq_indices.contains(&idx))
                })
                .cloned()
                .collect();
            (ordered, true)
        }
    };

    Ok(PrerequisitesResult {
        ordered,
        target,
        has_cycles,
    })
}

/// Whether the graph contains a dependency cycle.
pub fn has_cycles(graph: &ContentGraph) -> bool {
    toposort(&graph.graph, None).is_err()
}

// ============================================================================
// ContentGraph convenience methods
// ============================================================================

impl ContentGraph {
    /// Transitive dependencies of a node in learning order.
    pub fn prerequisites_sorted(&self, node_id: &str) -> Result<Vec<ContentNode>> {
        prerequisites_sorted(self, node_id).map(|result| result.ordered)
    }

    /// Whether the graph contains a dependency cycle.
    pub fn has_cycles(&self) -> bool {
        has_cycles(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::records::{Curriculum, LessonRecord, UnitRecord};

    fn chain() -> ContentGraph {
        let mut c = Curriculum::default();
        c.units.push(UnitRecord::new("u1", "Grammar"));
        c.lessons.push(LessonRecord::new("l1", "u1", "Nouns"));
        c.lessons
            .push(LessonRecord::new("l2", "u1", "Verbs").with_prerequisite("l1"));
        c.lessons
            .push(LessonRecord::new("l3", "u1", "Sentences").with_prerequisite("l2"));
        GraphBuilder::new().build(&c).0
    }

    fn ids(nodes: &[ContentNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_prerequisites_sorted() {
        let graph = chain();
        let result = prerequisites_sorted(&graph, "l3").unwrap();
        assert!(!result.has_cycles);
        assert_eq!(result.target.id, "l3");

        let ordered = ids(&result.ordered);
        assert_eq!(ordered.len(), 3);
        let pos = |id| ordered.iter().position(|n| *n == id).unwrap();
        assert!(pos("u1") < pos("l1"));
        assert!(pos("l1") < pos("l2"));
    }

    #[test]
    fn test_prerequisites_no_deps() {
        let graph = chain();
        let result = prerequisites_sorted(&graph, "u1").unwrap();
        assert!(result.ordered.is_empty());
    }

    #[test]
    fn test_prerequisites_not_found() {
        let graph = chain();
        assert!(prerequisites_sorted(&graph, "nope").is_err());
    }

    #[test]
    fn test_cycle_detected() {
        let mut c = Curriculum::default();
        c.units.push(UnitRecord::new("u1", "Grammar"));
        c.lessons
            .push(LessonRecord::new("l1", "u1", "A").with_prerequisite("l2"));
        c.lessons
            .push(LessonRecord::new("l2", "u1", "B").with_prerequisite("l1"));
        let graph = GraphBuilder::new().build(&c).0;

        assert!(graph.has_cycles());
        let result = prerequisites_sorted(&graph, "l1").unwrap();
        assert!(result.has_cycles);
        assert_eq!(ids(&result.ordered), vec!["u1", "l2"]);
    }

    #[test]
    fn test_acyclic_graph() {
        assert!(!chain().has_cycles());
        assert_eq!(ids(&chain().prerequisites_sorted("l2").unwrap()).len(), 2);
    }
}
