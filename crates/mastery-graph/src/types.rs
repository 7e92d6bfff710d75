//! Core graph types.
//!
//! A [`ContentGraph`] holds one [`ContentNode`] per curriculum entity. An
//! edge from A to B means B depends on A. Nodes keep both directions of
//! every edge (`dependencies` and `dependents`) so traversal never needs the
//! petgraph indices, while the wrapped `DiGraph` serves the petgraph
//! algorithms.

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// ContentType enum
// ============================================================================

/// Kind of curriculum entity a node stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Unit,
    Lesson,
    Objective,
    Exercise,
    Assessment,
}

impl ContentType {
    /// Sort priority in next-content listings (lower comes first).
    pub fn priority(&self) -> u8 {
        match self {
            Self::Lesson => 1,
            Self::Exercise => 2,
            Self::Assessment => 3,
            Self::Objective => 4,
            Self::Unit => 5,
        }
    }

    /// Returns the type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Lesson => "lesson",
            Self::Objective => "objective",
            Self::Exercise => "exercise",
            Self::Assessment => "assessment",
        }
    }
}

// ============================================================================
// Dependency types
// ============================================================================

/// Why one node depends on another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// The target is the natural parent (lesson → unit, exercise → lesson).
    #[default]
    Containment,
    /// The target must be mastered first.
    Prerequisite,
}

impl DependencyKind {
    /// Returns the kind name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Containment => "containment",
            Self::Prerequisite => "prerequisite",
        }
    }
}

/// One outgoing dependency of a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// Id of the node depended upon.
    pub id: String,
    pub kind: DependencyKind,
}

impl Dependency {
    /// Creates a containment dependency.
    pub fn containment(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: DependencyKind::Containment,
        }
    }

    /// Creates a prerequisite dependency.
    pub fn prerequisite(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: DependencyKind::Prerequisite,
        }
    }
}

/// A dependency whose target id matched no node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingDependency {
    /// Node declaring the dependency.
    pub from: String,
    /// Id that failed to resolve.
    pub missing: String,
    pub kind: DependencyKind,
}

// ============================================================================
// ContentNode struct
// ============================================================================

/// A node in the content graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    pub id: String,
    pub content_type: ContentType,
    pub title: String,
    /// Resolved dependencies, in declaration order.
    pub dependencies: Vec<Dependency>,
    /// Ids of nodes that depend on this one.
    pub dependents: Vec<String>,
    /// Declared dependencies whose targets do not exist.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<Dependency>,
}

impl ContentNode {
    /// Creates a node with no edges.
    pub fn new(id: impl Into<String>, content_type: ContentType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content_type,
            title: title.into(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    /// Ids of all resolved dependencies.
    pub fn dependency_ids(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(|d| d.id.as_str())
    }

    /// Whether any declared dependency failed to resolve.
    pub fn has_unresolved(&self) -> bool {
        !self.unresolved.is_empty()
    }
}

// ============================================================================
// ContentGraph struct
// ============================================================================

/// Dependency graph over a curriculum snapshot.
///
/// Built once by [`GraphBuilder`](crate::GraphBuilder) and never mutated
/// afterwards.
#[derive(Clone, Debug, Default)]
pub struct ContentGraph {
    /// The underlying directed graph; node weights are content ids.
    pub graph: DiGraph<String, DependencyKind>,
    /// Lookup table: content id → petgraph NodeIndex.
    pub node_indices: HashMap<String, NodeIndex>,
    /// Lookup table: content id → node.
    pub nodes: HashMap<String, ContentNode>,
    /// Insertion order of node ids.
    pub(crate) order: Vec<String>,
    pub(crate) dangling: Vec<DanglingDependency>,
}

impl ContentGraph {
    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of resolved edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Gets a node by id.
    pub fn get_node(&self, id: &str) -> Option<&ContentNode> {
        self.nodes.get(id)
    }

    /// Gets the petgraph NodeIndex for a content id.
    pub fn get_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    /// Checks if a node exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in the order they were added.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &ContentNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Every dependency dropped because its target was unknown.
    pub fn dangling(&self) -> &[DanglingDependency] {
        &self.dangling
    }

    /// Nodes that `id` directly depends on.
    pub fn dependencies_of(&self, id: &str) -> mastery_core::Result<Vec<&ContentNode>> {
        let node = self
            .get_node(id)
            .ok_or_else(|| mastery_core::Error::not_found("node", id))?;
        Ok(node
            .dependency_ids()
            .filter_map(|dep| self.nodes.get(dep))
            .collect())
    }

    /// Nodes that directly depend on `id`.
    pub fn dependents_of(&self, id: &str) -> mastery_core::Result<Vec<&ContentNode>> {
        let node = self
            .get_node(id)
            .ok_or_else(|| mastery_core::Error::not_found("node", id))?;
        Ok(node
            .dependents
            .iter()
            .filter_map(|dep| self.nodes.get(dep))
            .collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
