//! Graph layer: resource dependency graph, its builder and the kind filter.
//!
//! A `Graph` is always rebuilt from scratch, never patched, and every edge
//! endpoint is guaranteed to be present in `nodes`.

pub mod build;
pub mod filter;

pub use build::{GraphBuilder, RootRule, build};
pub use filter::{FilterState, derive_effective_graph};

use crate::resource::ResourceState;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Fixed footprint every node gets in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeSize {
    pub width: f64,
    pub height: f64,
}

impl NodeSize {
    pub const DEFAULT: NodeSize = NodeSize {
        width: 300.0,
        height: 72.0,
    };
}

impl Default for NodeSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub resource: ResourceState,
    pub width: f64,
    pub height: f64,
}

impl GraphNode {
    pub fn id(&self) -> &str {
        &self.resource.id
    }
}

/// Directed edge `parent -> child`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Edge {
    pub parent: String,
    pub child: String,
}

impl Edge {
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.parent == id || self.child == id
    }
}

/// Node set keyed by id (kept in insertion order) plus a deduplicated edge list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_set: HashSet<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing the resource of an existing node with the same id in place.
    pub(crate) fn upsert_node(&mut self, node: GraphNode) {
        match self.index.get(node.id()) {
            Some(&i) => self.nodes[i] = node,
            None => {
                self.index.insert(node.id().to_string(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Add `parent -> child` if both endpoints exist, it is not a self-loop and not a duplicate.
    /// Returns whether the edge was added.
    pub(crate) fn add_edge(&mut self, parent: &str, child: &str) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return false;
        }
        let edge = Edge::new(parent, child);
        if !self.edge_set.insert(edge.clone()) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn resource(&self, id: &str) -> Option<&ResourceState> {
        self.node(id).map(|n| &n.resource)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn has_edge(&self, parent: &str, child: &str) -> bool {
        self.edge_set.contains(&Edge::new(parent, child))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.parent == id)
            .map(|e| e.child.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(id: &str) -> GraphNode {
        GraphNode {
            resource: ResourceState::new(id, "Pod", id),
            width: 1.0,
            height: 1.0,
        }
    }

    #[test]
    fn edges_require_both_endpoints() {
        let mut g = Graph::new();
        g.upsert_node(node("a"));
        g.upsert_node(node("b"));

        assert!(g.add_edge("a", "b"));
        assert!(!g.add_edge("a", "b"));
        assert!(!g.add_edge("a", "a"));
        assert!(!g.add_edge("a", "missing"));
        assert_eq!(g.edges(), &[Edge::new("a", "b")]);
    }

    #[test]
    fn upsert_keeps_first_position() {
        let mut g = Graph::new();
        g.upsert_node(node("a"));
        g.upsert_node(node("b"));
        let mut replacement = node("a");
        replacement.resource.name = "renamed".to_string();
        g.upsert_node(replacement);

        let ids: Vec<&str> = g.nodes().iter().map(GraphNode::id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(g.resource("a").map(|r| r.name.as_str()), Some("renamed"));
    }
}
