//! Flat resource list -> dependency graph.
//!
//! Rules:
//! - one node per resource id, last write wins on duplicate ids
//! - one edge per listed parent that exists in the snapshot
//! - dangling parents and self-loops are dropped silently
//! - the root rule may add extra root -> resource edges (see `RootRule`)

use crate::graph::{Graph, GraphNode, NodeSize};
use crate::resource::ResourceState;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// Per-platform policy for what counts as an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootRule {
    /// Use `parent_ids` verbatim.
    #[default]
    Default,
    /// Additionally connect the unique root to every resource that declares a
    /// parent but is not reachable from that root through its native links.
    SingleRootFanOut,
}

impl fmt::Display for RootRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootRule::Default => f.write_str("default"),
            RootRule::SingleRootFanOut => f.write_str("single-root-fan-out"),
        }
    }
}

impl FromStr for RootRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(RootRule::Default),
            "single-root-fan-out" | "fan-out" => Ok(RootRule::SingleRootFanOut),
            other => Err(format!("unknown root rule: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    root_rule: RootRule,
    node_size: NodeSize,
}

impl GraphBuilder {
    pub fn new(root_rule: RootRule) -> Self {
        Self {
            root_rule,
            node_size: NodeSize::DEFAULT,
        }
    }

    pub fn node_size(mut self, size: NodeSize) -> Self {
        self.node_size = size;
        self
    }

    pub fn build(&self, resources: &[ResourceState]) -> Graph {
        let mut graph = Graph::new();

        // 1) Nodes, in input order.
        for resource in resources {
            graph.upsert_node(GraphNode {
                resource: resource.clone(),
                width: self.node_size.width,
                height: self.node_size.height,
            });
        }

        // 2) Native parent links. Iterate the deduplicated node set so a
        // replaced duplicate does not contribute its stale parent list.
        let mut native: Vec<(String, String)> = Vec::new();
        for node in graph.nodes() {
            for parent in &node.resource.parent_ids {
                if !graph.contains(parent) {
                    trace!(child = %node.id(), parent = %parent, "dropping dangling parent reference");
                    continue;
                }
                native.push((parent.clone(), node.id().to_string()));
            }
        }
        for (parent, child) in &native {
            graph.add_edge(parent, child);
        }

        // 3) Root policy.
        if self.root_rule == RootRule::SingleRootFanOut {
            fan_out_from_single_root(&mut graph);
        }

        graph
    }
}

/// Build with the default node footprint.
pub fn build(resources: &[ResourceState], root_rule: RootRule) -> Graph {
    GraphBuilder::new(root_rule).build(resources)
}

fn fan_out_from_single_root(graph: &mut Graph) {
    let roots: Vec<String> = graph
        .nodes()
        .iter()
        .filter(|n| n.resource.is_root())
        .map(|n| n.id().to_string())
        .collect();

    let root = match roots.as_slice() {
        [only] => only.clone(),
        _ => {
            debug!(
                roots = roots.len(),
                "single-root fan-out needs exactly one root, keeping native links only"
            );
            return;
        }
    };

    let reachable = reachable_from(graph, &root);

    let missing: Vec<String> = graph
        .nodes()
        .iter()
        .filter(|n| !n.resource.is_root() && !reachable.contains(n.id()))
        .map(|n| n.id().to_string())
        .collect();

    for child in &missing {
        graph.add_edge(&root, child);
    }
    debug!(root = %root, added = missing.len(), "single-root fan-out applied");
}

fn reachable_from(graph: &Graph, start: &str) -> HashSet<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    seen.insert(start.to_string());
    queue.push_back(start.to_string());

    while let Some(cur) = queue.pop_front() {
        for child in graph.children(&cur) {
            if seen.insert(child.to_string()) {
                queue.push_back(child.to_string());
            }
        }
    }
    seen
}
