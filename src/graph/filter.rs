//! Kind visibility filter and the effective (post-filter) graph.

use crate::graph::Graph;
use crate::resource::ResourceState;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Visibility per resource kind. Kinds never seen are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    kinds: BTreeMap<String, bool>,
}

impl FilterState {
    /// All distinct kinds of `resources`, visible.
    pub fn from_resources(resources: &[ResourceState]) -> Self {
        let mut state = Self::default();
        state.observe(resources.iter().map(|r| r.kind.as_str()));
        state
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self {
            kinds: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Register kinds not seen before as visible; existing toggles are untouched.
    pub fn observe<'a, I>(&mut self, kinds: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for kind in kinds {
            if !self.kinds.contains_key(kind) {
                self.kinds.insert(kind.to_string(), true);
            }
        }
    }

    pub fn is_visible(&self, kind: &str) -> bool {
        self.kinds.get(kind).copied() != Some(false)
    }

    pub fn toggle(&self, kind: &str) -> Self {
        let mut next = self.clone();
        let visible = next.is_visible(kind);
        next.kinds.insert(kind.to_string(), !visible);
        next
    }

    pub fn set_all(&self, visible: bool) -> Self {
        let mut next = self.clone();
        for v in next.kinds.values_mut() {
            *v = visible;
        }
        next
    }

    /// Set every known kind whose name matches `pattern`.
    pub fn set_matching(&self, pattern: &Regex, visible: bool) -> Self {
        let mut next = self.clone();
        for (kind, v) in next.kinds.iter_mut() {
            if pattern.is_match(kind) {
                *v = visible;
            }
        }
        next
    }

    /// Known kinds, sorted.
    pub fn kinds(&self) -> impl Iterator<Item = (&str, bool)> {
        self.kinds.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn visible_kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().filter(|(_, v)| **v).map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Keep visible nodes and the edges whose endpoints are both visible.
pub fn derive_effective_graph(graph: &Graph, filter: &FilterState) -> Graph {
    let mut out = Graph::new();
    for node in graph.nodes() {
        if filter.is_visible(&node.resource.kind) {
            out.upsert_node(node.clone());
        }
    }
    for edge in graph.edges() {
        // add_edge refuses edges with a hidden endpoint.
        out.add_edge(&edge.parent, &edge.child);
    }
    out
}
