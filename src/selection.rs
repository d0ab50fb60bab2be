//! Single-node selection feeding the detail panel.

use crate::graph::Graph;
use crate::resource::ResourceState;

/// At most one selected resource id.
///
/// The stored id survives rebuilds: while it is missing from the current graph
/// `current` reports nothing, and it resolves again once the id comes back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any previous selection.
    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn current<'g>(&self, graph: &'g Graph) -> Option<&'g ResourceState> {
        graph.resource(self.selected.as_deref()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FilterState, RootRule, build, derive_effective_graph};
    use pretty_assertions::assert_eq;

    fn resources() -> Vec<ResourceState> {
        vec![
            ResourceState::new("svc", "Service", "web"),
            ResourceState::new("pod", "Pod", "web-1").with_parents(["svc"]),
        ]
    }

    #[test]
    fn selecting_replaces_previous() {
        let g = build(&resources(), RootRule::Default);
        let mut sel = SelectionState::new();
        sel.select("svc");
        sel.select("pod");

        assert_eq!(sel.current(&g).map(|r| r.name.as_str()), Some("web-1"));
    }

    #[test]
    fn filtered_out_selection_comes_back() {
        let g = build(&resources(), RootRule::Default);
        let filter = FilterState::from_resources(&resources());
        let mut sel = SelectionState::new();
        sel.select("pod");

        let hidden = derive_effective_graph(&g, &filter.toggle("Pod"));
        assert_eq!(sel.current(&hidden), None);
        assert_eq!(sel.selected_id(), Some("pod"));

        let shown = derive_effective_graph(&g, &filter);
        assert_eq!(sel.current(&shown).map(|r| r.id.as_str()), Some("pod"));
    }

    #[test]
    fn clear_forgets_selection() {
        let g = build(&resources(), RootRule::Default);
        let mut sel = SelectionState::new();
        sel.select("svc");
        sel.clear();

        assert_eq!(sel.current(&g), None);
        assert_eq!(sel.selected_id(), None);
    }
}
