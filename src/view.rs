//! View composition: one renderer-agnostic graph view for every platform.
//!
//! Every input change re-runs build -> filter -> layout -> geometry as one
//! step and swaps in the new frame, so a renderer never sees a layout that
//! was computed against an older filter or snapshot.

use crate::config::ViewConfig;
use crate::error::LayoutError;
use crate::graph::{FilterState, Graph, GraphBuilder, RootRule, derive_effective_graph};
use crate::layout::{
    EdgeGeometry, GeometryOptions, LayeredLayout, LayoutAdapter, LayoutEngine, LayoutResult,
    edge_geometry,
};
use crate::resource::{CollectionKey, Platform, ResourceState};
use crate::selection::SelectionState;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub resource: ResourceState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedEdge {
    pub parent: String,
    pub child: String,
    #[serde(flatten)]
    pub geometry: EdgeGeometry,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

/// Everything a renderer needs for one recompute cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub nodes: Vec<RenderedNode>,
    pub edges: Vec<RenderedEdge>,
    pub canvas: Canvas,

    #[serde(skip)]
    pub graph: Graph,
    #[serde(skip)]
    pub effective: Graph,
    #[serde(skip)]
    pub layout: LayoutResult,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Output of the view: a frame, or the reason the state cannot be shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Ready(Frame),
    Unavailable { reason: String },
}

/// Run the whole pipeline once. Layout failures are returned, not recovered.
pub fn compute_frame<E: LayoutEngine>(
    resources: &[ResourceState],
    builder: &GraphBuilder,
    filter: &FilterState,
    adapter: &LayoutAdapter<E>,
    geometry: &GeometryOptions,
) -> Result<Frame, LayoutError> {
    let graph = builder.build(resources);
    let effective = derive_effective_graph(&graph, filter);
    let layout = adapter.layout(&effective)?;

    let nodes: Vec<RenderedNode> = effective
        .nodes()
        .iter()
        .filter_map(|n| {
            let p = layout.position(n.id())?;
            Some(RenderedNode {
                id: n.id().to_string(),
                x: p.x,
                y: p.y,
                resource: n.resource.clone(),
            })
        })
        .collect();

    let edges: Vec<RenderedEdge> = layout
        .edges
        .iter()
        .filter_map(|route| {
            Some(RenderedEdge {
                parent: route.edge.parent.clone(),
                child: route.edge.child.clone(),
                geometry: edge_geometry(&route.points, geometry)?,
            })
        })
        .collect();

    let canvas = Canvas {
        width: layout.width + geometry.node.width,
        height: layout.height + geometry.node.height,
    };

    debug!(
        resources = resources.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        visible_nodes = effective.node_count(),
        visible_edges = effective.edge_count(),
        "recomputed graph view"
    );

    Ok(Frame {
        nodes,
        edges,
        canvas,
        graph,
        effective,
        layout,
    })
}

/// Caller-owned state (snapshot, filter, selection) plus the last frame.
pub struct GraphView<E = LayeredLayout> {
    builder: GraphBuilder,
    adapter: LayoutAdapter<E>,
    geometry: GeometryOptions,
    collection: Option<CollectionKey>,
    resources: Vec<ResourceState>,
    filter: FilterState,
    selection: SelectionState,
    rendered: Rendered,
}

impl GraphView<LayeredLayout> {
    /// View with the built-in layered layout. The config's root rule wins over
    /// the platform default.
    pub fn new(config: &ViewConfig, platform: Platform) -> Self {
        let root_rule = config
            .root_rule
            .unwrap_or_else(|| platform.default_root_rule());
        Self::with_engine(LayeredLayout::default(), config, root_rule)
    }
}

impl<E: LayoutEngine> GraphView<E> {
    pub fn with_engine(engine: E, config: &ViewConfig, root_rule: RootRule) -> Self {
        Self {
            builder: GraphBuilder::new(root_rule).node_size(config.node_size()),
            adapter: LayoutAdapter::with_engine(engine, config.layout_options()),
            geometry: config.geometry_options(),
            collection: None,
            resources: Vec::new(),
            filter: FilterState::default(),
            selection: SelectionState::new(),
            rendered: Rendered::Ready(Frame::default()),
        }
    }

    /// Show a resource collection. A new key resets the filter and selection;
    /// the same key behaves like `update_resources`.
    pub fn set_collection(&mut self, key: CollectionKey, resources: Vec<ResourceState>) {
        if self.collection.as_ref() == Some(&key) {
            self.update_resources(resources);
            return;
        }
        let filter = FilterState::from_resources(&resources);
        self.set_collection_with_filter(key, resources, filter);
    }

    /// Show a resource collection under a caller-built filter, in one recompute.
    /// Kinds the filter does not know are added as visible. A new key clears
    /// the selection.
    pub fn set_collection_with_filter(
        &mut self,
        key: CollectionKey,
        resources: Vec<ResourceState>,
        mut filter: FilterState,
    ) {
        if self.collection.as_ref() != Some(&key) {
            debug!(collection = %key, "switching resource collection");
            self.selection.clear();
            self.collection = Some(key);
        }
        filter.observe(resources.iter().map(|r| r.kind.as_str()));
        self.filter = filter;
        self.resources = resources;
        self.recompute();
    }

    /// New snapshot of the current collection. Existing filter toggles are kept;
    /// kinds seen for the first time are added as visible.
    pub fn update_resources(&mut self, resources: Vec<ResourceState>) {
        self.filter.observe(resources.iter().map(|r| r.kind.as_str()));
        self.resources = resources;
        self.recompute();
    }

    pub fn toggle_kind(&mut self, kind: &str) {
        self.set_filter(self.filter.toggle(kind));
    }

    pub fn set_all_kinds(&mut self, visible: bool) {
        self.set_filter(self.filter.set_all(visible));
    }

    /// Replace the whole filter state, as written back by a filter UI.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.recompute();
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selection.select(id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected resource if it is part of the current effective graph.
    pub fn selected(&self) -> Option<&ResourceState> {
        match &self.rendered {
            Rendered::Ready(frame) => self.selection.current(&frame.effective),
            Rendered::Unavailable { .. } => None,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Resources of the current snapshot, unfiltered.
    pub fn resources(&self) -> &[ResourceState] {
        &self.resources
    }

    pub fn collection(&self) -> Option<&CollectionKey> {
        self.collection.as_ref()
    }

    pub fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    pub fn frame(&self) -> Option<&Frame> {
        match &self.rendered {
            Rendered::Ready(frame) => Some(frame),
            Rendered::Unavailable { .. } => None,
        }
    }

    fn recompute(&mut self) {
        self.rendered = match compute_frame(
            &self.resources,
            &self.builder,
            &self.filter,
            &self.adapter,
            &self.geometry,
        ) {
            Ok(frame) => Rendered::Ready(frame),
            Err(err) => {
                warn!(error = %err, "layout failed, live state unavailable");
                Rendered::Unavailable {
                    reason: err.to_string(),
                }
            }
        };
    }
}
