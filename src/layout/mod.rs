//! Layout layer: effective graph -> positioned graph -> per-edge render geometry.
//!
//! The layered layout itself sits behind `LayoutEngine`; `LayoutAdapter` feeds
//! it the graph with fixed node sizes and validates what comes back.

pub mod geometry;
pub mod layered;

pub use geometry::{EdgeGeometry, GeometryOptions, edge_geometry};
pub use layered::LayeredLayout;

use crate::error::LayoutError;
use crate::graph::{Edge, Graph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Rank direction of the layered layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "TB")]
    TopBottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub rank_dir: RankDir,
    /// Gap between neighbours within one rank.
    pub node_sep: f64,
    /// Gap between consecutive ranks.
    pub rank_sep: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            rank_dir: RankDir::LeftRight,
            node_sep: 50.0,
            rank_sep: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutNode<'a> {
    pub id: &'a str,
    pub width: f64,
    pub height: f64,
}

/// What an engine receives: nodes in graph order, edges as node indices.
#[derive(Debug, Clone)]
pub struct LayoutInput<'a> {
    pub nodes: Vec<LayoutNode<'a>>,
    pub edges: Vec<(usize, usize)>,
    pub options: LayoutOptions,
}

/// What an engine returns, indexed like its input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOutput {
    pub positions: Vec<Point>,
    pub edge_points: Vec<Vec<Point>>,
    pub width: f64,
    pub height: f64,
}

/// Any layered layout satisfying the contract: left-to-right ranks by default,
/// node anchors plus one waypoint polyline per edge, in one coordinate space.
pub trait LayoutEngine {
    fn layout(&self, input: &LayoutInput<'_>) -> Result<EngineOutput, LayoutError>;
}

impl<E: LayoutEngine + ?Sized> LayoutEngine for Box<E> {
    fn layout(&self, input: &LayoutInput<'_>) -> Result<EngineOutput, LayoutError> {
        (**self).layout(input)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRoute {
    pub edge: Edge,
    pub points: Vec<Point>,
}

/// Node anchors and edge routes of one effective graph.
///
/// A renderer places a node's box with its top-left corner at the node's
/// position; waypoints live in the same space, offset by half a node (see
/// `geometry`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    positions: Vec<(String, Point)>,
    index: HashMap<String, usize>,
    pub edges: Vec<EdgeRoute>,
    pub width: f64,
    pub height: f64,
}

impl LayoutResult {
    pub fn position(&self, id: &str) -> Option<Point> {
        self.index.get(id).map(|&i| self.positions[i].1)
    }

    /// Positions in graph node order.
    pub fn positions(&self) -> &[(String, Point)] {
        &self.positions
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

pub struct LayoutAdapter<E = LayeredLayout> {
    engine: E,
    options: LayoutOptions,
}

impl LayoutAdapter<LayeredLayout> {
    pub fn new(options: LayoutOptions) -> Self {
        Self::with_engine(LayeredLayout::default(), options)
    }
}

impl Default for LayoutAdapter<LayeredLayout> {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

impl<E: LayoutEngine> LayoutAdapter<E> {
    pub fn with_engine(engine: E, options: LayoutOptions) -> Self {
        Self { engine, options }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lay out the whole graph. An empty graph yields an empty result without
    /// touching the engine.
    pub fn layout(&self, graph: &Graph) -> Result<LayoutResult, LayoutError> {
        if graph.is_empty() {
            return Ok(LayoutResult::default());
        }

        let index: HashMap<&str, usize> = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id(), i))
            .collect();

        let nodes: Vec<LayoutNode<'_>> = graph
            .nodes()
            .iter()
            .map(|n| LayoutNode {
                id: n.id(),
                width: n.width,
                height: n.height,
            })
            .collect();

        // Graph guarantees both endpoints exist.
        let edges: Vec<(usize, usize)> = graph
            .edges()
            .iter()
            .filter_map(|e| Some((*index.get(e.parent.as_str())?, *index.get(e.child.as_str())?)))
            .collect();

        let input = LayoutInput {
            nodes,
            edges,
            options: self.options,
        };
        let out = self.engine.layout(&input)?;
        let result = normalize(graph, out)?;

        debug!(
            nodes = result.positions.len(),
            edges = result.edges.len(),
            width = result.width,
            height = result.height,
            "layout computed"
        );
        Ok(result)
    }
}

fn normalize(graph: &Graph, out: EngineOutput) -> Result<LayoutResult, LayoutError> {
    if out.positions.len() != graph.node_count() {
        return Err(LayoutError::ShapeMismatch {
            what: "positions",
            expected: graph.node_count(),
            got: out.positions.len(),
        });
    }
    if out.edge_points.len() != graph.edge_count() {
        return Err(LayoutError::ShapeMismatch {
            what: "edge routes",
            expected: graph.edge_count(),
            got: out.edge_points.len(),
        });
    }

    let mut result = LayoutResult {
        width: out.width,
        height: out.height,
        ..LayoutResult::default()
    };

    for (node, pos) in graph.nodes().iter().zip(out.positions) {
        if !pos.is_finite() {
            return Err(LayoutError::NonFinite(node.id().to_string()));
        }
        result
            .index
            .insert(node.id().to_string(), result.positions.len());
        result.positions.push((node.id().to_string(), pos));
    }

    for (edge, points) in graph.edges().iter().zip(out.edge_points) {
        if points.iter().any(|p| !p.is_finite()) {
            return Err(LayoutError::NonFinite(format!(
                "{} -> {}",
                edge.parent, edge.child
            )));
        }
        result.edges.push(EdgeRoute {
            edge: edge.clone(),
            points,
        });
    }

    Ok(result)
}
