//! Per-edge render geometry: a local bounding box plus the polyline inside it.
//!
//! Each edge is drawn on its own small canvas so the renderer never needs a
//! global SVG. The box is padded by twice the stroke width and points are
//! shifted by half a stroke so lines are never clipped at the box border.

use crate::graph::NodeSize;
use crate::layout::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryOptions {
    pub node: NodeSize,
    pub stroke_width: f64,
}

impl GeometryOptions {
    pub fn padding(&self) -> f64 {
        self.stroke_width * 2.0
    }
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            node: NodeSize::DEFAULT,
            stroke_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeGeometry {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub local_points: Vec<Point>,
    /// `local_points` as a polyline `points` attribute: "x,y x,y ...".
    pub points: String,
}

/// Geometry for one edge's waypoints. `None` when there are no waypoints.
pub fn edge_geometry(waypoints: &[Point], opts: &GeometryOptions) -> Option<EdgeGeometry> {
    let first = waypoints.first()?;

    let (mut min_x, mut min_y) = (first.x, first.y);
    let (mut max_x, mut max_y) = (first.x, first.y);
    for p in waypoints {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let base_x = min_x.floor();
    let base_y = min_y.floor();
    let half_stroke = opts.stroke_width / 2.0;

    let local_points: Vec<Point> = waypoints
        .iter()
        .map(|p| {
            Point::new(
                (p.x - base_x).round() + half_stroke,
                (p.y - base_y).round() + half_stroke,
            )
        })
        .collect();

    let points = local_points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");

    Some(EdgeGeometry {
        top: base_y + opts.node.height / 2.0,
        left: base_x + opts.node.width / 2.0,
        width: (max_x - base_x).ceil() + opts.padding(),
        height: (max_y - base_y).ceil() + opts.padding(),
        local_points,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn straight_edge_between_neighbouring_ranks() {
        let g = edge_geometry(
            &[Point::new(300.0, 36.0), Point::new(350.0, 36.0)],
            &GeometryOptions::default(),
        )
        .unwrap();

        assert_eq!(g.left, 450.0);
        assert_eq!(g.top, 72.0);
        assert_eq!(g.width, 54.0);
        assert_eq!(g.height, 4.0);
        assert_eq!(g.points, "1,1 51,1");
    }

    #[test]
    fn fractional_points_floor_the_base() {
        let g = edge_geometry(
            &[
                Point::new(10.6, 20.2),
                Point::new(30.1, 40.9),
                Point::new(50.5, 20.4),
            ],
            &GeometryOptions::default(),
        )
        .unwrap();

        assert_eq!(g.left, 10.0 + 150.0);
        assert_eq!(g.top, 20.0 + 36.0);
        assert_eq!(g.width, 41.0 + 4.0);
        assert_eq!(g.height, 21.0 + 4.0);
        assert_eq!(
            g.local_points,
            vec![
                Point::new(2.0, 1.0),
                Point::new(21.0, 22.0),
                Point::new(42.0, 1.0)
            ]
        );
    }

    #[test]
    fn points_stay_inside_the_box() {
        let g = edge_geometry(
            &[Point::new(0.4, 0.4), Point::new(99.5, 0.5), Point::new(99.6, 70.5)],
            &GeometryOptions {
                stroke_width: 3.0,
                ..GeometryOptions::default()
            },
        )
        .unwrap();

        for p in &g.local_points {
            assert!(p.x >= 0.0 && p.x <= g.width, "{p:?} outside width {}", g.width);
            assert!(p.y >= 0.0 && p.y <= g.height, "{p:?} outside height {}", g.height);
        }
    }

    #[test]
    fn no_waypoints_no_geometry() {
        assert_eq!(edge_geometry(&[], &GeometryOptions::default()), None);
    }
}
