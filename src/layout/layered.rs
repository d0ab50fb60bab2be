//! Built-in layered (Sugiyama-style) layout engine.
//!
//! Phases:
//! 1) break cycles by reversing DFS back edges
//! 2) longest-path ranking, sources pulled next to their nearest child
//! 3) virtual nodes on every rank an edge crosses
//! 4) barycenter sweeps, keeping the ordering with the fewest crossings
//! 5) coordinates: ranks on a fixed pitch, nodes packed towards the top of
//!    their rank and aligned with their predecessors where there is room
//!
//! Node positions are node centres in layout space; edge routes start and end
//! on the node boundaries facing the neighbouring rank.

use crate::error::LayoutError;
use crate::layout::{EngineOutput, LayoutEngine, LayoutInput, Point, RankDir};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
pub struct LayeredLayout {
    /// Number of alternating down/up barycenter sweeps.
    pub sweeps: usize,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self { sweeps: 8 }
    }
}

impl LayoutEngine for LayeredLayout {
    fn layout(&self, input: &LayoutInput<'_>) -> Result<EngineOutput, LayoutError> {
        let n = input.nodes.len();
        for &(u, v) in &input.edges {
            if u >= n {
                return Err(LayoutError::UnknownNode(u));
            }
            if v >= n {
                return Err(LayoutError::UnknownNode(v));
            }
            if u == v {
                return Err(LayoutError::SelfLoop(input.nodes[u].id.to_string()));
            }
        }
        if n == 0 {
            return Ok(EngineOutput::default());
        }

        let reversed = break_cycles(n, &input.edges);
        let oriented: Vec<(usize, usize)> = input
            .edges
            .iter()
            .zip(&reversed)
            .map(|(&(u, v), &rev)| if rev { (v, u) } else { (u, v) })
            .collect();

        let ranks = assign_ranks(n, &oriented);
        let mut layers = Layers::new(n, ranks, &oriented);
        layers.order(self.sweeps);

        Ok(layers.place(input, &reversed))
    }
}

fn break_cycles(n: usize, edges: &[(usize, usize)]) -> Vec<bool> {
    #[derive(Copy, Clone, PartialEq, Eq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    let mut out_edges: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, &(u, _)) in edges.iter().enumerate() {
        out_edges[u].push(i);
    }

    let mut mark = vec![Mark::New; n];
    let mut reversed = vec![false; edges.len()];

    for start in 0..n {
        if mark[start] != Mark::New {
            continue;
        }
        mark[start] = Mark::Active;
        // (node, next out-edge to visit)
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

        while let Some(top) = stack.last_mut() {
            let (v, cursor) = *top;
            if cursor < out_edges[v].len() {
                top.1 += 1;
                let ei = out_edges[v][cursor];
                let w = edges[ei].1;
                match mark[w] {
                    Mark::New => {
                        mark[w] = Mark::Active;
                        stack.push((w, 0));
                    }
                    Mark::Active => reversed[ei] = true,
                    Mark::Done => {}
                }
            } else {
                mark[v] = Mark::Done;
                stack.pop();
            }
        }
    }

    reversed
}

/// Longest-path ranks over an acyclic edge list.
fn assign_ranks(n: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut indegree = vec![0usize; n];
    let mut succs: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(u, v) in edges {
        indegree[v] += 1;
        succs[u].push(v);
    }
    let has_preds: Vec<bool> = indegree.iter().map(|&d| d > 0).collect();

    let mut rank = vec![0usize; n];
    let mut queue: VecDeque<usize> = (0..n).filter(|&v| indegree[v] == 0).collect();
    while let Some(u) = queue.pop_front() {
        for &v in &succs[u] {
            rank[v] = rank[v].max(rank[u] + 1);
            indegree[v] -= 1;
            if indegree[v] == 0 {
                queue.push_back(v);
            }
        }
    }

    for u in 0..n {
        if has_preds[u] {
            continue;
        }
        if let Some(nearest) = succs[u].iter().map(|&v| rank[v]).min() {
            rank[u] = nearest.saturating_sub(1);
        }
    }

    let min = rank.iter().copied().min().unwrap_or(0);
    rank.iter().map(|r| r - min).collect()
}

/// Ranked vertices: real nodes `0..real`, virtual nodes after them.
struct Layers {
    real: usize,
    rank: Vec<usize>,
    preds: Vec<Vec<usize>>,
    succs: Vec<Vec<usize>>,
    layers: Vec<Vec<usize>>,
    /// Per input edge, its vertices in increasing rank order.
    chains: Vec<Vec<usize>>,
}

impl Layers {
    fn new(real: usize, mut rank: Vec<usize>, edges: &[(usize, usize)]) -> Self {
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); real];
        let mut succs: Vec<Vec<usize>> = vec![Vec::new(); real];
        let mut chains = Vec::with_capacity(edges.len());

        for &(a, b) in edges {
            let mut chain = vec![a];
            let mut prev = a;
            for r in rank[a] + 1..rank[b] {
                let d = rank.len();
                rank.push(r);
                preds.push(Vec::new());
                succs.push(Vec::new());
                succs[prev].push(d);
                preds[d].push(prev);
                chain.push(d);
                prev = d;
            }
            succs[prev].push(b);
            preds[b].push(prev);
            chain.push(b);
            chains.push(chain);
        }

        let depth = rank.iter().copied().max().map_or(0, |m| m + 1);
        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); depth];
        for (v, &r) in rank.iter().enumerate() {
            layers[r].push(v);
        }

        Self {
            real,
            rank,
            preds,
            succs,
            layers,
            chains,
        }
    }

    fn is_real(&self, v: usize) -> bool {
        v < self.real
    }

    fn positions(&self) -> Vec<usize> {
        let mut pos = vec![0usize; self.rank.len()];
        for layer in &self.layers {
            for (i, &v) in layer.iter().enumerate() {
                pos[v] = i;
            }
        }
        pos
    }

    fn crossings(&self) -> usize {
        let pos = self.positions();
        let mut total = 0;
        for layer in &self.layers {
            let segments: Vec<(usize, usize)> = layer
                .iter()
                .flat_map(|&v| self.succs[v].iter().map(move |&w| (v, w)))
                .map(|(v, w)| (pos[v], pos[w]))
                .collect();
            for (i, &(a, b)) in segments.iter().enumerate() {
                for &(c, d) in &segments[i + 1..] {
                    if (a < c && b > d) || (a > c && b < d) {
                        total += 1;
                    }
                }
            }
        }
        total
    }

    fn order(&mut self, sweeps: usize) {
        let depth = self.layers.len();
        let mut best = self.layers.clone();
        let mut best_crossings = self.crossings();

        for sweep in 0..sweeps {
            if best_crossings == 0 {
                break;
            }
            if sweep % 2 == 0 {
                for r in 1..depth {
                    self.reorder(r, true);
                }
            } else {
                for r in (0..depth.saturating_sub(1)).rev() {
                    self.reorder(r, false);
                }
            }
            let crossings = self.crossings();
            if crossings < best_crossings {
                best = self.layers.clone();
                best_crossings = crossings;
            }
        }

        self.layers = best;
    }

    /// Stable sort of one layer by the mean position of its neighbours in the
    /// adjacent layer. Vertices without neighbours keep their own position as key.
    fn reorder(&mut self, r: usize, by_preds: bool) {
        let pos = self.positions();
        let mut keyed: Vec<(f64, usize)> = self.layers[r]
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let nbrs = if by_preds { &self.preds[v] } else { &self.succs[v] };
                let key = if nbrs.is_empty() {
                    i as f64
                } else {
                    nbrs.iter().map(|&u| pos[u] as f64).sum::<f64>() / nbrs.len() as f64
                };
                (key, v)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.layers[r] = keyed.into_iter().map(|(_, v)| v).collect();
    }

    fn place(&self, input: &LayoutInput<'_>, reversed: &[bool]) -> EngineOutput {
        let opts = &input.options;
        let lr = opts.rank_dir == RankDir::LeftRight;

        // Extent of a real node along the rank axis and across it.
        let rank_ext = |v: usize| {
            let n = &input.nodes[v];
            if lr { n.width } else { n.height }
        };
        let cross_ext = |v: usize| {
            if !self.is_real(v) {
                return 0.0;
            }
            let n = &input.nodes[v];
            if lr { n.height } else { n.width }
        };

        let pitch = (0..self.real).map(rank_ext).fold(0.0_f64, f64::max);
        let rank_center = |r: usize| r as f64 * (pitch + opts.rank_sep) + pitch / 2.0;

        let mut cross = vec![0.0_f64; self.rank.len()];
        for layer in &self.layers {
            let mut prev: Option<usize> = None;
            for &v in layer {
                let desired = if self.preds[v].is_empty() {
                    None
                } else {
                    let sum: f64 = self.preds[v].iter().map(|&p| cross[p]).sum();
                    Some(sum / self.preds[v].len() as f64)
                };
                let floor = prev.map(|p| {
                    let sep = if self.is_real(p) && self.is_real(v) {
                        opts.node_sep
                    } else {
                        opts.node_sep / 2.0
                    };
                    cross[p] + cross_ext(p) / 2.0 + sep + cross_ext(v) / 2.0
                });
                cross[v] = match (desired, floor) {
                    (Some(d), Some(f)) => d.max(f),
                    (Some(d), None) => d,
                    (None, Some(f)) => f,
                    (None, None) => cross_ext(v) / 2.0,
                };
                prev = Some(v);
            }
        }

        let min = (0..self.rank.len())
            .map(|v| cross[v] - cross_ext(v) / 2.0)
            .fold(f64::INFINITY, f64::min);
        if min.is_finite() {
            for c in cross.iter_mut() {
                *c -= min;
            }
        }

        let center = |v: usize| {
            let along = rank_center(self.rank[v]);
            if lr {
                Point::new(along, cross[v])
            } else {
                Point::new(cross[v], along)
            }
        };
        // Boundary point of a real node facing the next (+1) or previous (-1) rank.
        let boundary = |v: usize, sign: f64| {
            let c = center(v);
            let shift = sign * rank_ext(v) / 2.0;
            if lr {
                Point::new(c.x + shift, c.y)
            } else {
                Point::new(c.x, c.y + shift)
            }
        };

        let positions: Vec<Point> = (0..self.real).map(center).collect();

        let edge_points: Vec<Vec<Point>> = self
            .chains
            .iter()
            .zip(reversed)
            .map(|(chain, &rev)| {
                let last = chain.len() - 1;
                let mut points: Vec<Point> = chain
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| match i {
                        0 => boundary(v, 1.0),
                        i if i == last => boundary(v, -1.0),
                        _ => center(v),
                    })
                    .collect();
                if rev {
                    points.reverse();
                }
                points
            })
            .collect();

        let mut width = 0.0_f64;
        let mut height = 0.0_f64;
        for (v, p) in positions.iter().enumerate() {
            let n = &input.nodes[v];
            width = width.max(p.x + n.width / 2.0);
            height = height.max(p.y + n.height / 2.0);
        }
        for p in edge_points.iter().flatten() {
            width = width.max(p.x);
            height = height.max(p.y);
        }

        EngineOutput {
            positions,
            edge_points,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutNode, LayoutOptions};
    use pretty_assertions::assert_eq;

    static IDS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

    fn input(n: usize, edges: &[(usize, usize)]) -> LayoutInput<'static> {
        LayoutInput {
            nodes: IDS[..n]
                .iter()
                .map(|&id| LayoutNode {
                    id,
                    width: 300.0,
                    height: 72.0,
                })
                .collect(),
            edges: edges.to_vec(),
            options: LayoutOptions::default(),
        }
    }

    #[test]
    fn chain_is_ranked_left_to_right() {
        let out = LayeredLayout::default()
            .layout(&input(3, &[(0, 1), (1, 2)]))
            .unwrap();

        assert_eq!(out.positions[0], Point::new(150.0, 36.0));
        assert_eq!(out.positions[1], Point::new(500.0, 36.0));
        assert_eq!(out.positions[2], Point::new(850.0, 36.0));
        assert_eq!(
            out.edge_points[0],
            vec![Point::new(300.0, 36.0), Point::new(350.0, 36.0)]
        );
        assert_eq!(out.width, 1000.0);
        assert_eq!(out.height, 72.0);
    }

    #[test]
    fn siblings_share_a_rank_without_overlap() {
        let out = LayeredLayout::default()
            .layout(&input(3, &[(0, 1), (0, 2)]))
            .unwrap();
        let (b, c) = (out.positions[1], out.positions[2]);

        assert_eq!(b.x, c.x);
        assert!((b.y - c.y).abs() >= 72.0 + 50.0);
    }

    #[test]
    fn long_edges_bend_through_virtual_nodes() {
        // a -> b -> c and a -> c: the long edge crosses b's rank.
        let out = LayeredLayout::default()
            .layout(&input(3, &[(0, 1), (1, 2), (0, 2)]))
            .unwrap();

        assert_eq!(out.edge_points[2].len(), 3);
        assert_eq!(out.edge_points[2][1].x, out.positions[1].x);
    }

    #[test]
    fn cycles_are_laid_out_and_keep_direction() {
        let out = LayeredLayout::default()
            .layout(&input(2, &[(0, 1), (1, 0)]))
            .unwrap();
        let back = &out.edge_points[1];

        // The back edge still starts at b and ends at a.
        assert!(back.first().unwrap().x > back.last().unwrap().x);
    }

    #[test]
    fn isolated_nodes_stack_in_first_rank() {
        let out = LayeredLayout::default().layout(&input(2, &[])).unwrap();
        assert_eq!(out.positions[0], Point::new(150.0, 36.0));
        assert_eq!(out.positions[1], Point::new(150.0, 158.0));
    }

    #[test]
    fn top_bottom_swaps_axes() {
        let mut inp = input(2, &[(0, 1)]);
        inp.options.rank_dir = RankDir::TopBottom;
        let out = LayeredLayout::default().layout(&inp).unwrap();

        assert_eq!(out.positions[0].x, out.positions[1].x);
        assert!(out.positions[1].y > out.positions[0].y);
    }

    #[test]
    fn rejects_bad_edges() {
        let engine = LayeredLayout::default();
        assert_eq!(
            engine.layout(&input(2, &[(0, 5)])).unwrap_err(),
            LayoutError::UnknownNode(5)
        );
        assert_eq!(
            engine.layout(&input(2, &[(1, 1)])).unwrap_err(),
            LayoutError::SelfLoop("b".to_string())
        );
    }

    #[test]
    fn barycenter_removes_simple_crossing() {
        // a -> d, b -> c with c listed before d would cross without reordering.
        let out = LayeredLayout::default()
            .layout(&input(4, &[(0, 3), (1, 2)]))
            .unwrap();
        let (a, b, c, d) = (
            out.positions[0],
            out.positions[1],
            out.positions[2],
            out.positions[3],
        );
        assert_eq!((a.y < b.y), (d.y < c.y));
    }
}
