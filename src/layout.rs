//! Geometry helpers for renderers: recursion-tree placement and mapping of
//! point coordinates onto a canvas.

use crate::algorithms::karatsuba::TreeNode;
use crate::point::Point;
use serde::{Deserialize, Serialize};

/// Center of a tree node on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodePosition {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

/// A parent to child connector, from the parent's bottom edge to the child's
/// top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeLine {
    pub parent: usize,
    pub child: usize,
    pub from: (f64, f64),
    pub to: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeLayout {
    pub node_width: f64,
    pub node_height: f64,
    pub level_height: f64,
    pub min_width: f64,
    pub top_margin: f64,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            node_width: 120.0,
            node_height: 70.0,
            level_height: 120.0,
            min_width: 800.0,
            top_margin: 50.0,
        }
    }
}

impl TreeLayout {
    fn max_depth(nodes: &[TreeNode]) -> usize {
        nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Canvas size wide enough for a full binary fan-out at the deepest level.
    pub fn canvas_size(&self, nodes: &[TreeNode]) -> (f64, f64) {
        let max_depth = Self::max_depth(nodes);
        let width = self
            .min_width
            .max(2f64.powi(max_depth as i32) * self.node_width);
        let height = (max_depth + 1) as f64 * self.level_height + self.top_margin;
        (width, height)
    }

    /// Spreads the nodes of each depth evenly across the canvas, in id order.
    pub fn positions(&self, nodes: &[TreeNode]) -> Vec<NodePosition> {
        let (width, _) = self.canvas_size(nodes);
        let mut per_depth = vec![0usize; Self::max_depth(nodes) + 1];
        for node in nodes {
            per_depth[node.depth] += 1;
        }

        let mut seen = vec![0usize; per_depth.len()];
        nodes
            .iter()
            .map(|node| {
                let index = seen[node.depth];
                seen[node.depth] += 1;
                let total = per_depth[node.depth];
                NodePosition {
                    id: node.id,
                    x: width / (total + 1) as f64 * (index + 1) as f64,
                    y: node.depth as f64 * self.level_height + self.top_margin,
                }
            })
            .collect()
    }

    /// Parent to child links.
    pub fn edges(nodes: &[TreeNode]) -> Vec<(usize, usize)> {
        nodes
            .iter()
            .filter_map(|node| node.parent_id.map(|parent| (parent, node.id)))
            .collect()
    }

    /// Connector segments between node boxes of height `node_height`.
    pub fn edge_lines(&self, nodes: &[TreeNode]) -> Vec<EdgeLine> {
        let positions = self.positions(nodes);
        let half = self.node_height / 2.0;
        Self::edges(nodes)
            .into_iter()
            .filter_map(|(parent, child)| {
                let p = positions.iter().find(|pos| pos.id == parent)?;
                let c = positions.iter().find(|pos| pos.id == child)?;
                Some(EdgeLine {
                    parent,
                    child,
                    from: (p.x, p.y + half),
                    to: (c.x, c.y - half),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            padding: 40.0,
        }
    }
}

impl Viewport {
    /// Fits the bounding box of `points` into the padded canvas.
    pub fn fit(&self, points: &[Point]) -> Projection {
        let bounds = points.iter().fold(None, |acc: Option<[f64; 4]>, p| {
            Some(match acc {
                None => [p.x, p.x, p.y, p.y],
                Some([min_x, max_x, min_y, max_y]) => {
                    [min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y)]
                }
            })
        });
        Projection {
            viewport: self.clone(),
            bounds,
        }
    }
}

/// A viewport fitted to a particular point set.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    viewport: Viewport,
    bounds: Option<[f64; 4]>,
}

impl Projection {
    pub fn x(&self, x: f64) -> f64 {
        let vp = &self.viewport;
        match self.bounds {
            None => vp.width / 2.0,
            Some([min_x, max_x, _, _]) => {
                let range = non_zero(max_x - min_x);
                vp.padding + (x - min_x) / range * (vp.width - 2.0 * vp.padding)
            }
        }
    }

    /// Canvas y grows downwards, so larger coordinates map higher up.
    pub fn y(&self, y: f64) -> f64 {
        let vp = &self.viewport;
        match self.bounds {
            None => vp.height / 2.0,
            Some([_, _, min_y, max_y]) => {
                let range = non_zero(max_y - min_y);
                vp.height - vp.padding - (y - min_y) / range * (vp.height - 2.0 * vp.padding)
            }
        }
    }

    pub fn point(&self, p: &Point) -> (f64, f64) {
        (self.x(p.x), self.y(p.y))
    }
}

fn non_zero(range: f64) -> f64 {
    if range == 0.0 { 1.0 } else { range }
}
