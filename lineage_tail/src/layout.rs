// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Tree Layout Engine.  Positions every node of a lineage, and every duplicate, for drawing.
//
// Pass 1 (x, bottom-up).  Leaves are spread evenly across the page in left-to-right order:
// the leaf of rank k among n (counting from one) is centered at k/(n+1) of the total width.
// An internal node is placed midway between the leftmost and rightmost of its children.
// Duplicates take the x of their top node.
//
// Pass 2 (y, top-down).  The root sits at a fixed y.  A child is placed below its parent's box,
// below the stack of the parent's duplicates, plus the vertical gap.  The duplicates of a node
// are stacked directly below it, separated by the duplicate gap.
//
// Pass 3 (geometry).  Boxes have a fixed width and a height given by their text; see
// node_text.rs.

use crate::geometry::{Point, Rect};
use crate::node_text::{box_height, duplicate_lines, node_lines, wrap_lines};
use lineage_core::defs::{LayoutOpt, NodeInfo};
use lineage_core::lineage::Lineage;
use serde_derive::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Shape {
    Octagon,
    Ellipse,
    RoundRect,
    Rect,
}

pub fn shape_of(is_root: bool, info: &NodeInfo) -> Shape {
    let cell_type = info.cell_type.to_lowercase();
    if is_root {
        Shape::Octagon
    } else if cell_type.contains("plasma") {
        Shape::Ellipse
    } else if cell_type.contains("memory") {
        Shape::RoundRect
    } else {
        Shape::Rect
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DupGraph {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub shape: Shape,
    pub emphasized: bool,
    pub lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeGraph {
    pub id: String,
    pub parent: Option<String>,
    pub level: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub is_last_node: bool,
    pub x_position_among_last_nodes: Option<usize>,
    pub shape: Shape,
    pub emphasized: bool,
    pub lines: Vec<String>,
    pub duplicate_group: Vec<DupGraph>,
}

impl DupGraph {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl NodeGraph {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    // Bottom of the box, or of the last duplicate stacked below it.

    pub fn stack_bottom(&self) -> f64 {
        match self.duplicate_group.last() {
            Some(d) => d.rect().bottom(),
            None => self.rect().bottom(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Node(usize),
    Duplicate(usize, usize),
}

// Nodes are indexed as in the lineage.

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreeLayout {
    pub name: String,
    pub nodes: Vec<NodeGraph>,
}

// ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓

pub fn layout_lineage(lineage: &Lineage, opt: &LayoutOpt) -> TreeLayout {
    // Create the boxes.

    let mut nodes = Vec::<NodeGraph>::with_capacity(lineage.len());
    for node in lineage.nodes.iter() {
        let lines = wrap_lines(&node_lines(node), opt);
        let mut dups = Vec::<DupGraph>::new();
        for d in node.dups.iter() {
            let dlines = wrap_lines(&duplicate_lines(d), opt);
            dups.push(DupGraph {
                id: d.id.clone(),
                x: 0.0,
                y: 0.0,
                width: opt.node_width,
                height: box_height(dlines.len(), d.info.is_tall(), opt),
                shape: shape_of(false, &d.info),
                emphasized: d.info.has_potency(),
                lines: dlines,
            });
        }
        nodes.push(NodeGraph {
            id: node.id.clone(),
            parent: node.parent.map(|p| lineage.nodes[p].id.clone()),
            level: node.level,
            x: 0.0,
            y: 0.0,
            width: opt.node_width,
            height: box_height(lines.len(), node.info.is_tall(), opt),
            is_last_node: node.children.is_empty(),
            x_position_among_last_nodes: None,
            shape: shape_of(node.is_root, &node.info),
            emphasized: node.info.has_potency(),
            lines,
            duplicate_group: dups,
        });
    }

    // Pass 1: x.

    let leaves = lineage.leaves();
    let n = leaves.len() as f64;
    for (rank, v) in leaves.iter().enumerate() {
        nodes[*v].x_position_among_last_nodes = Some(rank + 1);
    }
    for v in lineage.post_order() {
        let kids = &lineage.nodes[v].children;
        let x = match nodes[v].x_position_among_last_nodes {
            Some(rank) => rank as f64 / (n + 1.0) * opt.total_width - opt.node_width / 2.0,
            None => {
                let mut lo = f64::MAX;
                let mut hi = f64::MIN;
                for k in kids.iter() {
                    lo = lo.min(nodes[*k].x);
                    hi = hi.max(nodes[*k].x);
                }
                (lo + hi) / 2.0
            }
        };
        nodes[v].x = x;
        for d in nodes[v].duplicate_group.iter_mut() {
            d.x = x;
        }
    }

    // Pass 2: y.

    for v in lineage.bfs_order() {
        let y = match lineage.nodes[v].parent {
            None => opt.root_y,
            Some(p) => {
                let mut y = nodes[p].y + nodes[p].height;
                for d in nodes[p].duplicate_group.iter() {
                    y += opt.dup_gap + d.height;
                }
                y + opt.vertical_gap
            }
        };
        let g = &mut nodes[v];
        g.y = y;
        let mut dy = y + g.height;
        for d in g.duplicate_group.iter_mut() {
            d.y = dy + opt.dup_gap;
            dy = d.y + d.height;
        }
    }
    TreeLayout {
        name: lineage.name.clone(),
        nodes,
    }
}

// ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓

impl TreeLayout {
    // Find the box containing a point.  Boxes do not overlap in a well-formed layout; if they
    // do, the first in arena order wins, and a node before its duplicates.

    pub fn hit_test(&self, p: Point) -> Option<Hit> {
        for (v, g) in self.nodes.iter().enumerate() {
            if g.rect().contains(p) {
                return Some(Hit::Node(v));
            }
            for (k, d) in g.duplicate_group.iter().enumerate() {
                if d.rect().contains(p) {
                    return Some(Hit::Duplicate(v, k));
                }
            }
        }
        None
    }

    pub fn bounds(&self) -> Rect {
        let mut r = self.nodes[0].rect();
        for g in self.nodes.iter() {
            r = r.union(&g.rect());
            for d in g.duplicate_group.iter() {
                r = r.union(&d.rect());
            }
        }
        r
    }

    // Line segments joining each parent, below its duplicates, to each child.

    pub fn edges(&self) -> Vec<(Point, Point)> {
        let index = |id: &str| self.nodes.iter().position(|g| g.id == id);
        let mut edges = Vec::new();
        for g in self.nodes.iter() {
            if let Some(p) = g.parent.as_deref().and_then(index) {
                let pg = &self.nodes[p];
                let from = Point {
                    x: pg.x + pg.width / 2.0,
                    y: pg.stack_bottom(),
                };
                edges.push((from, g.rect().top_center()));
            }
        }
        edges
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| format!("\nFailed to serialize the layout: {}.\n", e))
    }
}
