// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// The text shown in a node box, and the box height it implies.  Boxes have a fixed width, so
// long lines are wrapped, and boxes of nodes carrying potency values or comments are made
// taller.

use crate::string_width::wrap_to_width;
use itertools::Itertools;
use lineage_core::defs::{Duplicate, LayoutOpt, Node, NodeInfo};
use lineage_core::regions::REGION_NAMES;

// A label such as C->C records a reversion, not a change.

pub fn is_identity(label: &str) -> bool {
    let b = label.as_bytes();
    b.len() == 4 && b[0] == b[3]
}

// Number of changes from the root in each region, as e.g. "cdr1:1 fwr3:2".

pub fn region_summary(node: &Node) -> String {
    let b = match node.boundaries {
        Some(b) => b,
        None => return String::new(),
    };
    let mut counts = [0; 7];
    for (pos, label) in node.muts.from_root.iter() {
        if !is_identity(label) {
            if let Some(r) = b.region_of(*pos) {
                counts[r] += 1;
            }
        }
    }
    format!(
        "{}",
        (0..7)
            .filter(|r| counts[*r] > 0)
            .map(|r| format!("{}:{}", REGION_NAMES[r], counts[r]))
            .format(" ")
    )
}

fn info_lines(info: &NodeInfo) -> Vec<String> {
    let mut lines = Vec::<String>::new();
    if !info.cell_type.is_empty() {
        lines.push(info.cell_type.clone());
    }
    if !info.time_point.is_empty() {
        lines.push(info.time_point.clone());
    }
    if info.has_potency() {
        lines.push(format!("potency {}", info.potency.iter().format(" ")));
    }
    for c in info.comments.iter() {
        if !c.is_empty() {
            lines.push(c.clone());
        }
    }
    lines
}

// Raw lines for a node, before wrapping.

pub fn node_lines(node: &Node) -> Vec<String> {
    let mut lines = vec![node.id.clone()];
    let m = &node.muts;
    if !node.is_root {
        lines.push(format!("nt {} aa {}", m.nt_diffs, m.aa_diffs));
    }
    if m.reverse_count > 0 || m.double_count > 0 {
        lines.push(format!("rev {} dbl {}", m.reverse_count, m.double_count));
    }
    if m.insertion_count > 0 || m.deletion_count > 0 {
        lines.push(format!("ins {} del {}", m.insertion_count, m.deletion_count));
    }
    let regions = region_summary(node);
    if !regions.is_empty() {
        lines.push(regions);
    }
    lines.append(&mut info_lines(&node.info));
    lines
}

// A duplicate shows only its own id and annotations.

pub fn duplicate_lines(dup: &Duplicate) -> Vec<String> {
    let mut lines = vec![dup.id.clone()];
    lines.append(&mut info_lines(&dup.info));
    lines
}

pub fn wrap_lines(lines: &[String], opt: &LayoutOpt) -> Vec<String> {
    let max_width = opt.node_width - 2.0 * opt.padding;
    lines
        .iter()
        .flat_map(|x| wrap_to_width(x, opt.font_size, max_width))
        .collect()
}

pub fn box_height(nlines: usize, tall: bool, opt: &LayoutOpt) -> f64 {
    let h = nlines as f64 * opt.line_height + 2.0 * opt.padding;
    if tall {
        h * opt.tall_multiplier
    } else {
        h
    }
}
