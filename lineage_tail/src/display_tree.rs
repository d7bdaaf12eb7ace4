// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Text display of a lineage.  Each node is shown on one line, preceded by box-drawing edges
// whose lengths are proportional to the number of nucleotide changes from the parent.  The
// lengths are scaled so that the widest line is roughly the given width in characters.
// Duplicates are listed in parentheses after their top node.

use itertools::Itertools;
use lineage_core::lineage::Lineage;

fn display_name(lineage: &Lineage, v: usize) -> String {
    let node = &lineage.nodes[v];
    if node.dups.is_empty() {
        node.id.clone()
    } else {
        format!(
            "{} ({})",
            node.id,
            node.dups.iter().map(|d| d.id.as_str()).format(" ")
        )
    }
}

// Scale factor for edge lengths, found by stepping up or down until the widest line is just
// under the width.

fn edge_scale(consts: &[usize], paths: &[Vec<f64>], width: usize) -> f64 {
    if paths.iter().all(|p| p.is_empty()) {
        return 1.0;
    }
    let fwidth = width as f64;
    let mut mult = 1.0;
    let mut last_change = "";
    loop {
        let mut len = 0.0_f64;
        let mut max_w = 1.0_f64;
        for (c, p) in consts.iter().zip(paths.iter()) {
            let mut l = *c as f64;
            for e in p.iter() {
                let w = (e * mult).round().max(1.0);
                max_w = max_w.max(w);
                l += w;
            }
            len = len.max(l);
        }
        if len <= fwidth && len >= 0.95 * fwidth {
            break;
        } else if max_w == 1.0 && len >= fwidth {
            break;
        } else if len > fwidth {
            mult *= 0.95;
            last_change = "minus";
        } else {
            if last_change == "minus" {
                break;
            }
            mult *= 1.05;
            last_change = "plus";
        }
    }
    mult
}

pub fn display_tree(lineage: &Lineage, width: usize) -> String {
    let n = lineage.len();
    let order = lineage.pre_order();

    // Edge weights, made all one if all are zero.

    let mut weight = vec![0.0; n];
    for v in 0..n {
        if !lineage.nodes[v].is_root {
            weight[v] = lineage.nodes[v].muts.nt_diffs as f64;
        }
    }
    if weight.iter().all(|w| *w == 0.0) {
        for v in 0..n {
            if !lineage.nodes[v].is_root {
                weight[v] = 1.0;
            }
        }
    }

    // For each node, the path of nodes from just below the root down to it.

    let mut paths = vec![Vec::<usize>::new(); n];
    for v in 0..n {
        let mut w = v;
        while let Some(p) = lineage.nodes[w].parent {
            paths[v].push(w);
            w = p;
        }
        paths[v].reverse();
    }
    let mut consts = vec![0; n];
    let mut vlens = vec![Vec::<f64>::new(); n];
    for v in 0..n {
        consts[v] = display_name(lineage, v).chars().count() + 2 * paths[v].len();
        vlens[v] = paths[v].iter().map(|w| weight[*w]).collect();
    }
    let mult = edge_scale(&consts, &vlens, width);
    let len: Vec<usize> = weight
        .iter()
        .map(|w| (w * mult).round().max(1.0) as usize)
        .collect();

    // A node on a path is followed by a sibling if it is not the last child of its parent.

    let has_next_sibling = |w: usize| match lineage.nodes[w].parent {
        Some(p) => lineage.nodes[p].children.last() != Some(&w),
        None => false,
    };

    // Generate the lines.

    let mut x = String::new();
    for v in order {
        let path = &paths[v];
        for (j, w) in path.iter().enumerate() {
            let t = len[*w];
            if j == path.len() - 1 {
                let corner = if has_next_sibling(*w) { '╠' } else { '╚' };
                x += &format!("{}{} ", corner, "═".repeat(t));
            } else if has_next_sibling(*w) {
                x += &format!("║{} ", " ".repeat(t));
            } else {
                x += &format!(" {} ", " ".repeat(t));
            }
        }
        x += &format!("{}\n", display_name(lineage, v));
    }
    x
}
