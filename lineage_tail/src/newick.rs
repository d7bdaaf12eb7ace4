// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Convert a lineage into Newick format, see https://en.wikipedia.org/wiki/Newick_format.
//
// Edge lengths are the numbers of nucleotide changes from the parent.  A duplicate is written
// as a sibling of its top node, with the same edge length, or as a zero-length child of the
// root if its top node is the root.

use itertools::Itertools;
use lineage_core::lineage::Lineage;

// Characters that have a meaning in Newick are replaced in names.

pub fn newick_name(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ' ' | '(' | ')' | ',' | ':' | ';' | '[' | ']' | '\'' => '_',
            c => c,
        })
        .collect()
}

pub fn newick(lineage: &Lineage) -> String {
    // Work from the leaves up, rolling up the labels of children into their parent.

    let mut label = vec![String::new(); lineage.len()];
    for v in lineage.post_order() {
        let node = &lineage.nodes[v];
        let mut parts = Vec::<String>::new();
        for k in node.children.iter() {
            parts.push(label[*k].clone());
            let kid = &lineage.nodes[*k];
            for d in kid.dups.iter() {
                parts.push(format!("{}:{}", newick_name(&d.id), kid.muts.nt_diffs));
            }
        }
        if node.is_root {
            for d in node.dups.iter() {
                parts.push(format!("{}:0", newick_name(&d.id)));
            }
        }
        let name = newick_name(&node.id);
        let mut x = if parts.is_empty() {
            name
        } else {
            format!("({}){}", parts.iter().format(","), name)
        };
        if !node.is_root {
            x += &format!(":{}", node.muts.nt_diffs);
        }
        label[v] = x;
    }
    format!("{};", label[lineage.root])
}
