// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

use crate::parent_diff::mutation_label;
use lineage_core::lineage::Lineage;

// Find the mutation label of node v at a position.  Try the root mutations, then the
// reversions recorded against the parent, and lacking both, return the identity label of the
// node's own base.  Only a position past the end of the sequence has no label.

pub fn mutation_at(lineage: &Lineage, v: usize, pos: usize) -> Option<String> {
    let node = &lineage.nodes[v];
    if let Some(m) = node.muts.from_root.get(&pos) {
        return Some(m.clone());
    }
    if let Some(p) = node.parent {
        let pid = &lineage.nodes[p].id;
        if let Some(m) = node
            .muts
            .reverse_by_parent
            .get(pid)
            .and_then(|r| r.get(&pos))
        {
            return Some(m.clone());
        }
    }
    let b = *node.compare_seq().as_bytes().get(pos)?;
    Some(mutation_label(b, b))
}

// Labels for a run of positions, as shown for a region.

pub fn mutations_in(lineage: &Lineage, v: usize, start: usize, stop: usize) -> Vec<String> {
    (start..stop)
        .filter_map(|pos| mutation_at(lineage, v, pos))
        .collect()
}
