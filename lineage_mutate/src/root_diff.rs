// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Mutations relative to the root, and their classification.
//
// We walk the lineage from the root outward.  Each node starts from the root mutations of its
// parent and then applies the changes on the edge from its parent.  A change at position p is
// one of:
//
// 1. a new mutation: the parent still had the root base at p;
// 2. a reversion: the node returns to the root base at p, which an ancestor had mutated away
//    from;
// 3. a double mutation: the parent had already mutated away from the root at p and the node
//    mutates again, to a third base.
//
// A reversion is recorded permanently in the root mutation map as the identity label of the
// root base, e.g. C->C.  A new or double mutation sets the entry to root base -> node base.
// Reversions and double mutations are also recorded per parent, counted, and described in the
// node's audit text.

use crate::parent_diff::mutation_label;
use lineage_core::diagnostics::{Diagnostics, Warning};
use lineage_core::lineage::Lineage;
use std::collections::BTreeMap;

pub fn resolve_root_mutations(lineage: &mut Lineage, diag: &mut Diagnostics) {
    let root_seq = lineage.root().compare_seq().as_bytes().to_vec();
    for node in lineage.nodes.iter_mut() {
        let m = &mut node.muts;
        m.from_root.clear();
        m.in_common.clear();
        m.possible_reverse.clear();
        m.reverse_by_parent.clear();
        m.double_by_parent.clear();
        m.reverse_count = 0;
        m.double_count = 0;
        m.reverse_info.clear();
        m.double_info.clear();
    }
    for v in lineage.bfs_order() {
        let p = match lineage.nodes[v].parent {
            Some(p) => p,
            None => continue,
        };
        let parent = &lineage.nodes[p];
        let node = &lineage.nodes[v];
        let pid = parent.id.clone();
        let pseq = parent.compare_seq().as_bytes().to_vec();
        let cseq = node.compare_seq().as_bytes().to_vec();
        let mut from_root = parent.muts.from_root.clone();
        let from_parent = node.muts.from_parent.clone();

        // Without comparable sequences, the node inherits the root mutations of its parent.

        if pseq.len() != cseq.len() || cseq.len() != root_seq.len() {
            diag.push(Warning::SkippedEdge {
                node: node.id.clone(),
                parent: pid,
            });
            from_root.retain(|pos, _| *pos < cseq.len());
            let m = &mut lineage.nodes[v].muts;
            m.in_common = from_root.clone();
            m.from_root = from_root;
            continue;
        }

        let changed: BTreeMap<usize, String> = from_parent.iter().cloned().collect();
        let mut in_common = BTreeMap::new();
        let mut possible_reverse = BTreeMap::new();
        for (pos, label) in from_root.iter() {
            if !changed.contains_key(pos) {
                in_common.insert(*pos, label.clone());
            }
        }
        for (pos, label) in changed.iter() {
            if pseq[*pos] != root_seq[*pos] {
                possible_reverse.insert(*pos, label.clone());
            }
        }

        let mut reverse = BTreeMap::<usize, String>::new();
        let mut double = BTreeMap::<usize, String>::new();
        let (mut reverse_info, mut double_info) = (String::new(), String::new());
        for (pos, label) in changed.iter() {
            let (r, pb, cb) = (root_seq[*pos], pseq[*pos], cseq[*pos]);
            if cb == r {
                reverse.insert(*pos, label.clone());
                reverse_info += &format!("Reverse at position {}: {}\n", pos, label);
                from_root.insert(*pos, mutation_label(r, r));
            } else {
                if pb != r {
                    double.insert(*pos, label.clone());
                    double_info += &format!("Double at position {}: {}\n", pos, label);
                }
                from_root.insert(*pos, mutation_label(r, cb));
            }
        }

        let m = &mut lineage.nodes[v].muts;
        m.reverse_count = reverse.len();
        m.double_count = double.len();
        m.reverse_info = reverse_info;
        m.double_info = double_info;
        if !reverse.is_empty() {
            m.reverse_by_parent.insert(pid.clone(), reverse);
        }
        if !double.is_empty() {
            m.double_by_parent.insert(pid, double);
        }
        m.from_root = from_root;
        m.in_common = in_common;
        m.possible_reverse = possible_reverse;
    }
}
