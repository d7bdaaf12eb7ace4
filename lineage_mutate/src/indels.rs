// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Insertion and deletion counts.
//
// Counting happens only for nodes flagged as carrying insertions or deletions.  A deletion is a
// - in the node's own aligned sequence; IMGT padding dots are not counted.  An insertion is a
// column where the reference has a gap and the node does not.  The reference is the germline
// if its aligned length matches that of the root, and otherwise the root itself.

use lineage_core::lineage::Lineage;
use lineage_core::regions::is_gap;

pub fn deletion_count(seq: &str) -> usize {
    seq.bytes().filter(|c| *c == b'-').count()
}

pub fn insertion_count(reference: &str, seq: &str) -> usize {
    reference
        .bytes()
        .zip(seq.bytes())
        .filter(|(r, s)| is_gap(*r) && !is_gap(*s))
        .count()
}

pub fn count_indels(lineage: &mut Lineage) {
    let root_seq = lineage.root().compare_seq().to_string();
    let reference = match &lineage.germline {
        Some(g) if g.aligned.len() == root_seq.len() => g.aligned.clone(),
        _ => root_seq,
    };
    for node in lineage.nodes.iter_mut() {
        node.muts.deletion_count = if node.has_deletions {
            deletion_count(node.compare_seq())
        } else {
            0
        };
        node.muts.insertion_count = if node.has_insertions {
            insertion_count(&reference, node.compare_seq())
        } else {
            0
        };
    }
}
