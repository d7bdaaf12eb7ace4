// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Mutation Resolver.  Computes the changes on each edge of a lineage, then the changes of each
// node relative to the root, classifying reversions and double mutations, and finally the
// insertion and deletion counts.  Running it again on the same lineage gives the same result.

pub mod indels;
pub mod lookup;
pub mod parent_diff;
pub mod root_diff;

use lineage_core::diagnostics::Diagnostics;
use lineage_core::lineage::Lineage;
use log::debug;

pub fn resolve_mutations(lineage: &mut Lineage, diag: &mut Diagnostics) {
    parent_diff::compute_parent_diffs(lineage, diag);
    root_diff::resolve_root_mutations(lineage, diag);
    indels::count_indels(lineage);
    let (mut reverse, mut double) = (0, 0);
    for node in lineage.nodes.iter() {
        reverse += node.muts.reverse_count;
        double += node.muts.double_count;
    }
    debug!(
        "resolved mutations for {} nodes of {}: {} reversions, {} double mutations",
        lineage.len(),
        lineage.name,
        reverse,
        double
    );
}
