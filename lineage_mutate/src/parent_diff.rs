// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Differences between each node and its parent.
//
// Sequences are compared column by column in their aligned form, so they must have the same
// length.  If they do not, the node is reported to have no differences and a warning is
// recorded, rather than failing the whole lineage.

use lineage_core::diagnostics::{Diagnostics, Molecule, Warning};
use lineage_core::errors::LineageError;
use lineage_core::lineage::Lineage;
use lineage_core::translate::translate;

pub fn mutation_label(from: u8, to: u8) -> String {
    format!("{}->{}", from as char, to as char)
}

// Differing positions of two equal-length sequences, labelled parent base -> child base.

pub fn nt_diffs(parent: &str, child: &str) -> Result<Vec<(usize, String)>, LineageError> {
    let (p, c) = (parent.as_bytes(), child.as_bytes());
    if p.len() != c.len() {
        return Err(LineageError::LengthMismatch {
            what: "sequences".to_string(),
            left: p.len(),
            right: c.len(),
        });
    }
    Ok((0..p.len())
        .filter(|i| p[*i] != c[*i])
        .map(|i| (i, mutation_label(p[i], c[i])))
        .collect())
}

// Number of differing residues between two equal-length protein sequences.

pub fn aa_diff_count(parent: &str, child: &str) -> Result<usize, LineageError> {
    let (p, c) = (parent.as_bytes(), child.as_bytes());
    if p.len() != c.len() {
        return Err(LineageError::LengthMismatch {
            what: "protein sequences".to_string(),
            left: p.len(),
            right: c.len(),
        });
    }
    Ok(p.iter().zip(c.iter()).filter(|(a, b)| a != b).count())
}

// Fill in from_parent, nt_diffs and aa_diffs for every non-root node.

pub fn compute_parent_diffs(lineage: &mut Lineage, diag: &mut Diagnostics) {
    for v in lineage.bfs_order() {
        let p = match lineage.nodes[v].parent {
            Some(p) => p,
            None => continue,
        };
        let (parent, node) = (&lineage.nodes[p], &lineage.nodes[v]);
        let (pseq, cseq) = (parent.compare_seq(), node.compare_seq());
        let from_parent = match nt_diffs(pseq, cseq) {
            Ok(d) => d,
            Err(_) => {
                diag.push(Warning::LengthMismatch {
                    node: node.id.clone(),
                    parent: parent.id.clone(),
                    molecule: Molecule::Nucleotide,
                    node_len: cseq.len(),
                    parent_len: pseq.len(),
                });
                Vec::new()
            }
        };
        let (paa, caa) = (
            translate(pseq, parent.is_dna),
            translate(cseq, node.is_dna),
        );
        let aa_diffs = match aa_diff_count(&paa, &caa) {
            Ok(n) => n,
            Err(_) => {
                diag.push(Warning::LengthMismatch {
                    node: node.id.clone(),
                    parent: parent.id.clone(),
                    molecule: Molecule::Protein,
                    node_len: caa.len(),
                    parent_len: paa.len(),
                });
                0
            }
        };
        let m = &mut lineage.nodes[v].muts;
        m.nt_diffs = from_parent.len();
        m.from_parent = from_parent;
        m.aa_diffs = aa_diffs;
    }
}
