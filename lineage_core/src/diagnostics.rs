// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Collector for data quality warnings.  The mutation resolver and the region mapper recover
// from these locally, degrading their output, and record what happened here.  Each warning is
// also sent to the log.

use log::warn;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    // A node and its parent could not be compared position by position.
    LengthMismatch {
        node: String,
        parent: String,
        molecule: Molecule,
        node_len: usize,
        parent_len: usize,
    },

    // The end of FR4 does not match the ungapped reference length plus leading gap offset.
    RegionLengthMismatch {
        reference: String,
        fr4_end: usize,
        expected: usize,
    },

    // A region substring was not found in the ungapped reference at or after the end of
    // the previous region.
    RegionNotFound { reference: String, region: String },

    // A target sequence does not have one residue per non-gap column of the reference.
    TargetLengthMismatch {
        node: String,
        target_len: usize,
        columns: usize,
    },

    // A root-relative comparison skipped the edge from parent to node.
    SkippedEdge { node: String, parent: String },

    // Region data could not be derived, so no node of the lineage carries any.
    RegionsDisabled { reason: String },

    // An explicit duplicate names a parent other than the parent of its top node.  The parent
    // of the root is empty.
    DuplicateParentMismatch {
        id: String,
        parent: String,
        top: String,
        top_parent: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Molecule {
    Nucleotide,
    Protein,
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Molecule::Nucleotide => write!(f, "nucleotide"),
            Molecule::Protein => write!(f, "protein"),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Warning::LengthMismatch {
                node,
                parent,
                molecule,
                node_len,
                parent_len,
            } => write!(
                f,
                "{} sequence of {} has length {} but its parent {} has length {}; \
                 reporting zero differences",
                molecule, node, node_len, parent, parent_len
            ),
            Warning::RegionLengthMismatch {
                reference,
                fr4_end,
                expected,
            } => write!(
                f,
                "FR4 of {} ends at {}, but the reference implies {}",
                reference, fr4_end, expected
            ),
            Warning::RegionNotFound { reference, region } => write!(
                f,
                "region {} of {} was not found where expected",
                region, reference
            ),
            Warning::TargetLengthMismatch {
                node,
                target_len,
                columns,
            } => write!(
                f,
                "sequence of {} has length {}, but the aligned reference has {} residues",
                node, target_len, columns
            ),
            Warning::SkippedEdge { node, parent } => write!(
                f,
                "mutations of {} relative to the root were copied from {} unchanged",
                node, parent
            ),
            Warning::RegionsDisabled { reason } => {
                write!(f, "region features are disabled for this lineage: {}", reason)
            }
            Warning::DuplicateParentMismatch {
                id,
                parent,
                top,
                top_parent,
            } => {
                let theirs = if top_parent.is_empty() {
                    "no parent".to_string()
                } else {
                    format!("parent {}", top_parent)
                };
                write!(
                    f,
                    "{} is a duplicate of {} but has parent {}, where {} has {}",
                    id, top, parent, top, theirs
                )
            }
        }
    }
}

#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, w: Warning) {
        warn!("{}", w);
        self.warnings.push(w);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    // Count warnings for which the predicate holds.

    pub fn count<F: Fn(&Warning) -> bool>(&self, f: F) -> usize {
        self.warnings.iter().filter(|w| f(w)).count()
    }

    // Human readable summary, one warning per line.

    pub fn report(&self) -> String {
        let mut s = String::new();
        for w in self.warnings.iter() {
            s += &format!("WARNING: {}\n", w);
        }
        s
    }
}
