// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

use crate::regions::RegionBoundaries;
use crate::translate::translate;
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓

// Control structures.

#[derive(Clone, Default, PartialEq)]
pub struct InputOpt {
    pub records: String,  // json file of records
    pub germline: String, // optional json file holding the germline reference
    pub nodedup: bool,    // don't turn identical siblings into duplicates
}

#[derive(Clone, PartialEq)]
pub struct LayoutOpt {
    pub total_width: f64,
    pub root_y: f64,
    pub vertical_gap: f64,
    pub node_width: f64,
    pub line_height: f64,
    pub font_size: usize,
    pub tall_multiplier: f64, // height factor for nodes carrying potency or comments
    pub dup_gap: f64,         // gap between a node and its stacked duplicates
    pub padding: f64,
}

impl Default for LayoutOpt {
    fn default() -> Self {
        LayoutOpt {
            total_width: 1200.0,
            root_y: 20.0,
            vertical_gap: 40.0,
            node_width: 160.0,
            line_height: 14.0,
            font_size: 11,
            tall_multiplier: 1.5,
            dup_gap: 6.0,
            padding: 6.0,
        }
    }
}

#[derive(Clone, Default, PartialEq)]
pub struct OutputOpt {
    pub tree: bool,
    pub newick: bool,
    pub parseable: String, // tsv output file, "stdout" for standard output
    pub layout: String,    // json geometry output file, "stdout" for standard output
    pub nowarn: bool,
}

#[derive(Clone, Default, PartialEq)]
pub struct GeneralOpt {
    pub log: String,
    pub verbose: bool,
}

#[derive(Clone, Default, PartialEq)]
pub struct LineageControl {
    pub input_opt: InputOpt,
    pub layout_opt: LayoutOpt,
    pub output_opt: OutputOpt,
    pub gen_opt: GeneralOpt,
}

// ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓

// Annotations carried by a node.  None of these take part in the mutation computation, but
// potency and comments make the node taller when drawn.

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeInfo {
    pub cell_type: String,
    pub time_point: String,
    pub potency: Vec<f64>,
    pub comments: [String; 2],
}

impl NodeInfo {
    pub fn has_potency(&self) -> bool {
        !self.potency.is_empty()
    }

    pub fn has_comments(&self) -> bool {
        self.comments.iter().any(|c| !c.is_empty())
    }

    pub fn is_tall(&self) -> bool {
        self.has_potency() || self.has_comments()
    }
}

// Mutation bookkeeping for one node.  Positions are columns of the compared (aligned)
// sequence, and labels have the form "A->G".  Maps keyed by a neighbor are keyed by its id.

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MutationData {
    pub from_parent: Vec<(usize, String)>,
    pub nt_diffs: usize,
    pub aa_diffs: usize,
    pub from_root: BTreeMap<usize, String>,
    pub in_common: BTreeMap<usize, String>,
    pub possible_reverse: BTreeMap<usize, String>,
    pub reverse_by_parent: BTreeMap<String, BTreeMap<usize, String>>,
    pub double_by_parent: BTreeMap<String, BTreeMap<usize, String>>,
    pub reverse_count: usize,
    pub double_count: usize,
    pub insertion_count: usize,
    pub deletion_count: usize,
    pub reverse_info: String,
    pub double_info: String,
}

impl MutationData {
    pub fn from_parent_labels(&self) -> Vec<String> {
        self.from_parent.iter().map(|m| m.1.clone()).collect()
    }
}

// A node identical in sequence to a top node.  The sequence data are copied from the top
// node when the duplicate is created; annotations are its own.

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Duplicate {
    pub id: String,
    pub seq: String,
    pub aligned_seq: String,
    pub protein: String,
    pub boundaries: Option<RegionBoundaries>,
    pub info: NodeInfo,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub id: String,
    pub is_root: bool,
    pub is_dna: bool,
    pub seq: String,
    pub aligned_seq: String,
    pub protein: String,
    pub boundaries: Option<RegionBoundaries>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub info: NodeInfo,
    pub has_insertions: bool,
    pub has_deletions: bool,
    pub muts: MutationData,
    pub dups: Vec<Duplicate>,
    pub level: usize,
}

impl Node {
    // Create a node.  Sequences are uppercased.  Until regions are assigned, the aligned
    // sequence is the sequence as given.

    pub fn new(id: &str, seq: &str, is_dna: bool) -> Node {
        let seq = seq.to_uppercase();
        Node {
            id: id.to_string(),
            is_dna,
            protein: translate(&seq, is_dna),
            aligned_seq: seq.clone(),
            seq,
            ..Default::default()
        }
    }

    // The sequence used for position-by-position comparison.

    pub fn compare_seq(&self) -> &str {
        &self.aligned_seq
    }

    pub fn boundaries_text(&self) -> String {
        match self.boundaries {
            Some(b) => b.to_text(),
            None => String::new(),
        }
    }

    pub fn make_duplicate(&self, id: &str, info: NodeInfo) -> Duplicate {
        Duplicate {
            id: id.to_string(),
            seq: self.seq.clone(),
            aligned_seq: self.aligned_seq.clone(),
            protein: self.protein.clone(),
            boundaries: self.boundaries,
            info,
        }
    }
}

// Germline (or UCA) reference: an aligned sequence and six region ends.

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Germline {
    pub aligned: String,
    pub boundaries: RegionBoundaries,
}
