// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// The in-memory shape of the records that describe a lineage.  Records in other formats (FASTA,
// AIRR, tab-delimited) are converted to this shape upstream; here we only read it from json.

use crate::regions::RegionSet;
use serde_derive::{Deserialize, Serialize};
use std::fs::read_to_string;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub id: String,
    pub sequence: String,
    pub is_dna: bool,
    pub parent: Option<String>, // None for the root
    pub regions: Option<RegionSet>,
    pub cell_type: String,
    pub time_point: String,
    pub potency: Vec<f64>,
    pub comments: Vec<String>, // at most two are kept
    pub has_insertions: bool,
    pub has_deletions: bool,
    pub duplicate_of: Option<String>,
}

impl Default for RawRecord {
    fn default() -> Self {
        RawRecord {
            id: String::new(),
            sequence: String::new(),
            is_dna: true,
            parent: None,
            regions: None,
            cell_type: String::new(),
            time_point: String::new(),
            potency: Vec::new(),
            comments: Vec::new(),
            has_insertions: false,
            has_deletions: false,
            duplicate_of: None,
        }
    }
}

impl RawRecord {
    pub fn new(id: &str, sequence: &str, parent: Option<&str>) -> RawRecord {
        RawRecord {
            id: id.to_string(),
            sequence: sequence.to_string(),
            parent: parent.map(|p| p.to_string()),
            ..Default::default()
        }
    }
}

// Germline or UCA reference: aligned sequence and the ends of FWR1, CDR1, FWR2, CDR2, FWR3 and
// CDR3 as nucleotide offsets.

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GermlineRecord {
    pub aligned: String,
    pub boundaries: [usize; 6],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageInput {
    pub name: String,
    pub germline: Option<GermlineRecord>,
    pub records: Vec<RawRecord>,
}

impl Default for LineageInput {
    fn default() -> Self {
        LineageInput {
            name: "lineage".to_string(),
            germline: None,
            records: Vec::new(),
        }
    }
}

pub fn read_lineage_input(path: &str) -> Result<LineageInput, String> {
    let text = read_to_string(path)
        .map_err(|e| format!("\nUnable to read the records file {}: {}.\n", path, e))?;
    serde_json::from_str::<LineageInput>(&text)
        .map_err(|e| format!("\nThe records file {} could not be parsed: {}.\n", path, e))
}

pub fn read_germline(path: &str) -> Result<GermlineRecord, String> {
    let text = read_to_string(path)
        .map_err(|e| format!("\nUnable to read the germline file {}: {}.\n", path, e))?;
    serde_json::from_str::<GermlineRecord>(&text)
        .map_err(|e| format!("\nThe germline file {} could not be parsed: {}.\n", path, e))
}
