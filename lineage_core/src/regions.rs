// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Framework and CDR regions in the IMGT gapped coordinate system.
//
// A reference record carries its seven regions FWR1, CDR1, FWR2, CDR2, FWR3, CDR3 and FWR4 as
// substrings that may contain the gap characters . and -.  Locating these in the sequence of
// the record gives the aligned reference and the column at which each region ends, and we
// project ungapped sequences of a lineage onto the aligned reference so that homologous
// positions share a column.
//
// Region data are all or nothing: if any of the seven regions is missing, no boundaries are
// produced for the lineage.

use crate::diagnostics::{Diagnostics, Warning};
use crate::errors::LineageError;
use itertools::Itertools;
use serde_derive::{Deserialize, Serialize};
use std::cmp::min;
use string_utils::strme;

pub const REGION_NAMES: [&str; 7] = ["fwr1", "cdr1", "fwr2", "cdr2", "fwr3", "cdr3", "fwr4"];

pub fn is_gap(c: u8) -> bool {
    c == b'.' || c == b'-'
}

pub fn ungapped(s: &str) -> String {
    s.chars().filter(|c| *c != '.' && *c != '-').collect()
}

pub fn non_gap_count(s: &str) -> usize {
    s.bytes().filter(|c| !is_gap(*c)).count()
}

pub fn leading_gaps(s: &str) -> usize {
    s.bytes().take_while(|c| is_gap(*c)).count()
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓

// The named regions of one reference record.  Missing fields deserialize as empty.

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionSet {
    pub fwr1: String,
    pub cdr1: String,
    pub fwr2: String,
    pub cdr2: String,
    pub fwr3: String,
    pub cdr3: String,
    pub fwr4: String,
}

impl RegionSet {
    // Regions in their fixed order.

    pub fn regions(&self) -> [&str; 7] {
        [
            &self.fwr1, &self.cdr1, &self.fwr2, &self.cdr2, &self.fwr3, &self.cdr3, &self.fwr4,
        ]
    }

    // Concatenation of the gapped regions.

    pub fn aligned(&self) -> String {
        self.regions().concat()
    }

    pub fn is_complete(&self) -> bool {
        self.regions().iter().all(|r| !ungapped(r).is_empty())
    }
}

// ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓

// End columns of FWR1, CDR1, FWR2, CDR2, FWR3, CDR3 and FWR4 in aligned coordinates, so that
// region k occupies the columns from the end of region k - 1 up to its own end.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionBoundaries(pub [usize; 7]);

impl RegionBoundaries {
    // Boundaries supplied directly for a germline reference: six ends plus the sequence
    // length.

    pub fn from_germline(ends: &[usize; 6], seq_len: usize) -> RegionBoundaries {
        let mut b = [0; 7];
        b[..6].copy_from_slice(ends);
        b[6] = seq_len;
        RegionBoundaries(b)
    }

    pub fn ends(&self) -> &[usize; 7] {
        &self.0
    }

    pub fn fr4_end(&self) -> usize {
        self.0[6]
    }

    pub fn is_strictly_increasing(&self) -> bool {
        self.0.windows(2).all(|w| w[0] < w[1])
    }

    // Index of the region containing a position, or None if the position lies beyond FWR4.

    pub fn region_of(&self, pos: usize) -> Option<usize> {
        self.0.iter().position(|end| pos < *end)
    }

    pub fn region_name_of(&self, pos: usize) -> Option<&'static str> {
        self.region_of(pos).map(|i| REGION_NAMES[i])
    }

    // The form handed to renderers: seven integers separated by blanks.

    pub fn to_text(&self) -> String {
        format!("{}", self.0.iter().format(" "))
    }
}

// ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓

// Lay out a reference record in aligned columns and find its region boundaries.
//
// Each ungapped region is searched for in the ungapped sequence of the reference record,
// starting at the end of the previous region, and the region ends where the match ends.  Bases
// skipped over by the search belong to the region that follows them.  In the aligned reference,
// a region found in the sequence is written in its gapped form, so that its interior gaps
// become columns, and every boundary is the column just past the end of its region.  A region
// that cannot be found is assumed to follow the previous one directly, and its bases are taken
// from the sequence as they are.  Bases after FWR4 are kept, beyond the last boundary.
//
// FWR4 must end at the ungapped length of the reference.  Both are reported with the leading
// gaps of the aligned regions (which arise when the sequence is missing its first bases) added,
// and a mismatch is a warning.

fn align_reference(
    reference_name: &str,
    reference_seq: &str,
    regions: &RegionSet,
    diag: &mut Diagnostics,
) -> Result<(String, RegionBoundaries), LineageError> {
    for (i, r) in regions.regions().iter().enumerate() {
        if ungapped(r).is_empty() {
            return Err(LineageError::IncompleteRegionData {
                reference: reference_name.to_string(),
                region: REGION_NAMES[i].to_string(),
            });
        }
    }
    let offset = leading_gaps(&regions.aligned());
    let seq = ungapped(reference_seq).to_uppercase();
    let seq = seq.as_bytes();
    let mut aligned = String::with_capacity(seq.len());
    let mut ends = [0; 7];
    let mut cursor = 0;
    for (i, r) in regions.regions().iter().enumerate() {
        let r = r.to_uppercase();
        let u = ungapped(&r);
        match find_bytes(&seq[cursor..], u.as_bytes()) {
            Some(p) => {
                aligned += strme(&seq[cursor..cursor + p]);
                aligned += &r;
                cursor += p + u.len();
            }
            None => {
                diag.push(Warning::RegionNotFound {
                    reference: reference_name.to_string(),
                    region: REGION_NAMES[i].to_string(),
                });
                let stop = min(cursor + u.len(), seq.len());
                aligned += strme(&seq[cursor..stop]);
                cursor = stop;
            }
        }
        ends[i] = aligned.len();
    }
    if cursor != seq.len() {
        diag.push(Warning::RegionLengthMismatch {
            reference: reference_name.to_string(),
            fr4_end: cursor + offset,
            expected: seq.len() + offset,
        });
    }
    aligned += strme(&seq[cursor..]);
    Ok((aligned, RegionBoundaries(ends)))
}

pub fn region_boundaries(
    reference_name: &str,
    reference_seq: &str,
    regions: &RegionSet,
    diag: &mut Diagnostics,
) -> Result<RegionBoundaries, LineageError> {
    Ok(align_reference(reference_name, reference_seq, regions, diag)?.1)
}

// Project an ungapped target onto an aligned reference.  Each non-gap column of the reference
// receives the next target residue and each gap column keeps the reference gap character.  The
// target is assumed to have exactly one residue per non-gap column.  If it is shorter, the
// remaining columns are filled with gaps, and if longer, the excess is dropped.

pub fn project_onto_reference(aligned_reference: &str, target: &str) -> String {
    let mut t = target.chars();
    let mut out = String::with_capacity(aligned_reference.len());
    for c in aligned_reference.chars() {
        if c == '.' || c == '-' {
            out.push(c);
        } else {
            out.push(t.next().unwrap_or('.'));
        }
    }
    out
}

// A target sequence projected onto a reference, along with the boundaries of the reference
// regions.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionMap {
    pub aligned: String,
    pub boundaries: RegionBoundaries,
}

// Boundaries of a reference, computed once, applied to every sequence of a lineage.

pub struct RegionMapper {
    pub aligned_reference: String,
    pub boundaries: RegionBoundaries,
    columns: usize,
}

impl RegionMapper {
    pub fn new(
        reference_name: &str,
        reference_seq: &str,
        regions: &RegionSet,
        diag: &mut Diagnostics,
    ) -> Result<RegionMapper, LineageError> {
        let (aligned_reference, boundaries) =
            align_reference(reference_name, reference_seq, regions, diag)?;
        let columns = non_gap_count(&aligned_reference);
        Ok(RegionMapper {
            aligned_reference,
            boundaries,
            columns,
        })
    }

    pub fn map(&self, target_name: &str, target: &str, diag: &mut Diagnostics) -> RegionMap {
        let target_len = target.chars().count();
        if target_len != self.columns {
            diag.push(Warning::TargetLengthMismatch {
                node: target_name.to_string(),
                target_len,
                columns: self.columns,
            });
        }
        RegionMap {
            aligned: project_onto_reference(&self.aligned_reference, target),
            boundaries: self.boundaries,
        }
    }
}

pub fn map_regions(
    reference_name: &str,
    reference_seq: &str,
    regions: &RegionSet,
    target_name: &str,
    target: &str,
    diag: &mut Diagnostics,
) -> Result<RegionMap, LineageError> {
    let mapper = RegionMapper::new(reference_name, reference_seq, regions, diag)?;
    Ok(mapper.map(target_name, target, diag))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UCA: &str = "CAGGTGGGATTCATGAGCAGTTACAACGCGAGATGGGGC";

    fn regions() -> RegionSet {
        RegionSet {
            fwr1: "..CAGGTG".to_string(),
            cdr1: "GGA.TTC".to_string(),
            fwr2: "ATGAGC".to_string(),
            cdr2: "AGT".to_string(),
            fwr3: "TAC...AAC".to_string(),
            cdr3: "GCGAGA".to_string(),
            fwr4: "TGGGGC".to_string(),
        }
    }

    fn plain() -> RegionSet {
        let r = ["AAA", "CCC", "GGG", "TTT", "AAA", "CCC", "GGG"];
        RegionSet {
            fwr1: r[0].to_string(),
            cdr1: r[1].to_string(),
            fwr2: r[2].to_string(),
            cdr2: r[3].to_string(),
            fwr3: r[4].to_string(),
            cdr3: r[5].to_string(),
            fwr4: r[6].to_string(),
        }
    }

    #[test]
    fn test_boundaries() {
        let mut diag = Diagnostics::new();
        let b = region_boundaries("uca", UCA, &regions(), &mut diag).unwrap();
        assert_eq!(b.ends(), &[8, 15, 21, 24, 33, 39, 45]);
        assert!(b.is_strictly_increasing());
        assert_eq!(b.to_text(), "8 15 21 24 33 39 45");
        assert_eq!(b.fr4_end(), regions().aligned().len());
        assert!(diag.is_empty());
        assert_eq!(b.region_name_of(0), Some("fwr1"));
        assert_eq!(b.region_name_of(8), Some("cdr1"));
        // the gap column inside CDR1
        assert_eq!(b.region_name_of(11), Some("cdr1"));
        assert_eq!(b.region_name_of(44), Some("fwr4"));
        assert_eq!(b.region_of(45), None);
    }

    #[test]
    fn test_interior_gaps_are_columns() {
        let seq = "AAACCCGGGTTTAAACCCGGG";
        let mut diag = Diagnostics::new();
        let b = region_boundaries("root", seq, &plain(), &mut diag).unwrap();
        assert_eq!(b.to_text(), "3 6 9 12 15 18 21");

        let mut gapped = plain();
        gapped.cdr1 = "C..CC".to_string();
        let m = RegionMapper::new("root", seq, &gapped, &mut diag).unwrap();
        assert_eq!(m.aligned_reference, "AAAC..CCGGGTTTAAACCCGGG");
        assert_eq!(m.boundaries.to_text(), "3 8 11 14 17 20 23");
        assert!(m.boundaries.is_strictly_increasing());
        assert!(diag.is_empty());

        // the last base of CDR3 is still in CDR3 once the gaps are counted
        let child = m.map("child", "AAACCCGGGTTTAAACCTGGG", &mut diag);
        assert_eq!(child.aligned, "AAAC..CCGGGTTTAAACCTGGG");
        assert_eq!(child.aligned.as_bytes()[19], b'T');
        assert_eq!(child.boundaries.region_name_of(19), Some("cdr3"));
        assert!(diag.is_empty());
    }

    #[test]
    fn test_skipped_bases_join_next_region() {
        let seq = "AAATCCCGGGTTTAAACCCGGG";
        let mut diag = Diagnostics::new();
        let m = RegionMapper::new("root", seq, &plain(), &mut diag).unwrap();
        assert_eq!(m.boundaries.to_text(), "3 7 10 13 16 19 22");
        assert_eq!(m.aligned_reference, seq);
        let root = m.map("root", seq, &mut diag);
        assert_eq!(root.aligned, seq);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_region_not_found() {
        let mut diag = Diagnostics::new();
        let b = region_boundaries("root", "AAACCCGGGTATAAACCCGGG", &plain(), &mut diag).unwrap();
        assert_eq!(b.to_text(), "3 6 9 12 15 18 21");
        assert_eq!(
            diag.warnings(),
            &[Warning::RegionNotFound {
                reference: "root".to_string(),
                region: "cdr2".to_string(),
            }]
        );

        // running out of sequence
        let mut diag = Diagnostics::new();
        let b = region_boundaries("root", "AAACCC", &plain(), &mut diag).unwrap();
        assert_eq!(b.ends(), &[3, 6, 6, 6, 6, 6, 6]);
        assert!(!b.is_strictly_increasing());
        assert_eq!(
            diag.count(|w| matches!(w, Warning::RegionNotFound { .. })),
            5
        );
        assert_eq!(
            diag.count(|w| matches!(w, Warning::RegionLengthMismatch { .. })),
            0
        );
    }

    #[test]
    fn test_fr4_end_mismatch() {
        let mut diag = Diagnostics::new();
        let m = RegionMapper::new("root", "AAACCCGGGTTTAAACCCGGGTT", &plain(), &mut diag)
            .unwrap();
        assert_eq!(m.boundaries.fr4_end(), 21);
        assert_eq!(m.aligned_reference.len(), 23);
        assert_eq!(m.boundaries.region_of(22), None);
        assert_eq!(
            diag.warnings(),
            &[Warning::RegionLengthMismatch {
                reference: "root".to_string(),
                fr4_end: 21,
                expected: 23,
            }]
        );

        // leading gaps are added to both sides
        let mut diag = Diagnostics::new();
        let seq = format!("{}AC", UCA);
        region_boundaries("uca", &seq, &regions(), &mut diag).unwrap();
        assert_eq!(
            diag.warnings(),
            &[Warning::RegionLengthMismatch {
                reference: "uca".to_string(),
                fr4_end: 41,
                expected: 43,
            }]
        );
    }

    #[test]
    fn test_incomplete_regions() {
        let mut r = regions();
        r.cdr2 = "...".to_string();
        let mut diag = Diagnostics::new();
        let err = region_boundaries("uca", UCA, &r, &mut diag).unwrap_err();
        assert_eq!(
            err,
            LineageError::IncompleteRegionData {
                reference: "uca".to_string(),
                region: "cdr2".to_string(),
            }
        );
        assert!(!r.is_complete());
        assert!(regions().is_complete());
    }

    #[test]
    fn test_projection() {
        let full = regions().aligned();
        for aligned in [full.as_str(), "AAAC..CCGGG", "..A-C.G", "ACGT", "..."] {
            let target = "GATTACA".repeat(10)[..non_gap_count(aligned)].to_string();
            let p = project_onto_reference(aligned, &target);
            assert_eq!(p.len(), aligned.len());
            assert_eq!(ungapped(&p), target);
            for (a, b) in p.bytes().zip(aligned.bytes()) {
                assert_eq!(is_gap(a), is_gap(b));
            }
        }
        let mut diag = Diagnostics::new();
        let m = map_regions("uca", UCA, &regions(), "n1", UCA, &mut diag).unwrap();
        assert_eq!(m.aligned, project_onto_reference(&regions().aligned(), UCA));
        assert!(diag.is_empty());
        let m = map_regions("uca", UCA, &regions(), "n2", "CAGG", &mut diag).unwrap();
        assert!(m.aligned.starts_with("..CAGG...."));
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_germline_boundaries() {
        let b = RegionBoundaries::from_germline(&[78, 114, 165, 195, 312, 330], 360);
        assert_eq!(b.to_text(), "78 114 165 195 312 330 360");
    }
}
