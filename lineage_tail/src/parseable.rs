// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Generate parseable output: a tab-separated table with one line per node, in pre-order, each
// node followed by its duplicates.  A duplicate reports the mutation data of its top node,
// which it names in the top column.

use crate::node_text::is_identity;
use io_utils::fwriteln;
use itertools::Itertools;
use lineage_core::lineage::Lineage;
use lineage_mutate::lookup::mutations_in;
use std::io::Write;

pub const PARSEABLE_FIELDS: [&str; 13] = [
    "id",
    "parent",
    "top",
    "level",
    "nt_diffs",
    "aa_diffs",
    "reverse",
    "double",
    "insertions",
    "deletions",
    "boundaries",
    "from_parent",
    "cdr3_changes",
];

// Changes from the root within CDR3, reversions excluded.

fn cdr3_changes(lineage: &Lineage, v: usize) -> String {
    match lineage.nodes[v].boundaries {
        None => String::new(),
        Some(b) => {
            let e = b.ends();
            let labels = mutations_in(lineage, v, e[4], e[5]);
            format!(
                "{}",
                labels.iter().filter(|m| !is_identity(m)).format(",")
            )
        }
    }
}

pub fn parseable_output(lineage: &Lineage) -> Vec<u8> {
    let mut log = Vec::<u8>::new();
    fwriteln!(log, "{}", PARSEABLE_FIELDS.iter().format("\t"));
    for v in lineage.pre_order() {
        let node = &lineage.nodes[v];
        let parent = match node.parent {
            Some(p) => lineage.nodes[p].id.clone(),
            None => String::new(),
        };
        let m = &node.muts;
        let rest = format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            node.level,
            m.nt_diffs,
            m.aa_diffs,
            m.reverse_count,
            m.double_count,
            m.insertion_count,
            m.deletion_count,
            node.boundaries_text(),
            m.from_parent.iter().map(|(pos, x)| format!("{}:{}", pos, x)).format(","),
            cdr3_changes(lineage, v),
        );
        fwriteln!(log, "{}\t{}\t\t{}", node.id, parent, rest);
        for d in node.dups.iter() {
            fwriteln!(log, "{}\t{}\t{}\t{}", d.id, parent, node.id, rest);
        }
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_text::region_summary;
    use lineage_core::diagnostics::Diagnostics;
    use lineage_core::records::{LineageInput, RawRecord};
    use lineage_core::regions::RegionSet;
    use lineage_mutate::resolve_mutations;
    use string_utils::strme;

    #[test]
    fn test_parseable_output() {
        let mut root = RawRecord::new("root", "AAACCCGGGTTTAAACCCGGG", None);
        root.regions = Some(RegionSet {
            fwr1: "AAA".to_string(),
            cdr1: "CCC".to_string(),
            fwr2: "GGG".to_string(),
            cdr2: "TTT".to_string(),
            fwr3: "AAA".to_string(),
            cdr3: "CCC".to_string(),
            fwr4: "GGG".to_string(),
        });
        let input = LineageInput {
            records: vec![
                root,
                RawRecord::new("n1", "AAACCCGGGTTTAAACTCGGG", Some("root")),
                RawRecord::new("n2", "AAACCCGGGTTTAAACTCGGG", Some("root")),
            ],
            ..Default::default()
        };
        let mut diag = Diagnostics::new();
        let mut l = Lineage::from_input(&input, false, &mut diag).unwrap();
        resolve_mutations(&mut l, &mut diag);
        let out = parseable_output(&l);
        let lines = strme(&out).lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id\tparent\ttop\t"));
        assert_eq!(
            lines[1],
            "root\t\t\t0\t0\t0\t0\t0\t0\t0\t3 6 9 12 15 18 21\t\t"
        );
        assert_eq!(
            lines[2],
            "n1\troot\t\t1\t1\t1\t0\t0\t0\t0\t3 6 9 12 15 18 21\t16:C->T\tC->T"
        );
        assert_eq!(
            lines[3],
            "n2\troot\tn1\t1\t1\t1\t0\t0\t0\t0\t3 6 9 12 15 18 21\t16:C->T\tC->T"
        );
    }

    #[test]
    fn test_cdr3_changes_with_gapped_cdr1() {
        let mut root = RawRecord::new("root", "AAACCCGGGTTTAAACCCGGG", None);
        root.regions = Some(RegionSet {
            fwr1: "AAA".to_string(),
            cdr1: "C..CC".to_string(),
            fwr2: "GGG".to_string(),
            cdr2: "TTT".to_string(),
            fwr3: "AAA".to_string(),
            cdr3: "CCC".to_string(),
            fwr4: "GGG".to_string(),
        });
        let input = LineageInput {
            records: vec![root, RawRecord::new("n1", "AAACCCGGGTTTAAACCTGGG", Some("root"))],
            ..Default::default()
        };
        let mut diag = Diagnostics::new();
        let mut l = Lineage::from_input(&input, false, &mut diag).unwrap();
        resolve_mutations(&mut l, &mut diag);
        assert!(diag.is_empty());
        let out = parseable_output(&l);
        let lines = strme(&out).lines().collect::<Vec<_>>();
        assert_eq!(
            lines[2],
            "n1\troot\t\t1\t1\t1\t0\t0\t0\t0\t3 8 11 14 17 20 23\t19:C->T\tC->T"
        );
        assert_eq!(region_summary(&l.nodes[1]), "cdr3:1");
    }
}
