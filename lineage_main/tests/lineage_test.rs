// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

use lineage_core::diagnostics::Warning;
use lineage_main::main_lineage::main_lineage;
use pretty_trace::*;
use serde_json::Value;
use std::fs::write;

// Write records to a file named for the test, and return the argument list for a run on it.

fn setup(name: &str, json: &str, extra: &[&str]) -> Vec<String> {
    let path = std::env::temp_dir().join(format!("lineage_test_{}.json", name));
    let path = path.to_str().unwrap().to_string();
    write(&path, json).unwrap();
    let mut args = vec!["lineage".to_string(), format!("RECORDS={}", path)];
    args.extend(extra.iter().map(|x| x.to_string()));
    args
}

// ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓

#[test]
fn test_reversion_pipeline() {
    PrettyTrace::new().on();
    let json = r#"{
        "name": "rev",
        "records": [
            { "id": "root", "sequence": "ACGT" },
            { "id": "child", "sequence": "AGGT", "parent": "root" },
            { "id": "grandchild", "sequence": "ACGT", "parent": "child" }
        ]
    }"#;
    let args = setup("reversion", json, &["NEWICK", "PARSEABLE=stdout"]);
    let out = main_lineage(&args).unwrap();
    let l = &out.lineage;
    let g = &l.nodes[l.find("grandchild").unwrap()];
    assert_eq!(g.muts.from_root[&1], "C->C");
    assert_eq!(g.muts.reverse_count, 1);
    assert!(out.warnings.is_empty());
    let lines = out.text.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "((grandchild:1)child:1)root;");
    assert!(lines[1].starts_with("id\tparent\ttop\tlevel"));
    assert!(lines[4].starts_with("grandchild\tchild\t\t2\t1\t1\t1\t0"));
}

#[test]
fn test_duplicates_share_x() {
    PrettyTrace::new().on();
    let json = r#"{
        "records": [
            { "id": "uca", "sequence": "ACGTAC" },
            { "id": "a", "sequence": "ACGTAA", "parent": "uca", "cell_type": "memory" },
            { "id": "b", "sequence": "acgtaa", "parent": "uca", "potency": [3.5] },
            { "id": "c", "sequence": "ACGAAC", "parent": "uca" }
        ]
    }"#;
    let args = setup("duplicates", json, &["LAYOUT=stdout", "WIDTH=300"]);
    let out = main_lineage(&args).unwrap();
    let v: Value = serde_json::from_str(&out.text).unwrap();
    let nodes = v["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    let a = nodes.iter().find(|n| n["id"] == "a").unwrap();
    let dups = a["duplicate_group"].as_array().unwrap();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0]["id"], "b");
    assert_eq!(dups[0]["x"], a["x"]);
    assert_eq!(dups[0]["emphasized"], true);
    assert_eq!(a["shape"], "RoundRect");
    assert_eq!(nodes[0]["shape"], "Octagon");

    // the duplicate copies the sequence data of its top node
    let l = &out.lineage;
    let top = &l.nodes[l.find("a").unwrap()];
    assert_eq!(top.dups[0].seq, top.seq);
    assert_eq!(top.dups[0].protein, top.protein);

    // without deduplication, b is a node of its own
    let args = setup("duplicates_nodedup", json, &["NODEDUP"]);
    let out = main_lineage(&args).unwrap();
    assert_eq!(out.lineage.len(), 4);
    assert!(out.text.is_empty());
}

#[test]
fn test_incomplete_regions() {
    PrettyTrace::new().on();
    let json = r#"{
        "records": [
            { "id": "uca", "sequence": "AAACCCGGG",
              "regions": { "fwr1": "AAA", "cdr1": "CCC", "fwr2": "GGG" } },
            { "id": "n1", "sequence": "AAACCCGGA", "parent": "uca" }
        ]
    }"#;
    let args = setup("regions", json, &[]);
    let out = main_lineage(&args).unwrap();
    assert!(out.lineage.nodes.iter().all(|n| n.boundaries.is_none()));
    assert!(out.lineage.region_error.is_some());
    assert_eq!(
        out.diagnostics
            .count(|w| matches!(w, Warning::RegionsDisabled { .. })),
        1
    );
    assert!(out.warnings.starts_with("WARNING: "));

    // mutations are still computed
    let n1 = &out.lineage.nodes[1];
    assert_eq!(n1.muts.from_root[&8], "G->A");

    let args = setup("regions_nowarn", json, &["NOWARN"]);
    let out = main_lineage(&args).unwrap();
    assert!(out.warnings.is_empty());
    assert_eq!(out.diagnostics.len(), 1);
}

#[test]
fn test_length_mismatch_is_a_warning() {
    PrettyTrace::new().on();
    let json = r#"{
        "records": [
            { "id": "uca", "sequence": "ACGTAC" },
            { "id": "n1", "sequence": "ACGTACG", "parent": "uca" }
        ]
    }"#;
    let args = setup("mismatch", json, &["TREE"]);
    let out = main_lineage(&args).unwrap();
    let n1 = &out.lineage.nodes[1];
    assert_eq!(n1.muts.nt_diffs, 0);
    assert!(out.diagnostics.count(|w| matches!(w, Warning::LengthMismatch { .. })) >= 1);
    assert!(out.text.starts_with("uca\n╚"));
}

#[test]
fn test_errors() {
    PrettyTrace::new().on();
    assert!(main_lineage(&["lineage".to_string()]).is_err());
    let json = r#"{
        "records": [
            { "id": "r1", "sequence": "ACGT" },
            { "id": "r2", "sequence": "ACGA" }
        ]
    }"#;
    let args = setup("two_roots", json, &[]);
    let e = main_lineage(&args).err().unwrap();
    assert!(e.contains("could not be built"));

    let args = setup("bad_json", "{ records: ", &[]);
    let e = main_lineage(&args).err().unwrap();
    assert!(e.contains("could not be parsed"));
}
