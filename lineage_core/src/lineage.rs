// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// A lineage is a rooted tree of nodes, stored as an arena.  Nodes refer to their parent and
// children by index into the arena, and children are kept in the order in which they were
// added.  Node ids are unique across nodes and duplicates.

use crate::defs::{Germline, Node, NodeInfo};
use crate::diagnostics::{Diagnostics, Warning};
use crate::errors::LineageError;
use crate::records::{LineageInput, RawRecord};
use crate::regions::{RegionBoundaries, RegionMapper, RegionSet};
use std::collections::{HashMap, HashSet, VecDeque};

pub struct Lineage {
    pub name: String,
    pub nodes: Vec<Node>,
    pub root: usize,
    pub germline: Option<Germline>,
    pub region_error: Option<LineageError>,
    index: HashMap<String, usize>,
    dup_index: HashMap<String, usize>,
}

impl Lineage {
    pub fn new(name: &str, mut root: Node) -> Lineage {
        root.is_root = true;
        root.parent = None;
        root.level = 0;
        let mut index = HashMap::new();
        index.insert(root.id.clone(), 0);
        Lineage {
            name: name.to_string(),
            nodes: vec![root],
            root: 0,
            germline: None,
            region_error: None,
            index,
            dup_index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    pub fn find(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    // Locate a duplicate by id, returning its top node and its position in the group.

    pub fn find_duplicate(&self, id: &str) -> Option<(usize, usize)> {
        let top = *self.dup_index.get(id)?;
        let k = self.nodes[top].dups.iter().position(|d| d.id == id)?;
        Some((top, k))
    }

    fn check_new_id(&self, id: &str) -> Result<(), LineageError> {
        if self.index.contains_key(id) || self.dup_index.contains_key(id) {
            return Err(LineageError::DuplicateId { id: id.to_string() });
        }
        Ok(())
    }

    pub fn add_child(&mut self, parent: usize, mut node: Node) -> Result<usize, LineageError> {
        self.check_new_id(&node.id)?;
        if parent >= self.nodes.len() {
            return Err(LineageError::UnknownNode {
                id: format!("#{}", parent),
            });
        }
        let i = self.nodes.len();
        node.is_root = false;
        node.parent = Some(parent);
        node.level = self.nodes[parent].level + 1;
        self.index.insert(node.id.clone(), i);
        self.nodes.push(node);
        self.nodes[parent].children.push(i);
        Ok(i)
    }

    // Add a duplicate to the group of a top node.  Its sequence data are copied from the top
    // node as they are now.

    pub fn add_duplicate(
        &mut self,
        top: usize,
        id: &str,
        info: NodeInfo,
    ) -> Result<(), LineageError> {
        self.check_new_id(id)?;
        let d = self.nodes[top].make_duplicate(id, info);
        self.nodes[top].dups.push(d);
        self.dup_index.insert(id.to_string(), top);
        Ok(())
    }

    // Remove a child from its parent.  The child must be present: anything else means the
    // topology is corrupted, and we stop.

    pub fn remove_child(&mut self, parent: usize, child: usize) {
        let p = self.nodes[parent].children.iter().position(|c| *c == child);
        match p {
            Some(p) => {
                self.nodes[parent].children.remove(p);
                self.nodes[child].parent = None;
            }
            None => panic!(
                "structural inconsistency: {} is not a child of {}",
                self.nodes[child].id, self.nodes[parent].id
            ),
        }
    }

    pub fn is_ancestor(&self, a: usize, b: usize) -> bool {
        let mut x = self.nodes[b].parent;
        while let Some(p) = x {
            if p == a {
                return true;
            }
            x = self.nodes[p].parent;
        }
        false
    }

    // Move a subtree under a new parent.

    pub fn reparent(&mut self, child: usize, new_parent: usize) -> Result<(), LineageError> {
        if child == new_parent || self.is_ancestor(child, new_parent) {
            return Err(LineageError::Cycle {
                id: self.nodes[child].id.clone(),
            });
        }
        let old = match self.nodes[child].parent {
            Some(p) => p,
            None => {
                return Err(LineageError::UnknownParent {
                    id: self.nodes[child].id.clone(),
                    parent: String::new(),
                })
            }
        };
        self.remove_child(old, child);
        self.nodes[child].parent = Some(new_parent);
        self.nodes[new_parent].children.push(child);
        self.set_levels();
        Ok(())
    }

    // ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓

    // Traversals.  All follow children in insertion order, so results are deterministic.

    // Root outward, level by level.

    pub fn bfs_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::new();
        queue.push_back(self.root);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for c in self.nodes[v].children.iter() {
                queue.push_back(*c);
            }
        }
        order
    }

    // Depth first, parents before children.

    pub fn pre_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(v) = stack.pop() {
            order.push(v);
            for c in self.nodes[v].children.iter().rev() {
                stack.push(*c);
            }
        }
        order
    }

    // Depth first, children before parents.

    pub fn post_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root, false)];
        while let Some((v, expanded)) = stack.pop() {
            if expanded {
                order.push(v);
            } else {
                stack.push((v, true));
                for c in self.nodes[v].children.iter().rev() {
                    stack.push((*c, false));
                }
            }
        }
        order
    }

    // Leaves, left to right.

    pub fn leaves(&self) -> Vec<usize> {
        self.pre_order()
            .into_iter()
            .filter(|v| self.nodes[*v].children.is_empty())
            .collect()
    }

    pub fn set_levels(&mut self) {
        for v in self.bfs_order() {
            self.nodes[v].level = match self.nodes[v].parent {
                Some(p) => self.nodes[p].level + 1,
                None => 0,
            };
        }
    }

    // ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓

    // Assign aligned sequences and region boundaries from the sequence and regions of a
    // reference record.  If the regions are incomplete, no node gets region data and the error is kept.  IMGT
    // padding is removed from each sequence before projection, but a - marking a deleted base
    // stays, so that the sequence keeps one residue per reference column.

    pub fn assign_regions(
        &mut self,
        reference_name: &str,
        reference_seq: &str,
        regions: &RegionSet,
        diag: &mut Diagnostics,
    ) {
        match RegionMapper::new(reference_name, reference_seq, regions, diag) {
            Ok(mapper) => {
                for node in self.nodes.iter_mut() {
                    let m = mapper.map(&node.id, &node.seq.replace('.', ""), diag);
                    node.aligned_seq = m.aligned;
                    node.boundaries = Some(m.boundaries);
                }
                self.region_error = None;
            }
            Err(e) => {
                diag.push(Warning::RegionsDisabled {
                    reason: e.to_string(),
                });
                for node in self.nodes.iter_mut() {
                    node.aligned_seq = node.seq.clone();
                    node.boundaries = None;
                }
                self.region_error = Some(e);
            }
        }
    }

    // Build a lineage from records.
    //
    // A record without a parent is the root.  A record naming a duplicate as its parent is
    // attached to the duplicate's top node.  Unless nodedup is set, a childless record whose
    // sequence is identical to that of an earlier sibling becomes a duplicate of that sibling,
    // where children of a duplicate count as siblings of the children of its top node.  An
    // explicit duplicate whose parent is not that of its top node is kept, with a warning.

    pub fn from_input(
        input: &LineageInput,
        nodedup: bool,
        diag: &mut Diagnostics,
    ) -> Result<Lineage, LineageError> {
        let recs = &input.records;
        let mut ids = HashSet::<&str>::new();
        for r in recs.iter() {
            if !ids.insert(&r.id) {
                return Err(LineageError::DuplicateId { id: r.id.clone() });
            }
        }

        // Find the root.

        let mut root = None;
        for (i, r) in recs.iter().enumerate() {
            if r.parent.is_none() && r.duplicate_of.is_none() {
                if let Some(j) = root {
                    let first: &RawRecord = &recs[j];
                    return Err(LineageError::MultipleRoots {
                        first: first.id.clone(),
                        second: r.id.clone(),
                    });
                }
                root = Some(i);
            }
        }
        let root = root.ok_or(LineageError::NoRoot)?;

        // Decide which records are duplicates, and of what.

        let mut dup_of = HashMap::<usize, String>::new();
        for (i, r) in recs.iter().enumerate() {
            if let Some(top) = &r.duplicate_of {
                dup_of.insert(i, top.clone());
            }
        }

        // An explicit duplicate stands for its top node when named as a parent.

        let explicit: HashMap<&str, &str> = recs
            .iter()
            .filter_map(|r| r.duplicate_of.as_deref().map(|t| (r.id.as_str(), t)))
            .collect();
        let parent_of = |r: &RawRecord| -> String {
            let p = r.parent.as_deref().unwrap_or_default();
            explicit.get(p).copied().unwrap_or(p).to_string()
        };
        let position: HashMap<&str, usize> = recs
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.as_str(), i))
            .collect();
        for r in recs.iter() {
            if let (Some(top), Some(_)) = (&r.duplicate_of, &r.parent) {
                if let Some(t) = position.get(top.as_str()) {
                    let (parent, top_parent) = (parent_of(r), parent_of(&recs[*t]));
                    if parent != top_parent {
                        diag.push(Warning::DuplicateParentMismatch {
                            id: r.id.clone(),
                            parent,
                            top: top.clone(),
                            top_parent,
                        });
                    }
                }
            }
        }

        if !nodedup {
            let has_children: HashSet<&str> =
                recs.iter().filter_map(|r| r.parent.as_deref()).collect();
            let mut first_with = HashMap::<(String, String), usize>::new();
            for (i, r) in recs.iter().enumerate() {
                if dup_of.contains_key(&i) || i == root {
                    continue;
                }
                let key = (parent_of(r), r.sequence.to_uppercase());
                match first_with.get(&key) {
                    Some(j) if !has_children.contains(r.id.as_str()) => {
                        dup_of.insert(i, recs[*j].id.clone());
                    }
                    Some(_) => {}
                    None => {
                        first_with.insert(key, i);
                    }
                }
            }
        }
        let is_dup: HashSet<&str> = dup_of.keys().map(|i| recs[*i].id.as_str()).collect();
        let top_of = |id: &str| -> String {
            for (i, r) in recs.iter().enumerate() {
                if r.id == id {
                    if let Some(t) = dup_of.get(&i) {
                        return t.clone();
                    }
                }
            }
            id.to_string()
        };

        // Group children by parent, in arrival order, and check that every parent exists.

        let mut children = HashMap::<String, Vec<usize>>::new();
        for (i, r) in recs.iter().enumerate() {
            if i == root || dup_of.contains_key(&i) {
                continue;
            }
            let parent = r.parent.clone().unwrap_or_default();
            if !ids.contains(parent.as_str()) {
                return Err(LineageError::UnknownParent {
                    id: r.id.clone(),
                    parent,
                });
            }
            let parent = if is_dup.contains(parent.as_str()) {
                top_of(&parent)
            } else {
                parent
            };
            children.entry(parent).or_default().push(i);
        }

        // Create the arena, root outward.

        let make_node = |r: &RawRecord| -> Node {
            let mut node = Node::new(&r.id, &r.sequence, r.is_dna);
            node.info = info_of(r);
            node.has_insertions = r.has_insertions;
            node.has_deletions = r.has_deletions;
            node
        };
        let mut lineage = Lineage::new(&input.name, make_node(&recs[root]));
        let mut queue = VecDeque::new();
        queue.push_back((root, 0));
        while let Some((i, v)) = queue.pop_front() {
            if let Some(kids) = children.get(&recs[i].id) {
                for k in kids.iter() {
                    let w = lineage.add_child(v, make_node(&recs[*k]))?;
                    queue.push_back((*k, w));
                }
            }
        }
        for (i, r) in recs.iter().enumerate() {
            if !dup_of.contains_key(&i) && lineage.find(&r.id).is_none() {
                return Err(LineageError::Cycle { id: r.id.clone() });
            }
        }

        // Germline reference.

        if let Some(g) = &input.germline {
            let aligned = g.aligned.to_uppercase();
            lineage.germline = Some(Germline {
                boundaries: RegionBoundaries::from_germline(&g.boundaries, aligned.len()),
                aligned,
            });
        }

        // Regions come from the root if it has them, and otherwise from the first record that
        // does.  Lacking both, germline boundaries are used as they are.

        let reference = if recs[root].regions.is_some() {
            Some(&recs[root])
        } else {
            recs.iter().find(|r| r.regions.is_some())
        };
        match reference {
            Some(r) => {
                if let Some(regions) = &r.regions {
                    lineage.assign_regions(&r.id, &r.sequence, regions, diag);
                }
            }
            None => {
                if let Some(g) = &lineage.germline {
                    let b = g.boundaries;
                    for node in lineage.nodes.iter_mut() {
                        node.boundaries = Some(b);
                    }
                }
            }
        }

        // Duplicates, now that the top nodes carry their final sequence data.

        for (i, r) in recs.iter().enumerate() {
            if let Some(top_id) = dup_of.get(&i) {
                let top = match lineage.find(top_id) {
                    Some(t) => t,
                    None => {
                        return Err(LineageError::BadDuplicate {
                            id: r.id.clone(),
                            top: top_id.clone(),
                        })
                    }
                };
                lineage.add_duplicate(top, &r.id, info_of(r))?;
            }
        }
        Ok(lineage)
    }
}

fn info_of(r: &RawRecord) -> NodeInfo {
    let mut comments = [String::new(), String::new()];
    for (j, c) in r.comments.iter().take(2).enumerate() {
        comments[j] = c.clone();
    }
    NodeInfo {
        cell_type: r.cell_type.clone(),
        time_point: r.time_point.clone(),
        potency: r.potency.clone(),
        comments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_trace::PrettyTrace;

    fn input() -> LineageInput {
        LineageInput {
            name: "test".to_string(),
            germline: None,
            records: vec![
                RawRecord::new("b", "ACGA", Some("a")),
                RawRecord::new("a", "ACGT", None),
                RawRecord::new("c", "ACCT", Some("a")),
                RawRecord::new("d", "TCGA", Some("b")),
                RawRecord::new("e", "TCGA", Some("b")),
            ],
        }
    }

    #[test]
    fn test_from_input() {
        PrettyTrace::new().noexit().on();
        let mut diag = Diagnostics::new();
        let l = Lineage::from_input(&input(), false, &mut diag).unwrap();
        assert_eq!(l.len(), 4);
        assert_eq!(l.root().id, "a");
        assert!(l.root().is_root);
        let b = l.find("b").unwrap();
        let d = l.find("d").unwrap();
        assert_eq!(l.nodes[b].children, vec![d]);
        assert_eq!(l.nodes[d].level, 2);
        assert_eq!(l.nodes[d].dups.len(), 1);
        assert_eq!(l.nodes[d].dups[0].seq, "TCGA");
        assert_eq!(l.find_duplicate("e"), Some((d, 0)));
        let ids: Vec<&str> = l.bfs_order().iter().map(|v| l.nodes[*v].id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        let ids: Vec<&str> = l.post_order().iter().map(|v| l.nodes[*v].id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "c", "a"]);
        let ids: Vec<&str> = l.leaves().iter().map(|v| l.nodes[*v].id.as_str()).collect();
        assert_eq!(ids, vec!["d", "c"]);

        let l = Lineage::from_input(&input(), true, &mut diag).unwrap();
        assert_eq!(l.len(), 5);
    }

    #[test]
    fn test_topology_errors() {
        let mut diag = Diagnostics::new();
        let mut x = input();
        x.records.push(RawRecord::new("f", "ACGT", None));
        assert!(matches!(
            Lineage::from_input(&x, false, &mut diag),
            Err(LineageError::MultipleRoots { .. })
        ));
        let mut x = input();
        x.records[1].parent = Some("d".to_string());
        assert_eq!(
            Lineage::from_input(&x, false, &mut diag).err(),
            Some(LineageError::NoRoot)
        );
        let mut x = input();
        x.records[2].parent = Some("zz".to_string());
        assert!(matches!(
            Lineage::from_input(&x, false, &mut diag),
            Err(LineageError::UnknownParent { .. })
        ));
        let mut x = input();
        x.records[3].id = "b".to_string();
        assert!(matches!(
            Lineage::from_input(&x, false, &mut diag),
            Err(LineageError::DuplicateId { .. })
        ));
        let mut x = input();
        x.records.push(RawRecord::new("g", "ACGT", Some("h")));
        x.records.push(RawRecord::new("h", "ACGT", Some("g")));
        assert!(matches!(
            Lineage::from_input(&x, true, &mut diag),
            Err(LineageError::Cycle { .. })
        ));
    }

    #[test]
    fn test_reparent() {
        let mut diag = Diagnostics::new();
        let mut l = Lineage::from_input(&input(), false, &mut diag).unwrap();
        let (b, c, d) = (
            l.find("b").unwrap(),
            l.find("c").unwrap(),
            l.find("d").unwrap(),
        );
        l.reparent(d, c).unwrap();
        assert!(l.nodes[b].children.is_empty());
        assert_eq!(l.nodes[c].children, vec![d]);
        assert_eq!(l.nodes[d].parent, Some(c));
        assert!(l.reparent(c, d).is_err());
    }

    #[test]
    #[should_panic(expected = "structural inconsistency")]
    fn test_remove_missing_child() {
        let mut diag = Diagnostics::new();
        let mut l = Lineage::from_input(&input(), false, &mut diag).unwrap();
        let (b, c) = (l.find("b").unwrap(), l.find("c").unwrap());
        l.remove_child(b, c);
    }

    #[test]
    fn test_regions_all_or_nothing() {
        let mut diag = Diagnostics::new();
        let mut x = input();
        x.records[1].regions = Some(RegionSet {
            fwr1: "A".to_string(),
            cdr1: "C".to_string(),
            fwr2: "".to_string(),
            cdr2: "G".to_string(),
            fwr3: "T".to_string(),
            cdr3: "A".to_string(),
            fwr4: "C".to_string(),
        });
        let l = Lineage::from_input(&x, false, &mut diag).unwrap();
        assert!(l.region_error.is_some());
        assert!(l.nodes.iter().all(|n| n.boundaries.is_none()));
        assert_eq!(
            diag.count(|w| matches!(w, Warning::RegionsDisabled { .. })),
            1
        );
    }

    #[test]
    fn test_dedup_through_explicit_duplicate() {
        let mut a2 = RawRecord::new("a2", "AGGT", Some("r"));
        a2.duplicate_of = Some("a".to_string());
        let x = LineageInput {
            name: "test".to_string(),
            germline: None,
            records: vec![
                RawRecord::new("r", "ACGT", None),
                RawRecord::new("a", "AGGT", Some("r")),
                a2,
                RawRecord::new("x", "TTTT", Some("a")),
                RawRecord::new("y", "tttt", Some("a2")),
            ],
        };
        let mut diag = Diagnostics::new();
        let l = Lineage::from_input(&x, false, &mut diag).unwrap();
        assert!(diag.is_empty());
        assert_eq!(l.len(), 3);
        assert!(l.find("y").is_none());
        let xi = l.find("x").unwrap();
        assert_eq!(l.nodes[xi].dups[0].id, "y");
        assert_eq!(l.find_duplicate("y"), Some((xi, 0)));

        let l = Lineage::from_input(&x, true, &mut diag).unwrap();
        assert_eq!(l.len(), 4);
        assert_eq!(l.nodes[l.find("y").unwrap()].parent, l.find("a"));
    }

    #[test]
    fn test_duplicate_with_other_parent() {
        let mut b = RawRecord::new("b", "AGGT", Some("c"));
        b.duplicate_of = Some("a".to_string());
        let x = LineageInput {
            name: "test".to_string(),
            germline: None,
            records: vec![
                RawRecord::new("r", "ACGT", None),
                RawRecord::new("a", "AGGT", Some("r")),
                RawRecord::new("c", "ACGA", Some("r")),
                b,
            ],
        };
        let mut diag = Diagnostics::new();
        let l = Lineage::from_input(&x, false, &mut diag).unwrap();
        assert_eq!(
            diag.warnings(),
            &[Warning::DuplicateParentMismatch {
                id: "b".to_string(),
                parent: "c".to_string(),
                top: "a".to_string(),
                top_parent: "r".to_string(),
            }]
        );
        assert_eq!(l.nodes[l.find("a").unwrap()].dups[0].id, "b");
    }
}
