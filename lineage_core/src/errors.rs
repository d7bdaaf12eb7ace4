// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Errors raised while building a lineage or deriving its regions.  Data quality problems that
// the resolver can live with (e.g. sequences of unequal length) are not errors but warnings,
// see diagnostics.rs.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineageError {
    #[error("region {region} is empty or missing for reference {reference}")]
    IncompleteRegionData { reference: String, region: String },

    #[error("cannot compare {what}: lengths {left} and {right} differ")]
    LengthMismatch {
        what: String,
        left: usize,
        right: usize,
    },

    #[error("unknown node {id}")]
    UnknownNode { id: String },

    #[error("node {id} names parent {parent}, which is not in the lineage")]
    UnknownParent { id: String, parent: String },

    #[error("node id {id} appears more than once")]
    DuplicateId { id: String },

    #[error("the lineage has no root")]
    NoRoot,

    #[error("the lineage has two roots, {first} and {second}")]
    MultipleRoots { first: String, second: String },

    #[error("node {id} is its own ancestor")]
    Cycle { id: String },

    #[error("node {id} is declared a duplicate of {top}, which is not a top node")]
    BadDuplicate { id: String, top: String },
}
