// Copyright (c) 2021 10x Genomics, Inc. All rights reserved.

pub mod defs;
pub mod diagnostics;
pub mod errors;
pub mod lineage;
pub mod logging;
pub mod records;
pub mod regions;
pub mod translate;
