// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

pub mod display_tree;
pub mod geometry;
pub mod layout;
pub mod newick;
pub mod node_text;
pub mod parseable;
pub mod string_width;
pub mod tail;
