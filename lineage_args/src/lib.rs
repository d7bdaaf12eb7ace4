// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

pub mod proc_args;
pub mod proc_args2;
