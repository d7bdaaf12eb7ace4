// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

use lineage_main::main_lineage::main_lineage;
use log::error;
use pretty_trace::*;
use std::env;

fn main() {
    PrettyTrace::new().on();
    let args: Vec<String> = env::args().collect();
    match main_lineage(&args) {
        Err(e) => {
            error!("{}", e.trim());
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Ok(out) => {
            print!("{}", out.text);
            eprint!("{}", out.warnings);
        }
    }
}
