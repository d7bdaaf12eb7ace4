// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Produce the requested outputs for a resolved lineage.  Text meant for the terminal is
// appended to the returned string; parseable and layout output go to the named files, or are
// also appended if the name is "stdout".

use crate::display_tree::display_tree;
use crate::layout::{layout_lineage, TreeLayout};
use crate::newick::newick;
use crate::parseable::parseable_output;
use io_utils::fwrite;
use lineage_core::defs::LineageControl;
use lineage_core::lineage::Lineage;
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use string_utils::strme;

// Width in characters of the text tree.

pub const TREE_WIDTH: usize = 80;

fn write_output(path: &str, what: &str, data: &[u8], out: &mut String) -> Result<(), String> {
    if path == "stdout" {
        *out += strme(data);
        return Ok(());
    }
    let f = File::create(path).map_err(|_| {
        format!(
            "\nUnable to write the {} file\n\"{}\".\nPlease check that the path makes \
             sense and that you have write permission for it.\n",
            what, path
        )
    })?;
    let mut f = BufWriter::new(f);
    f.write_all(data)
        .and_then(|_| f.flush())
        .map_err(|e| format!("\nWriting the {} file {} failed: {}.\n", what, path, e))?;
    debug!("wrote {} bytes to {}", data.len(), path);
    Ok(())
}

pub fn tail_code(lineage: &Lineage, ctl: &LineageControl) -> Result<(TreeLayout, String), String> {
    let mut out = String::new();
    let layout = layout_lineage(lineage, &ctl.layout_opt);
    if ctl.output_opt.tree {
        out += &display_tree(lineage, TREE_WIDTH);
    }
    if ctl.output_opt.newick {
        out += &format!("{}\n", newick(lineage));
    }
    if !ctl.output_opt.parseable.is_empty() {
        let data = parseable_output(lineage);
        write_output(&ctl.output_opt.parseable, "parseable", &data, &mut out)?;
    }
    if !ctl.output_opt.layout.is_empty() {
        let mut data = Vec::<u8>::new();
        fwrite!(data, "{}\n", layout.to_json()?);
        write_output(&ctl.output_opt.layout, "layout", &data, &mut out)?;
    }
    Ok((layout, out))
}
