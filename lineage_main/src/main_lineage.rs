// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.
//
// The lineage pipeline: read records, build the tree, resolve mutations, lay out the tree and
// write the requested outputs.

use itertools::Itertools;
use lineage_args::proc_args::proc_args;
use lineage_core::defs::LineageControl;
use lineage_core::diagnostics::Diagnostics;
use lineage_core::lineage::Lineage;
use lineage_core::logging::{init_logging, set_logfile};
use lineage_core::records::{read_germline, read_lineage_input};
use lineage_mutate::resolve_mutations;
use lineage_tail::layout::TreeLayout;
use lineage_tail::tail::tail_code;
use log::{debug, info};
use std::time::Instant;

pub const USAGE: &str = "\nUsage: lineage RECORDS=path [options]\n\n\
    input\n\
    RECORDS=path      json file of lineage records (required)\n\
    GERMLINE=path     json file holding the germline reference\n\
    NODEDUP           don't turn identical childless siblings into duplicates\n\n\
    layout\n\
    WIDTH=x           total page width\n\
    ROOT_Y=x          y coordinate of the root\n\
    VGAP=x            vertical gap between a node and its children\n\
    NODE_WIDTH=x      width of a node box\n\
    LINE_HEIGHT=x     height of one line of text in a node box\n\
    FONT_SIZE=n       font size used to wrap text\n\
    TALL=x            height multiplier for nodes with potency or comments\n\
    DUP_GAP=x         gap between stacked duplicates\n\n\
    output\n\
    TREE              print the tree as text\n\
    NEWICK            print the tree in Newick format\n\
    PARSEABLE=path    write a tab-separated table, or to stdout\n\
    LAYOUT=path       write node geometry as json, or to stdout\n\
    NOWARN            don't print warnings\n\
    LOG=path          append log messages to a file\n\
    VERBOSE           echo log messages, including debugging messages\n";

pub struct MainLineageOutput {
    pub lineage: Lineage,
    pub layout: TreeLayout,
    pub diagnostics: Diagnostics,
    pub text: String,     // for stdout
    pub warnings: String, // for stderr, empty if NOWARN
}

pub fn main_lineage(args: &[String]) -> Result<MainLineageOutput, String> {
    if args.len() < 2 {
        return Err(USAGE.to_string());
    }
    let mut ctl = LineageControl::default();
    proc_args(&mut ctl, args)?;
    if !ctl.gen_opt.log.is_empty() {
        set_logfile(&ctl.gen_opt.log);
    }
    init_logging(ctl.gen_opt.verbose);
    info!("{}", args.iter().format(" "));
    run_lineage(&ctl)
}

pub fn run_lineage(ctl: &LineageControl) -> Result<MainLineageOutput, String> {
    let t = Instant::now();
    let path = &ctl.input_opt.records;
    let mut input = read_lineage_input(path)?;
    if !ctl.input_opt.germline.is_empty() {
        input.germline = Some(read_germline(&ctl.input_opt.germline)?);
    }
    let mut diag = Diagnostics::new();
    let mut lineage = Lineage::from_input(&input, ctl.input_opt.nodedup, &mut diag)
        .map_err(|e| format!("\nThe lineage in {} could not be built: {}.\n", path, e))?;
    debug!(
        "built lineage {} with {} nodes in {:.2} seconds",
        lineage.name,
        lineage.len(),
        t.elapsed().as_secs_f64()
    );
    resolve_mutations(&mut lineage, &mut diag);
    let (layout, text) = tail_code(&lineage, ctl)?;
    let warnings = if ctl.output_opt.nowarn {
        String::new()
    } else {
        diag.report()
    };
    info!(
        "done with {} warnings, used {:.2} seconds",
        diag.len(),
        t.elapsed().as_secs_f64()
    );
    Ok(MainLineageOutput {
        lineage,
        layout,
        diagnostics: diag,
        text,
        warnings,
    })
}
