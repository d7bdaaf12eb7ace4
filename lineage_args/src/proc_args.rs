// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Process command-line arguments.  Arguments have the form KEY or KEY=VALUE, and each sets one
// field of the control structure.

use crate::proc_args2::{
    is_f64_arg, is_simple_arg, is_string_arg, is_usize_arg, require_readable_file,
    test_writeable,
};
use lineage_core::defs::LineageControl;
use log::debug;
use string_utils::TextUtils;

pub fn proc_args(ctl: &mut LineageControl, args: &[String]) -> Result<(), String> {
    // Define arguments that set something to true.

    let mut set_true = [
        ("NEWICK", &mut ctl.output_opt.newick),
        ("NODEDUP", &mut ctl.input_opt.nodedup),
        ("NOWARN", &mut ctl.output_opt.nowarn),
        ("TREE", &mut ctl.output_opt.tree),
        ("VERBOSE", &mut ctl.gen_opt.verbose),
    ];

    // Define arguments that set something to a usize.

    let mut set_usize = [("FONT_SIZE", &mut ctl.layout_opt.font_size)];

    // Define arguments that set something to an f64.

    let mut set_f64 = [
        ("DUP_GAP", &mut ctl.layout_opt.dup_gap),
        ("LINE_HEIGHT", &mut ctl.layout_opt.line_height),
        ("NODE_WIDTH", &mut ctl.layout_opt.node_width),
        ("ROOT_Y", &mut ctl.layout_opt.root_y),
        ("TALL", &mut ctl.layout_opt.tall_multiplier),
        ("VGAP", &mut ctl.layout_opt.vertical_gap),
        ("WIDTH", &mut ctl.layout_opt.total_width),
    ];

    // Define arguments that set something to a string that is an output file name or stdout.

    let mut set_string_writeable_or_stdout = [
        ("LAYOUT", &mut ctl.output_opt.layout),
        ("PARSEABLE", &mut ctl.output_opt.parseable),
    ];

    // Define arguments that set something to a string that is an output file name.

    let mut set_string_writeable = [("LOG", &mut ctl.gen_opt.log)];

    // Define arguments that set something to a string that is an input file name.

    let mut set_string_readable = [
        ("GERMLINE", &mut ctl.input_opt.germline),
        ("RECORDS", &mut ctl.input_opt.records),
    ];

    // Traverse arguments.

    'args_loop: for arg in args.iter().skip(1) {
        if arg.is_empty() {
            return Err(
                "\nYou've passed a null argument.  Normally that isn't possible.\n\
                 Please take a detailed look at how you're invoking the program.\n"
                    .to_string(),
            );
        }
        for (name, val) in set_true.iter_mut() {
            if is_simple_arg(arg, name)? {
                **val = true;
                continue 'args_loop;
            }
        }
        for (name, val) in set_usize.iter_mut() {
            if is_usize_arg(arg, name)? {
                **val = arg.after(&format!("{}=", name)).force_usize();
                continue 'args_loop;
            }
        }
        for (name, val) in set_f64.iter_mut() {
            if is_f64_arg(arg, name)? {
                **val = arg.after(&format!("{}=", name)).force_f64();
                continue 'args_loop;
            }
        }
        for (name, val) in set_string_writeable_or_stdout.iter_mut() {
            if is_string_arg(arg, name)? {
                let x = arg.after(&format!("{}=", name)).to_string();
                if x.is_empty() {
                    return Err(format!("\nFilename output in {} cannot be empty.\n", name));
                }
                if x != "stdout" {
                    test_writeable(&x)?;
                }
                **val = x;
                continue 'args_loop;
            }
        }
        for (name, val) in set_string_writeable.iter_mut() {
            if is_string_arg(arg, name)? {
                let x = arg.after(&format!("{}=", name)).to_string();
                if x.is_empty() {
                    return Err(format!("\nFilename output in {} cannot be empty.\n", name));
                }
                test_writeable(&x)?;
                **val = x;
                continue 'args_loop;
            }
        }
        for (name, val) in set_string_readable.iter_mut() {
            if is_string_arg(arg, name)? {
                let x = arg.after(&format!("{}=", name)).to_string();
                if x.is_empty() {
                    return Err(format!("\nFilename input in {} cannot be empty.\n", name));
                }
                require_readable_file(&x, arg)?;
                **val = x;
                continue 'args_loop;
            }
        }
        return Err(format!(
            "\nUnrecognized argument {}.  Please type the command with no arguments for \
             help.\n",
            arg
        ));
    }
    check_args(ctl)?;
    debug!("processed {} arguments", args.len().saturating_sub(1));
    Ok(())
}

// Test for arguments that are individually fine but make no sense.

fn check_args(ctl: &LineageControl) -> Result<(), String> {
    if ctl.input_opt.records.is_empty() {
        return Err("\nPlease specify the input file, using RECORDS=path.\n".to_string());
    }
    let lay = &ctl.layout_opt;
    for (name, val) in [
        ("WIDTH", lay.total_width),
        ("NODE_WIDTH", lay.node_width),
        ("LINE_HEIGHT", lay.line_height),
    ] {
        if val <= 0.0 {
            return Err(format!("\nThe value of {} must be positive.\n", name));
        }
    }
    for (name, val) in [("VGAP", lay.vertical_gap), ("DUP_GAP", lay.dup_gap)] {
        if val < 0.0 {
            return Err(format!("\nThe value of {} must not be negative.\n", name));
        }
    }
    if lay.tall_multiplier < 1.0 {
        return Err("\nThe value of TALL must be at least 1.\n".to_string());
    }
    if lay.font_size == 0 {
        return Err("\nThe value of FONT_SIZE must be positive.\n".to_string());
    }
    if 2.0 * lay.padding >= lay.node_width {
        return Err("\nThe value of NODE_WIDTH is too small to hold any text.\n".to_string());
    }
    if ctl.output_opt.parseable == "stdout" && ctl.output_opt.layout == "stdout" {
        return Err(
            "\nPARSEABLE=stdout and LAYOUT=stdout may not be used together.\n".to_string(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::write;

    fn args(x: &[&str]) -> Vec<String> {
        let mut v = vec!["lineage".to_string()];
        v.extend(x.iter().map(|s| s.to_string()));
        v
    }

    #[test]
    fn test_proc_args() {
        let dir = std::env::temp_dir();
        let records = dir.join("lineage_args_test_records.json");
        let records = records.to_str().unwrap().to_string();
        write(&records, "{}").unwrap();

        let r = format!("RECORDS={}", records);
        let r = r.as_str();
        let mut ctl = LineageControl::default();
        proc_args(
            &mut ctl,
            &args(&[
                r,
                "WIDTH=300",
                "FONT_SIZE=9",
                "TALL=2",
                "TREE",
                "NODEDUP",
                "LAYOUT=stdout",
            ]),
        )
        .unwrap();
        assert_eq!(ctl.input_opt.records, records);
        assert_eq!(ctl.layout_opt.total_width, 300.0);
        assert_eq!(ctl.layout_opt.font_size, 9);
        assert_eq!(ctl.layout_opt.tall_multiplier, 2.0);
        assert!(ctl.output_opt.tree && ctl.input_opt.nodedup);
        assert!(!ctl.output_opt.newick);
        assert_eq!(ctl.output_opt.layout, "stdout");
        assert_eq!(ctl.layout_opt.vertical_gap, 40.0);

        let mut ctl = LineageControl::default();
        assert!(proc_args(&mut ctl, &args(&["TREE"])).is_err());
        assert!(proc_args(&mut ctl, &args(&[r, "BOGUS"])).is_err());
        let mut ctl = LineageControl::default();
        assert!(proc_args(&mut ctl, &args(&[r, "WIDTH=0"])).is_err());
        let mut ctl = LineageControl::default();
        assert!(proc_args(&mut ctl, &args(&[r, "TALL=0.5"])).is_err());
        let mut ctl = LineageControl::default();
        assert!(proc_args(&mut ctl, &args(&["RECORDS=/nonexistent_dir/r.json"])).is_err());
        let mut ctl = LineageControl::default();
        assert!(proc_args(&mut ctl, &args(&[r, "PARSEABLE=stdout", "LAYOUT=stdout"])).is_err());
    }
}
