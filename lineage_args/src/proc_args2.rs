// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

use io_utils::path_exists;
use std::fs::{remove_file, File};
use std::str::FromStr;
use string_utils::TextUtils;

// ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓

// Say where a file path points, if the directory part is the problem.

fn dir_note(val: &str) -> String {
    if !val.contains('/') {
        return String::new();
    }
    let dir = val.rev_before("/");
    let msg = if path_exists(dir) {
        "exists"
    } else {
        "does not exist"
    };
    format!("Note that the path {} {}.\n", dir, msg)
}

// Test a file for writeability by writing and then deleting it.  An existing file is left
// alone, as it will be overwritten anyway.

pub fn test_writeable(val: &str) -> Result<(), String> {
    let existed = path_exists(val);
    if File::create(val).is_err() {
        return Err(format!(
            "\nYou've specified an output file\n{}\nthat cannot be written.\n{}",
            val,
            dir_note(val)
        ));
    }
    if !existed {
        remove_file(val).map_err(|e| format!("\nUnable to remove the file {}: {}.\n", val, e))?;
    }
    Ok(())
}

pub fn require_readable_file(val: &str, arg: &str) -> Result<(), String> {
    if File::open(val).is_err() {
        return Err(format!(
            "\nIn the argument {}, the file\n{}\ncould not be opened for reading.\n{}",
            arg,
            val,
            dir_note(val)
        ));
    }
    Ok(())
}

// ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓

// Flags.  TREE= is accepted as well as TREE, as that is what an empty environment variable
// turns into.

pub fn is_simple_arg(arg: &str, key: &str) -> Result<bool, String> {
    match arg.strip_prefix(key) {
        Some("") | Some("=") => Ok(true),
        Some(rest) if rest.starts_with('=') => Err(format!(
            "\nThe argument {} takes no value, so \"{}\" is not valid.\n",
            key, arg
        )),
        _ => Ok(false),
    }
}

// KEY=VALUE arguments whose value must parse as a T.  A bare KEY, or a value that does not
// parse, is an error that shows the expected form.

fn is_typed_arg<T: FromStr>(arg: &str, key: &str, form: &str) -> Result<bool, String> {
    let value = match arg.strip_prefix(key) {
        None => return Ok(false),
        Some("") => None,
        Some(rest) => match rest.strip_prefix('=') {
            Some(v) => Some(v),
            None => return Ok(false),
        },
    };
    match value {
        Some(v) if v.parse::<T>().is_ok() => Ok(true),
        _ => Err(format!(
            "\n\"{}\" is not a valid argument.  Please use {}={}.\n",
            arg, key, form
        )),
    }
}

pub fn is_usize_arg(arg: &str, key: &str) -> Result<bool, String> {
    is_typed_arg::<usize>(arg, key, "n, where n is a nonnegative integer")
}

pub fn is_f64_arg(arg: &str, key: &str) -> Result<bool, String> {
    is_typed_arg::<f64>(arg, key, "x, where x is a number")
}

pub fn is_string_arg(arg: &str, key: &str) -> Result<bool, String> {
    is_typed_arg::<String>(arg, key, "s for some string s")
}
