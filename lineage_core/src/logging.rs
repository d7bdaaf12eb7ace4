// Copyright (c) 2021 10x Genomics, Inc. All rights reserved.

// Logging.  Messages sent through the log crate are appended to the file named by LOG=, if
// given, and echoed to stderr in VERBOSE mode.  Warnings are also collected by Diagnostics
// and printed at the end of a run, so they are not echoed here by default.

use lazy_static::lazy_static;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering::SeqCst};
use std::sync::Mutex;

lazy_static! {
    pub static ref LINEAGE_LOGFILE: Mutex<Vec<String>> = Mutex::new(Vec::<String>::new());
}

static ECHO: AtomicBool = AtomicBool::new(false);

// Set once a failure to write the log file has been reported.

static LOGFILE_FAILED: AtomicBool = AtomicBool::new(false);

pub fn set_logfile(path: &str) {
    if let Ok(mut f) = LINEAGE_LOGFILE.lock() {
        f.clear();
        if !path.is_empty() {
            f.push(path.to_string());
        }
    }
    LOGFILE_FAILED.store(false, SeqCst);
}

pub fn logme(s: &str) -> Result<(), String> {
    let logfile = LINEAGE_LOGFILE
        .lock()
        .map_err(|_| "the log file name is unavailable".to_string())?;
    if !logfile.is_empty() {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&logfile[0])
            .map_err(|e| format!("unable to open the log file {}: {}", logfile[0], e))?;
        writeln!(file, "{}", s)
            .map_err(|e| format!("unable to write to the log file {}: {}", logfile[0], e))?;
    }
    Ok(())
}

struct LineageLogger;

static LOGGER: LineageLogger = LineageLogger;

impl Log for LineageLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.level(), record.args());
        if ECHO.load(SeqCst) {
            eprintln!("{}", line);
        }
        if let Err(e) = logme(&line) {
            if !LOGFILE_FAILED.swap(true, SeqCst) {
                eprintln!("\nWARNING: {}.\n", e);
            }
        }
    }

    fn flush(&self) {}
}

// Install the logger.  Calling this more than once only updates the verbosity.

pub fn init_logging(verbose: bool) {
    let _ = log::set_logger(&LOGGER);
    ECHO.store(verbose, SeqCst);
    if verbose {
        log::set_max_level(LevelFilter::Debug);
    } else {
        log::set_max_level(LevelFilter::Warn);
    }
}
