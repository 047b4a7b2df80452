//! Logger setup for the command-line front end.
//!
//! Download and convert runs also append to `./harvest.log`, so the record of
//! an interrupted run survives the resumed one.

use std::fs::{File, OpenOptions};
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "harvest.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Terminal only; used by the listing commands.
    Terminal,
    /// Terminal plus `./harvest.log`.
    TerminalAndFile,
}

/// Installs the global logger. `verbose` lowers the level to debug.
pub fn initialize(destination: LogDestination, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if destination == LogDestination::TerminalAndFile {
        if let Some(file) = open_log_file(Path::new(LOG_FILE)) {
            loggers.push(WriteLogger::new(level, config, file));
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        // reqwest/hyper chatter stays out of the log.
        .add_filter_allow_str("verse_")
        .add_filter_allow_str("bible_harvest")
        .build()
}

fn open_log_file(path: &Path) -> Option<File> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!("Warning: log file {} unavailable: {err}", path.display());
            None
        }
    }
}
