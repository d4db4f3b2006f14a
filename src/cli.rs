// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::InitialClock;

/// Command-line arguments for `livefire`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "livefire",
    version,
    about = "Watch files and print a fresh timestamp every time one of them changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Files to watch, in addition to `[watch].files` from the config.
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Livefire.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Milliseconds to gather filesystem events into one change.
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Starting value of the change clock.
    #[arg(long, value_enum, value_name = "CLOCK")]
    pub initial_clock: Option<InitialClock>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LIVEFIRE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve targets, print what would be watched, and exit.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
