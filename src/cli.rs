// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `paratask`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "paratask",
    version,
    about = "Run fan-out task graphs wave by wave on a fixed thread pool.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the task graph config (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Number of worker threads. Overrides `[config].workers`.
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PARATASK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the wave plan, but run nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Ignore the config and merge-sort N generated numbers instead.
    #[arg(long, value_name = "N", conflicts_with = "dry_run")]
    pub sort: Option<usize>,
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
