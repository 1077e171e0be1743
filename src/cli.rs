// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `promptdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "promptdag",
    version,
    about = "Run prompt-driven tasks sequentially, respecting dependencies.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the task definition file (JSON array of task records).
    ///
    /// Default: `Promptdag.json` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Promptdag.json")]
    pub tasks: String,

    /// Shell command invoked once per task; the prompt is written to its
    /// stdin and its stdout is the reply. Required unless --dry-run.
    #[arg(long, value_name = "CMD")]
    pub agent_cmd: Option<String>,

    /// Pause in milliseconds between one task settling and the next
    /// dispatch.
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub delay_ms: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROMPTDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate the task file, print the execution order preview,
    /// but don't run any task.
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
