//! CLI argument definitions using clap.
//!
//! The flag surface is deliberately small: validation tunables come from the
//! config file, not from flags.

use std::path::PathBuf;

use clap::Parser;

/// Validate a batch of OpenRouter API keys against the live API.
///
/// Reads credentials from the configured key file, probes each one (auth
/// check, then a free-model chat completion), and writes valid/invalid key
/// lists to the output directory.
#[derive(Parser, Debug)]
#[command(name = "keyvet")]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a TOML config file (default: ./keyvet.toml if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit JSON log lines instead of human-readable ones
    #[arg(long)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long)]
    pub verbose: bool,
}
