pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use duplex_core::{load_config, Config, DuplexResult};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "duplex",
    version,
    about = "Pairwise and MUM-anchored sequence alignment",
    long_about = "Duplex aligns pairs of sequences with Needleman-Wunsch, Smith-Waterman or \
                  end-gap-free overlap alignment, and aligns nucleotide sets with a \
                  NUCmer-style maximal unique match aligner."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Align two sequences with a dynamic-programming aligner
    Align(commands::align::AlignArgs),

    /// Align reference and query sets anchored on maximal unique matches
    Nucmer(commands::nucmer::NucmerArgs),
}

/// Configuration file if given, built-in defaults otherwise
pub fn load_settings(path: Option<&Path>) -> DuplexResult<Config> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

/// Log level implied by `-v` flags, falling back to the configured level
pub fn log_level(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}
