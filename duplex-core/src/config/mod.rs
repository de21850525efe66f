//! Configuration types for duplex

use crate::DuplexError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub pairwise: PairwiseSettings,
    #[serde(default)]
    pub nucmer: NucmerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Settings for the dynamic-programming aligners
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairwiseSettings {
    /// One of "needleman-wunsch", "smith-waterman" or "pairwise-overlap"
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// `diagonal(match, mismatch)`, a standard matrix name or a path to a matrix file
    #[serde(default = "default_pairwise_matrix")]
    pub matrix: String,
    #[serde(default = "default_pairwise_gap_open")]
    pub gap_open: i32,
    #[serde(default = "default_pairwise_gap_extension")]
    pub gap_extension: i32,
    /// Maximum number of co-optimal tracebacks reported per origin
    #[serde(default = "default_co_optimal_limit")]
    pub co_optimal_limit: usize,
}

/// Settings for the MUM-anchored aligner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NucmerSettings {
    #[serde(default = "default_length_of_mum")]
    pub length_of_mum: usize,
    #[serde(default = "default_minimum_score")]
    pub minimum_score: i64,
    #[serde(default = "default_fixed_separation")]
    pub fixed_separation: i64,
    #[serde(default = "default_maximum_separation")]
    pub maximum_separation: i64,
    #[serde(default = "default_separation_factor")]
    pub separation_factor: f32,
    #[serde(default = "default_break_length")]
    pub break_length: usize,
    #[serde(default = "default_forward_only")]
    pub forward_only: bool,
    #[serde(default = "default_nucmer_matrix")]
    pub matrix: String,
    #[serde(default = "default_nucmer_gap_open")]
    pub gap_open: i32,
    #[serde(default = "default_nucmer_gap_extension")]
    pub gap_extension: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive when DUPLEX_LOG / RUST_LOG are unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_algorithm() -> String { "needleman-wunsch".to_string() }
fn default_pairwise_matrix() -> String { "diagonal(2, -2)".to_string() }
fn default_pairwise_gap_open() -> i32 { -8 }
fn default_pairwise_gap_extension() -> i32 { -1 }
fn default_co_optimal_limit() -> usize { 1 }
fn default_length_of_mum() -> usize { 20 }
fn default_minimum_score() -> i64 { 200 }
fn default_fixed_separation() -> i64 { 5 }
fn default_maximum_separation() -> i64 { 1000 }
fn default_separation_factor() -> f32 { 0.05 }
fn default_break_length() -> usize { 200 }
fn default_forward_only() -> bool { false }
fn default_nucmer_matrix() -> String { "diagonal-score".to_string() }
fn default_nucmer_gap_open() -> i32 { -13 }
fn default_nucmer_gap_extension() -> i32 { -8 }
fn default_log_level() -> String { "info".to_string() }

impl Default for PairwiseSettings {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            matrix: default_pairwise_matrix(),
            gap_open: default_pairwise_gap_open(),
            gap_extension: default_pairwise_gap_extension(),
            co_optimal_limit: default_co_optimal_limit(),
        }
    }
}

impl Default for NucmerSettings {
    fn default() -> Self {
        Self {
            length_of_mum: default_length_of_mum(),
            minimum_score: default_minimum_score(),
            fixed_separation: default_fixed_separation(),
            maximum_separation: default_maximum_separation(),
            separation_factor: default_separation_factor(),
            break_length: default_break_length(),
            forward_only: default_forward_only(),
            matrix: default_nucmer_matrix(),
            gap_open: default_nucmer_gap_open(),
            gap_extension: default_nucmer_gap_extension(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, DuplexError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| DuplexError::Configuration(format!("Failed to parse config: {}", e)))?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), DuplexError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| DuplexError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
