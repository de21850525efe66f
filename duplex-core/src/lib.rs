//! Core utilities and types shared across all duplex crates

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{
    default_config, load_config, save_config, Config, LoggingSettings, NucmerSettings,
    PairwiseSettings,
};
pub use error::{DuplexError, DuplexResult};
pub use logging::init_logging;

/// Version information for the duplex project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
