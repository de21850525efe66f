pub mod cli;

pub use duplex_bio as bio;
pub use duplex_core::{DuplexError, DuplexResult};
