pub mod config;
pub mod dp;
pub mod gap;
pub mod pairwise;
pub mod result;

pub use config::{AlignerConfig, AlignerConfigBuilder};
pub use dp::{AlignedFragment, DpMode, GapModel};
pub use gap::GapCosts;
pub use pairwise::{AlignmentAlgorithm, PairwiseAligner};
pub use result::{
    compare_alignments, padding_offsets, FragmentMetadata, PairwiseAlignedSequence,
    PairwiseSequenceAlignment, Strand,
};
