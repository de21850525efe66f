//! Sequence alignment for duplex

pub mod alignment;
pub mod alphabet;
pub mod matrix;
pub mod nucmer;
pub mod sequence;

// Re-export commonly used types
pub use alignment::{
    AlignerConfig, AlignmentAlgorithm, GapCosts, PairwiseAlignedSequence, PairwiseAligner,
    PairwiseSequenceAlignment, Strand,
};
pub use alphabet::Alphabet;
pub use matrix::{SimilarityMatrix, StandardMatrix};
pub use nucmer::{NucmerAligner, NucmerConfig};
pub use sequence::Sequence;
