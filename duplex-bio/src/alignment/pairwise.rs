/// Pairwise aligner facade over the DP core
use crate::alignment::config::AlignerConfig;
use crate::alignment::dp::{self, DpMode, GapModel};
use crate::alignment::gap::GapCosts;
use crate::alignment::result::{PairwiseAlignedSequence, PairwiseSequenceAlignment, Strand};
use crate::matrix::SimilarityMatrix;
use crate::sequence::Sequence;
use duplex_core::{DuplexError, DuplexResult};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignmentAlgorithm {
    /// Global alignment
    NeedlemanWunsch,
    /// Local alignment
    SmithWaterman,
    /// End-gap-free overlap alignment
    PairwiseOverlap,
}

impl AlignmentAlgorithm {
    pub fn mode(&self) -> DpMode {
        match self {
            AlignmentAlgorithm::NeedlemanWunsch => DpMode::Global,
            AlignmentAlgorithm::SmithWaterman => DpMode::Local,
            AlignmentAlgorithm::PairwiseOverlap => DpMode::Overlap,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AlignmentAlgorithm::NeedlemanWunsch => "needleman-wunsch",
            AlignmentAlgorithm::SmithWaterman => "smith-waterman",
            AlignmentAlgorithm::PairwiseOverlap => "pairwise-overlap",
        }
    }
}

impl fmt::Display for AlignmentAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AlignmentAlgorithm {
    type Err = DuplexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "needleman-wunsch" | "nw" | "global" => Ok(AlignmentAlgorithm::NeedlemanWunsch),
            "smith-waterman" | "sw" | "local" => Ok(AlignmentAlgorithm::SmithWaterman),
            "pairwise-overlap" | "overlap" => Ok(AlignmentAlgorithm::PairwiseOverlap),
            other => Err(DuplexError::Configuration(format!(
                "Unknown alignment algorithm: {}",
                other
            ))),
        }
    }
}

/// Needleman-Wunsch, Smith-Waterman and overlap alignment of two sequences.
///
/// `align*` entry points use the affine recurrence unless the configured
/// extension cost equals the open cost; `align_simple*` always use the
/// linear recurrence and ignore the extension cost.
#[derive(Debug, Clone)]
pub struct PairwiseAligner {
    algorithm: AlignmentAlgorithm,
    config: AlignerConfig,
}

impl PairwiseAligner {
    pub fn new(algorithm: AlignmentAlgorithm, config: AlignerConfig) -> Self {
        Self { algorithm, config }
    }

    pub fn with_defaults(algorithm: AlignmentAlgorithm) -> Self {
        Self::new(algorithm, AlignerConfig::default())
    }

    pub fn algorithm(&self) -> AlignmentAlgorithm {
        self.algorithm
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    pub fn align(&self, first: &Sequence, second: &Sequence) -> DuplexResult<Vec<PairwiseSequenceAlignment>> {
        self.run(self.config.matrix(), self.config.gaps(), GapModel::Affine, first, second)
    }

    pub fn align_simple(
        &self,
        first: &Sequence,
        second: &Sequence,
    ) -> DuplexResult<Vec<PairwiseSequenceAlignment>> {
        self.run(self.config.matrix(), self.config.gaps(), GapModel::Simple, first, second)
    }

    /// Exactly two sequences are required
    pub fn align_list(&self, sequences: &[Sequence]) -> DuplexResult<Vec<PairwiseSequenceAlignment>> {
        let (first, second) = pair(sequences)?;
        self.align(first, second)
    }

    pub fn align_simple_list(
        &self,
        sequences: &[Sequence],
    ) -> DuplexResult<Vec<PairwiseSequenceAlignment>> {
        let (first, second) = pair(sequences)?;
        self.align_simple(first, second)
    }

    /// Align with explicit scoring, ignoring the configured matrix and gaps
    pub fn align_with(
        &self,
        matrix: &SimilarityMatrix,
        gap_open: i32,
        gap_extension: i32,
        first: &Sequence,
        second: &Sequence,
    ) -> DuplexResult<Vec<PairwiseSequenceAlignment>> {
        self.run(matrix, GapCosts::new(gap_open, gap_extension), GapModel::Affine, first, second)
    }

    pub fn align_simple_with(
        &self,
        matrix: &SimilarityMatrix,
        gap_open: i32,
        first: &Sequence,
        second: &Sequence,
    ) -> DuplexResult<Vec<PairwiseSequenceAlignment>> {
        self.run(matrix, GapCosts::simple(gap_open), GapModel::Simple, first, second)
    }

    fn run(
        &self,
        matrix: &SimilarityMatrix,
        gaps: GapCosts,
        requested: GapModel,
        first: &Sequence,
        second: &Sequence,
    ) -> DuplexResult<Vec<PairwiseSequenceAlignment>> {
        validate_inputs(matrix, first, second)?;
        match requested {
            GapModel::Simple => gaps.validate_simple()?,
            GapModel::Affine => gaps.validate_affine()?,
        }

        let model = if requested == GapModel::Affine && gaps.is_linear() {
            debug!("Gap extension equals gap open, using the simple recurrence");
            GapModel::Simple
        } else {
            requested
        };
        let mode = self.algorithm.mode();

        let raw = dp::align(
            first.symbols(),
            second.symbols(),
            matrix,
            gaps,
            mode,
            model,
            self.config.co_optimal_limit(),
        )?;

        let mut fragments: Vec<PairwiseAlignedSequence> = Vec::with_capacity(raw.len());
        for fragment in raw {
            let aligned = PairwiseAlignedSequence::from_columns(
                first.alphabet(),
                fragment.first,
                fragment.second,
                fragment.score as i64,
                fragment.reference_start,
                fragment.query_start,
                matrix,
                Strand::Forward,
            );
            if !fragments.iter().any(|f| f.same_fragment(&aligned)) {
                fragments.push(aligned);
            }
        }

        if mode == DpMode::Local {
            fragments.sort_by_key(|f| (Reverse(f.score), f.first_offset, f.second_offset));
        } else {
            fragments.sort_by_key(|f| (f.first_offset, f.second_offset));
        }

        debug!(
            "{} produced {} fragment(s) with {} gaps",
            self.algorithm,
            fragments.len(),
            model
        );

        if fragments.is_empty() {
            return Ok(Vec::new());
        }

        let mut alignment = PairwiseSequenceAlignment::new(first.clone(), second.clone());
        alignment.aligned_sequences = fragments;
        alignment.insert_metadata("algorithm", self.algorithm.name());
        alignment.insert_metadata("gap_model", model.to_string());
        alignment.insert_metadata("matrix", matrix.name());
        Ok(vec![alignment])
    }
}

impl Default for PairwiseAligner {
    fn default() -> Self {
        Self::with_defaults(AlignmentAlgorithm::NeedlemanWunsch)
    }
}

fn pair(sequences: &[Sequence]) -> DuplexResult<(&Sequence, &Sequence)> {
    match sequences {
        [first, second] => Ok((first, second)),
        _ => Err(DuplexError::WrongArgumentCount(sequences.len())),
    }
}

fn validate_inputs(matrix: &SimilarityMatrix, first: &Sequence, second: &Sequence) -> DuplexResult<()> {
    if first.is_empty() {
        return Err(DuplexError::EmptySequence("first sequence has no symbols".to_string()));
    }
    if second.is_empty() {
        return Err(DuplexError::EmptySequence("second sequence has no symbols".to_string()));
    }
    if first.alphabet() != second.alphabet() {
        return Err(DuplexError::AlphabetMismatch(format!(
            "first sequence is {}, second sequence is {}",
            first.alphabet(),
            second.alphabet()
        )));
    }
    matrix.check_symbols(first.symbols(), "first sequence")?;
    matrix.check_symbols(second.symbols(), "second sequence")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::matrix::StandardMatrix;

    fn protein(text: &str) -> Sequence {
        Sequence::new(Alphabet::Protein, text).unwrap()
    }

    fn dna(text: &str) -> Sequence {
        Sequence::new(Alphabet::Dna, text).unwrap()
    }

    fn blosum_aligner(algorithm: AlignmentAlgorithm, open: i32, extension: i32) -> PairwiseAligner {
        let config = AlignerConfig::builder()
            .matrix(SimilarityMatrix::standard(StandardMatrix::Blosum62))
            .gap_open(open)
            .gap_extension(extension)
            .build()
            .unwrap();
        PairwiseAligner::new(algorithm, config)
    }

    #[test]
    fn test_smith_waterman_protein() {
        let aligner = blosum_aligner(AlignmentAlgorithm::SmithWaterman, -8, -8);
        let result = aligner
            .align_simple(&protein("HEAGAWGHEE"), &protein("PAWHEAE"))
            .unwrap();

        assert_eq!(result.len(), 1);
        let fragment = &result[0].aligned_sequences[0];
        assert_eq!(fragment.first.to_string(), "AWGHE");
        assert_eq!(fragment.second.to_string(), "AW-HE");
        assert_eq!(fragment.score, 20);
        assert_eq!((fragment.first_offset, fragment.second_offset), (0, 3));
        assert_eq!(result[0].metadata["algorithm"], "smith-waterman");
    }

    #[test]
    fn test_equal_costs_route_to_simple() {
        let aligner = blosum_aligner(AlignmentAlgorithm::NeedlemanWunsch, -8, -8);
        let first = protein("HEAGAWGHEE");
        let second = protein("PAWHEAE");

        let affine = aligner.align(&first, &second).unwrap();
        let simple = aligner.align_simple(&first, &second).unwrap();

        assert_eq!(affine[0].metadata["gap_model"], "simple");
        assert!(crate::alignment::compare_alignments(
            &affine[0].aligned_sequences,
            &simple[0].aligned_sequences
        ));
    }

    #[test]
    fn test_validation_errors() {
        let aligner = PairwiseAligner::default();
        let empty = Sequence::new(Alphabet::Dna, "").unwrap();

        assert!(matches!(
            aligner.align(&empty, &dna("ACGT")),
            Err(DuplexError::EmptySequence(_))
        ));
        assert!(matches!(
            aligner.align(&dna("ACGT"), &empty),
            Err(DuplexError::EmptySequence(_))
        ));
        assert!(matches!(
            aligner.align(&dna("ACGT"), &protein("ACGT")),
            Err(DuplexError::AlphabetMismatch(_))
        ));
        assert!(matches!(
            aligner.align_list(&[dna("ACGT")]),
            Err(DuplexError::WrongArgumentCount(1))
        ));
        assert!(matches!(
            aligner.align_simple_list(&[dna("A"), dna("C"), dna("G")]),
            Err(DuplexError::WrongArgumentCount(3))
        ));
    }

    #[test]
    fn test_matrix_coverage_names_sequence() {
        let matrix = SimilarityMatrix::standard(StandardMatrix::EdnaFull);
        let aligner = PairwiseAligner::default();
        let result = aligner.align_simple_with(&matrix, -5, &protein("ACGT"), &protein("ACGE"));

        match result {
            Err(DuplexError::IncompatibleMatrix(msg)) => {
                assert_eq!(
                    msg,
                    "EDNAFull does not cover symbol 'E' at position 3 of the second sequence"
                );
            }
            other => panic!("Expected IncompatibleMatrix, got {:?}", other),
        }
    }

    #[test]
    fn test_gap_cost_validation() {
        let aligner = PairwiseAligner::default();
        let matrix = SimilarityMatrix::diagonal(2, -2);

        assert!(matches!(
            aligner.align_with(&matrix, 0, -1, &dna("AC"), &dna("AC")),
            Err(DuplexError::InvalidGapCost(_))
        ));
        assert!(matches!(
            aligner.align_with(&matrix, -1, -8, &dna("AC"), &dna("AC")),
            Err(DuplexError::InvalidGapCost(_))
        ));
        // The simple recurrence ignores the extension cost entirely
        assert!(aligner.align_simple_with(&matrix, -1, &dna("AC"), &dna("AC")).is_ok());
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!(
            "global".parse::<AlignmentAlgorithm>().unwrap(),
            AlignmentAlgorithm::NeedlemanWunsch
        );
        assert_eq!(
            "Smith-Waterman".parse::<AlignmentAlgorithm>().unwrap(),
            AlignmentAlgorithm::SmithWaterman
        );
        assert_eq!(
            "overlap".parse::<AlignmentAlgorithm>().unwrap(),
            AlignmentAlgorithm::PairwiseOverlap
        );
        assert!("blast".parse::<AlignmentAlgorithm>().is_err());
    }
}
