/// Alignment results and comparison helpers
use crate::alphabet::{Alphabet, GAP};
use crate::matrix::SimilarityMatrix;
use crate::sequence::Sequence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

/// Coordinates and counts for one aligned fragment.
///
/// Offsets are 0-based positions in the original sequences, reference
/// (first) then query (second). End offsets are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentMetadata {
    pub start_offsets: [usize; 2],
    pub end_offsets: [usize; 2],
    /// Gap columns inserted into the first and second sequence
    pub insertions: [usize; 2],
    pub identical_count: usize,
    /// Aligned pairs with a positive similarity score
    pub similarity_count: usize,
    pub strand: Strand,
}

/// One gapped fragment of a pairwise alignment
#[derive(Debug, Clone, Serialize)]
pub struct PairwiseAlignedSequence {
    pub first: Sequence,
    pub second: Sequence,
    pub consensus: Sequence,
    pub score: i64,
    pub first_offset: usize,
    pub second_offset: usize,
    pub metadata: FragmentMetadata,
}

impl PairwiseAlignedSequence {
    /// Assemble a fragment from its gapped rows.
    ///
    /// `reference_start` / `query_start` locate the first column in the
    /// original sequences and determine the padding offsets: the sequence
    /// starting earlier is padded so that both line up.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_columns(
        alphabet: Alphabet,
        first: Vec<u8>,
        second: Vec<u8>,
        score: i64,
        reference_start: usize,
        query_start: usize,
        matrix: &SimilarityMatrix,
        strand: Strand,
    ) -> Self {
        let mut insertions = [0usize; 2];
        let mut identical_count = 0;
        let mut similarity_count = 0;
        let mut consensus = Vec::with_capacity(first.len());

        for (&a, &b) in first.iter().zip(second.iter()) {
            consensus.push(alphabet.consensus(a, b));
            if a == GAP {
                insertions[0] += 1;
            }
            if b == GAP {
                insertions[1] += 1;
            }
            if a != GAP && b != GAP {
                if a.eq_ignore_ascii_case(&b) {
                    identical_count += 1;
                }
                if matrix.pair_score(a, b) > 0 {
                    similarity_count += 1;
                }
            }
        }

        let reference_span = first.len() - insertions[0];
        let query_span = second.len() - insertions[1];
        let (first_offset, second_offset) = padding_offsets(reference_start, query_start);

        Self {
            first: Sequence::gapped(alphabet, first),
            second: Sequence::gapped(alphabet, second),
            consensus: Sequence::gapped(alphabet, consensus),
            score,
            first_offset,
            second_offset,
            metadata: FragmentMetadata {
                start_offsets: [reference_start, query_start],
                end_offsets: [
                    (reference_start + reference_span).saturating_sub(1),
                    (query_start + query_span).saturating_sub(1),
                ],
                insertions,
                identical_count,
                similarity_count,
                strand,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// Fraction of columns holding identical residues
    pub fn identity(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.metadata.identical_count as f64 / self.len() as f64
    }

    /// Same strings, consensus, offsets and score
    pub fn same_alignment(&self, other: &Self) -> bool {
        self.first == other.first
            && self.second == other.second
            && self.consensus == other.consensus
            && self.first_offset == other.first_offset
            && self.second_offset == other.second_offset
            && self.score == other.score
    }

    /// Column markup: `|` identical, `.` mismatch, space for a gap
    pub fn markup(&self) -> String {
        self.first
            .symbols()
            .iter()
            .zip(self.second.symbols())
            .map(|(&a, &b)| {
                if a == GAP || b == GAP {
                    ' '
                } else if a.eq_ignore_ascii_case(&b) {
                    '|'
                } else {
                    '.'
                }
            })
            .collect()
    }

    /// Structural identity used to drop duplicate tracebacks
    pub(crate) fn same_fragment(&self, other: &Self) -> bool {
        self.first == other.first
            && self.second == other.second
            && self.score == other.score
            && self.metadata.start_offsets == other.metadata.start_offsets
            && self.metadata.end_offsets == other.metadata.end_offsets
    }
}

impl fmt::Display for PairwiseAlignedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "score {}  offsets ({}, {})  identity {:.1}%",
            self.score,
            self.first_offset,
            self.second_offset,
            self.identity() * 100.0
        )?;
        writeln!(f, "{}", self.first)?;
        writeln!(f, "{}", self.markup())?;
        write!(f, "{}", self.second)
    }
}

/// All fragments produced for one pair of input sequences
#[derive(Debug, Clone, Serialize)]
pub struct PairwiseSequenceAlignment {
    pub first_sequence: Sequence,
    pub second_sequence: Sequence,
    pub aligned_sequences: Vec<PairwiseAlignedSequence>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl PairwiseSequenceAlignment {
    pub fn new(first_sequence: Sequence, second_sequence: Sequence) -> Self {
        Self {
            first_sequence,
            second_sequence,
            aligned_sequences: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, fragment: PairwiseAlignedSequence) {
        self.aligned_sequences.push(fragment);
    }

    pub fn insert_metadata(&mut self, key: &str, value: impl Into<serde_json::Value>) {
        self.metadata.insert(key.to_string(), value.into());
    }

    pub fn len(&self) -> usize {
        self.aligned_sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_sequences.is_empty()
    }

    /// Order fragments by reference start, then query start (stable)
    pub fn sort_by_position(&mut self) {
        self.aligned_sequences
            .sort_by_key(|f| (f.metadata.start_offsets[0], f.metadata.start_offsets[1]));
    }

    pub fn total_score(&self) -> i64 {
        self.aligned_sequences.iter().map(|f| f.score).sum()
    }
}

/// Padding that lines both fragments up in original coordinates
pub fn padding_offsets(reference_start: usize, query_start: usize) -> (usize, usize) {
    if query_start >= reference_start {
        (query_start - reference_start, 0)
    } else {
        (0, reference_start - query_start)
    }
}

/// Element-wise [`PairwiseAlignedSequence::same_alignment`] over two lists
pub fn compare_alignments(
    expected: &[PairwiseAlignedSequence],
    actual: &[PairwiseAlignedSequence],
) -> bool {
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual.iter())
            .all(|(a, b)| a.same_alignment(b))
}
