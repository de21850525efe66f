//! MUM-anchored alignment of nucleotide sequences.
//!
//! Maximal unique matches seed the alignment, compatible seeds are grouped
//! into chained clusters, and the DP core fills in everything between and
//! around the anchors.

pub mod cluster;
pub mod extend;
pub mod mum;

pub use cluster::{Cluster, ClusterBuilder};
pub use extend::MAXIMUM_ALIGNMENT_LENGTH;
pub use mum::{Match, MatchFinder, MaximalUniqueMatchFinder};

use crate::alignment::dp::GapModel;
use crate::alignment::gap::GapCosts;
use crate::alignment::result::{PairwiseAlignedSequence, PairwiseSequenceAlignment, Strand};
use crate::matrix::{SimilarityMatrix, StandardMatrix};
use crate::sequence::Sequence;
use duplex_core::config::NucmerSettings;
use duplex_core::{DuplexError, DuplexResult};
use extend::{score_columns, Extender};
use rayon::prelude::*;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct NucmerConfig {
    /// Minimum length of a seed match
    pub length_of_mum: usize,
    /// Minimum total match length of a kept cluster
    pub minimum_score: i64,
    pub fixed_separation: i64,
    pub maximum_separation: i64,
    pub separation_factor: f32,
    /// Gaps shorter than this always join two clusters
    pub break_length: usize,
    /// Skip the reverse complement of each query
    pub forward_only: bool,
    pub matrix: SimilarityMatrix,
    pub gaps: GapCosts,
}

impl Default for NucmerConfig {
    fn default() -> Self {
        Self {
            length_of_mum: 20,
            minimum_score: 200,
            fixed_separation: 5,
            maximum_separation: 1000,
            separation_factor: 0.05,
            break_length: 200,
            forward_only: false,
            matrix: SimilarityMatrix::standard(StandardMatrix::DiagonalScore),
            gaps: GapCosts::new(-13, -8),
        }
    }
}

impl NucmerConfig {
    pub fn from_settings(settings: &NucmerSettings) -> DuplexResult<Self> {
        Ok(Self {
            length_of_mum: settings.length_of_mum,
            minimum_score: settings.minimum_score,
            fixed_separation: settings.fixed_separation,
            maximum_separation: settings.maximum_separation,
            separation_factor: settings.separation_factor,
            break_length: settings.break_length,
            forward_only: settings.forward_only,
            matrix: SimilarityMatrix::resolve(&settings.matrix)?,
            gaps: GapCosts::new(settings.gap_open, settings.gap_extension),
        })
    }

    fn cluster_builder(&self) -> ClusterBuilder {
        ClusterBuilder {
            fixed_separation: self.fixed_separation,
            maximum_separation: self.maximum_separation,
            minimum_score: self.minimum_score,
            separation_factor: self.separation_factor,
        }
    }
}

/// Aligns every query against every reference, one
/// `PairwiseSequenceAlignment` per pair (queries outer, references inner).
pub struct NucmerAligner {
    config: NucmerConfig,
    finder: Box<dyn MatchFinder>,
}

impl NucmerAligner {
    pub fn new(config: NucmerConfig) -> Self {
        Self::with_finder(config, Box::new(MaximalUniqueMatchFinder))
    }

    /// Use a custom seed source
    pub fn with_finder(config: NucmerConfig, finder: Box<dyn MatchFinder>) -> Self {
        Self { config, finder }
    }

    pub fn config(&self) -> &NucmerConfig {
        &self.config
    }

    pub fn align(
        &self,
        references: &[Sequence],
        queries: &[Sequence],
    ) -> DuplexResult<Vec<PairwiseSequenceAlignment>> {
        self.run(references, queries, GapModel::Affine)
    }

    /// Same as [`align`](Self::align) but every gap column costs the open penalty
    pub fn align_simple(
        &self,
        references: &[Sequence],
        queries: &[Sequence],
    ) -> DuplexResult<Vec<PairwiseSequenceAlignment>> {
        self.run(references, queries, GapModel::Simple)
    }

    fn run(
        &self,
        references: &[Sequence],
        queries: &[Sequence],
        model: GapModel,
    ) -> DuplexResult<Vec<PairwiseSequenceAlignment>> {
        if self.config.length_of_mum == 0 {
            return Err(DuplexError::MumLengthTooSmall(self.config.length_of_mum));
        }
        if references.is_empty() || queries.is_empty() {
            return Ok(Vec::new());
        }

        match model {
            GapModel::Simple => self.config.gaps.validate_simple()?,
            GapModel::Affine => self.config.gaps.validate_affine()?,
        }
        self.validate(references, queries)?;

        let pairs: Vec<(&Sequence, &Sequence)> = queries
            .iter()
            .flat_map(|query| references.iter().map(move |reference| (reference, query)))
            .collect();

        debug!(
            "Aligning {} reference(s) against {} query(ies) with {} gaps",
            references.len(),
            queries.len(),
            model
        );

        pairs
            .par_iter()
            .map(|&(reference, query)| self.align_pair(reference, query, model))
            .collect()
    }

    fn validate(&self, references: &[Sequence], queries: &[Sequence]) -> DuplexResult<()> {
        let alphabet = references[0].alphabet();
        for (label, sequences) in [("reference", references), ("query", queries)] {
            for (index, sequence) in sequences.iter().enumerate() {
                let name = format!("{} {}", label, index + 1);
                if sequence.is_empty() {
                    return Err(DuplexError::EmptySequence(format!("{} has no symbols", name)));
                }
                if sequence.alphabet() != alphabet {
                    return Err(DuplexError::AlphabetMismatch(format!(
                        "{} is {}, reference 1 is {}",
                        name,
                        sequence.alphabet(),
                        alphabet
                    )));
                }
                self.config.matrix.check_symbols(sequence.symbols(), &name)?;
            }
        }
        Ok(())
    }

    fn align_pair(
        &self,
        reference: &Sequence,
        query: &Sequence,
        model: GapModel,
    ) -> DuplexResult<PairwiseSequenceAlignment> {
        let mut alignment = PairwiseSequenceAlignment::new(reference.clone(), query.clone());

        for fragment in self.strand_fragments(reference, query, model, Strand::Forward)? {
            alignment.add(fragment);
        }

        if !self.config.forward_only {
            if let Some(reverse) = query.reverse_complement() {
                for fragment in self.strand_fragments(reference, &reverse, model, Strand::Reverse)? {
                    alignment.add(fragment);
                }
            }
        }

        alignment.insert_metadata("algorithm", "nucmer");
        alignment.insert_metadata("gap_model", model.to_string());
        alignment.insert_metadata("matrix", self.config.matrix.name());
        Ok(alignment)
    }

    fn strand_fragments(
        &self,
        reference: &Sequence,
        query: &Sequence,
        model: GapModel,
        strand: Strand,
    ) -> DuplexResult<Vec<PairwiseAlignedSequence>> {
        let upper_reference = reference.symbols().to_ascii_uppercase();
        let upper_query = query.symbols().to_ascii_uppercase();

        let matches = self.finder.find_matches(
            &upper_reference,
            &upper_query,
            self.config.length_of_mum,
        );
        if matches.is_empty() {
            return Ok(Vec::new());
        }

        let clusters = self.config.cluster_builder().build(matches);
        let extender = Extender {
            reference: reference.symbols(),
            query: query.symbols(),
            matrix: &self.config.matrix,
            gaps: self.config.gaps,
            model,
            break_length: self.config.break_length,
        };
        let mut fragments = extender.extend(clusters)?;
        fragments.sort_by_key(|f| f.reference_start);

        debug!("{:?} strand produced {} fragment(s)", strand, fragments.len());

        Ok(fragments
            .into_iter()
            .map(|f| {
                let score = score_columns(&f.first, &f.second, &self.config.matrix, self.config.gaps, model);
                PairwiseAlignedSequence::from_columns(
                    reference.alphabet(),
                    f.first,
                    f.second,
                    score,
                    f.reference_start,
                    f.query_start,
                    &self.config.matrix,
                    strand,
                )
            })
            .collect())
    }
}
