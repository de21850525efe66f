/// Immutable aligner configuration
use crate::alignment::gap::GapCosts;
use crate::matrix::SimilarityMatrix;
use duplex_core::{DuplexError, DuplexResult, PairwiseSettings};

/// Matrix, gap costs and co-optimal cap used by a [`PairwiseAligner`].
///
/// Built once through [`AlignerConfig::builder`] and never mutated, so an
/// aligner can be shared freely between threads.
///
/// [`PairwiseAligner`]: crate::alignment::PairwiseAligner
#[derive(Debug, Clone)]
pub struct AlignerConfig {
    matrix: SimilarityMatrix,
    gaps: GapCosts,
    co_optimal_limit: usize,
}

impl AlignerConfig {
    pub fn builder() -> AlignerConfigBuilder {
        AlignerConfigBuilder::default()
    }

    /// Build from the `[pairwise]` configuration section. The matrix is
    /// resolved as `diagonal(match, mismatch)` or a standard name first, then
    /// as a file path.
    pub fn from_settings(settings: &PairwiseSettings) -> DuplexResult<Self> {
        let matrix = SimilarityMatrix::resolve(&settings.matrix)?;
        Self::builder()
            .matrix(matrix)
            .gap_open(settings.gap_open)
            .gap_extension(settings.gap_extension)
            .co_optimal_limit(settings.co_optimal_limit)
            .build()
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn gaps(&self) -> GapCosts {
        self.gaps
    }

    pub fn co_optimal_limit(&self) -> usize {
        self.co_optimal_limit
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            matrix: SimilarityMatrix::diagonal(2, -2),
            gaps: GapCosts::default(),
            co_optimal_limit: 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlignerConfigBuilder {
    matrix: Option<SimilarityMatrix>,
    gap_open: Option<i32>,
    gap_extension: Option<i32>,
    co_optimal_limit: Option<usize>,
}

impl AlignerConfigBuilder {
    pub fn matrix(mut self, matrix: SimilarityMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    pub fn gap_open(mut self, cost: i32) -> Self {
        self.gap_open = Some(cost);
        self
    }

    pub fn gap_extension(mut self, cost: i32) -> Self {
        self.gap_extension = Some(cost);
        self
    }

    pub fn gaps(self, gaps: GapCosts) -> Self {
        self.gap_open(gaps.open).gap_extension(gaps.extension)
    }

    /// Maximum tracebacks per origin; 1 keeps only the deterministic path
    pub fn co_optimal_limit(mut self, limit: usize) -> Self {
        self.co_optimal_limit = Some(limit);
        self
    }

    /// Gap costs are checked per call, against the gap model actually used.
    pub fn build(self) -> DuplexResult<AlignerConfig> {
        let defaults = GapCosts::default();
        let co_optimal_limit = self.co_optimal_limit.unwrap_or(1);
        if co_optimal_limit == 0 {
            return Err(DuplexError::Configuration(
                "co-optimal limit must be at least 1".to_string(),
            ));
        }

        Ok(AlignerConfig {
            matrix: self
                .matrix
                .unwrap_or_else(|| SimilarityMatrix::diagonal(2, -2)),
            gaps: GapCosts::new(
                self.gap_open.unwrap_or(defaults.open),
                self.gap_extension.unwrap_or(defaults.extension),
            ),
            co_optimal_limit,
        })
    }
}
