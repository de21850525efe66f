//! Dynamic-programming alignment core
//!
//! One engine, parameterised by [`DpMode`] and [`GapModel`], fills the score
//! plane and a per-cell bitset of every optimal move, then traces back from
//! the mode's origin cells. Rows run over the query (second sequence) and
//! columns over the reference (first sequence).

mod fill;
mod traceback;

use crate::alignment::gap::GapCosts;
use crate::matrix::SimilarityMatrix;
use duplex_core::{DuplexError, DuplexResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

/// Largest matrix, in cells, the engine will allocate
pub const MAX_CELLS: u64 = i32::MAX as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DpMode {
    /// Both sequences consumed end to end; end gaps are charged
    Global,
    /// Best-scoring local region, scores floored at zero
    Local,
    /// Free leading gaps; origin on the last row or column
    Overlap,
    /// Anchored at the start, free end: the best-scoring prefix pair
    Extension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GapModel {
    Simple,
    Affine,
}

impl fmt::Display for DpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DpMode::Global => "global",
            DpMode::Local => "local",
            DpMode::Overlap => "overlap",
            DpMode::Extension => "extension",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for GapModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapModel::Simple => write!(f, "simple"),
            GapModel::Affine => write!(f, "affine"),
        }
    }
}

/// One traceback path.
///
/// `reference_end` / `query_end` are exclusive: the fragment covers
/// `reference[reference_start..reference_end]` and
/// `query[query_start..query_end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedFragment {
    pub first: Vec<u8>,
    pub second: Vec<u8>,
    pub score: i32,
    pub reference_start: usize,
    pub query_start: usize,
    pub reference_end: usize,
    pub query_end: usize,
}

impl AlignedFragment {
    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }
}

/// Fail with `SequenceTooLarge` when the DP matrix would exceed [`MAX_CELLS`]
pub fn check_size(reference_len: usize, query_len: usize) -> DuplexResult<()> {
    let cells = (reference_len as u64 + 1).saturating_mul(query_len as u64 + 1);
    if cells > MAX_CELLS {
        return Err(DuplexError::SequenceTooLarge(format!(
            "aligning {} x {} symbols needs {} matrix cells, the limit is {}",
            reference_len, query_len, cells, MAX_CELLS
        )));
    }
    Ok(())
}

/// Align `query` against `reference`.
///
/// Symbols are looked up without validation; callers check matrix coverage
/// first. At most `co_optimal_limit` paths are produced per origin.
pub fn align(
    reference: &[u8],
    query: &[u8],
    matrix: &SimilarityMatrix,
    gaps: GapCosts,
    mode: DpMode,
    model: GapModel,
    co_optimal_limit: usize,
) -> DuplexResult<Vec<AlignedFragment>> {
    check_size(reference.len(), query.len())?;

    debug!(
        "DP {} / {} over {} x {} cells",
        mode,
        model,
        query.len() + 1,
        reference.len() + 1
    );

    let grid = fill::fill(reference, query, matrix, gaps, mode, model);
    let origins = grid.origins(mode);
    let limit = co_optimal_limit.max(1);

    let mut fragments = Vec::new();
    for origin in origins {
        for fragment in traceback::trace(&grid, reference, query, model, origin, limit) {
            trace!(
                "Fragment score {} reference {}..{} query {}..{}",
                fragment.score,
                fragment.reference_start,
                fragment.reference_end,
                fragment.query_start,
                fragment.query_end
            );
            fragments.push(fragment);
        }
    }

    Ok(fragments)
}
