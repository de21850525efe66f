/// Score and traceback-pointer fill for all modes and gap models
use super::{DpMode, GapModel};
use crate::alignment::gap::GapCosts;
use crate::matrix::SimilarityMatrix;

/// Stand-in for minus infinity; leaves headroom for further additions
pub(crate) const NEG: i32 = i32::MIN / 2;

// Per-cell move bits. A cell with no S-plane bit is a stop cell.
pub(crate) const DIAGONAL: u8 = 1 << 0;
pub(crate) const LEFT: u8 = 1 << 1;
pub(crate) const UP: u8 = 1 << 2;
pub(crate) const H_OPEN: u8 = 1 << 3;
pub(crate) const H_EXTEND: u8 = 1 << 4;
pub(crate) const V_OPEN: u8 = 1 << 5;
pub(crate) const V_EXTEND: u8 = 1 << 6;

/// Filled DP matrices. Rows run over the query, columns over the reference.
pub(crate) struct DpGrid {
    rows: usize,
    cols: usize,
    scores: Vec<i32>,
    moves: Vec<u8>,
}

impl DpGrid {
    #[inline]
    pub(crate) fn score(&self, row: usize, col: usize) -> i32 {
        self.scores[row * self.cols + col]
    }

    #[inline]
    pub(crate) fn moves(&self, row: usize, col: usize) -> u8 {
        self.moves[row * self.cols + col]
    }

    /// Traceback start cells for `mode`, in row-major order
    pub(crate) fn origins(&self, mode: DpMode) -> Vec<(usize, usize)> {
        let last_row = self.rows - 1;
        let last_col = self.cols - 1;

        match mode {
            DpMode::Global => vec![(last_row, last_col)],
            DpMode::Local => {
                let best = self.scores.iter().copied().max().unwrap_or(0);
                if best <= 0 {
                    return Vec::new();
                }
                self.scores
                    .iter()
                    .enumerate()
                    .filter(|(_, &s)| s == best)
                    .map(|(idx, _)| (idx / self.cols, idx % self.cols))
                    .collect()
            }
            DpMode::Overlap => {
                let mut best = i32::MIN;
                let mut origins = Vec::new();
                for row in 1..self.rows {
                    for col in 1..self.cols {
                        if row != last_row && col != last_col {
                            continue;
                        }
                        let score = self.score(row, col);
                        if score > best {
                            best = score;
                            origins.clear();
                            origins.push((row, col));
                        } else if score == best {
                            origins.push((row, col));
                        }
                    }
                }
                if best <= 0 {
                    return Vec::new();
                }
                origins
            }
            DpMode::Extension => {
                let mut best = 0;
                let mut origin = (0, 0);
                for (idx, &score) in self.scores.iter().enumerate() {
                    if score > best {
                        best = score;
                        origin = (idx / self.cols, idx % self.cols);
                    }
                }
                vec![origin]
            }
        }
    }
}

/// Cumulative cost of a leading gap of `length` columns, floored at NEG
fn boundary_cost(gaps: GapCosts, model: GapModel, length: usize) -> i32 {
    let cost = match model {
        GapModel::Simple => gaps.simple_run(length),
        GapModel::Affine => gaps.affine_run(length),
    };
    cost.max(NEG as i64) as i32
}

#[inline]
fn tie_bits(open: i32, extend: i32, open_bit: u8, extend_bit: u8) -> (i32, u8) {
    if open > extend {
        (open, open_bit)
    } else if extend > open {
        (extend, extend_bit)
    } else {
        (open, open_bit | extend_bit)
    }
}

pub(crate) fn fill(
    reference: &[u8],
    query: &[u8],
    matrix: &SimilarityMatrix,
    gaps: GapCosts,
    mode: DpMode,
    model: GapModel,
) -> DpGrid {
    let rows = query.len() + 1;
    let cols = reference.len() + 1;
    let mut scores = vec![0i32; rows * cols];
    let mut moves = vec![0u8; rows * cols];

    if matches!(mode, DpMode::Global | DpMode::Extension) {
        for col in 1..cols {
            scores[col] = boundary_cost(gaps, model, col);
            moves[col] = match model {
                GapModel::Simple => LEFT,
                GapModel::Affine if col == 1 => LEFT | H_OPEN,
                GapModel::Affine => LEFT | H_EXTEND,
            };
        }
        for row in 1..rows {
            scores[row * cols] = boundary_cost(gaps, model, row);
            moves[row * cols] = match model {
                GapModel::Simple => UP,
                GapModel::Affine if row == 1 => UP | V_OPEN,
                GapModel::Affine => UP | V_EXTEND,
            };
        }
    }

    let open = gaps.open;
    let extend = gaps.extension;
    // V plane for the previous row, one entry per column
    let mut vertical = vec![NEG; cols];

    for row in 1..rows {
        let q = query[row - 1];
        let mut horizontal = NEG;
        let above = (row - 1) * cols;
        let here = row * cols;

        for col in 1..cols {
            let diagonal = scores[above + col - 1].saturating_add(matrix.pair_score(reference[col - 1], q));

            let (left, up, gap_bits) = match model {
                GapModel::Simple => (
                    scores[here + col - 1].saturating_add(open),
                    scores[above + col].saturating_add(open),
                    0,
                ),
                GapModel::Affine => {
                    let (h, h_bits) = tie_bits(
                        scores[here + col - 1].saturating_add(open),
                        horizontal.saturating_add(extend),
                        H_OPEN,
                        H_EXTEND,
                    );
                    let (v, v_bits) = tie_bits(
                        scores[above + col].saturating_add(open),
                        vertical[col].saturating_add(extend),
                        V_OPEN,
                        V_EXTEND,
                    );
                    horizontal = h;
                    vertical[col] = v;
                    (h, v, h_bits | v_bits)
                }
            };

            let mut best = diagonal.max(left).max(up);
            let mut bits = 0u8;
            if diagonal == best {
                bits |= DIAGONAL;
            }
            if left == best {
                bits |= LEFT;
            }
            if up == best {
                bits |= UP;
            }
            if mode == DpMode::Local && best <= 0 {
                best = 0;
                bits = 0;
            }

            scores[here + col] = best;
            moves[here + col] = bits | gap_bits;
        }
    }

    DpGrid {
        rows,
        cols,
        scores,
        moves,
    }
}
