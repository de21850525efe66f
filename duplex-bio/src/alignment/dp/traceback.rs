/// Worklist traceback over the S, H and V planes
use super::fill::{DpGrid, DIAGONAL, H_EXTEND, H_OPEN, LEFT, UP, V_EXTEND, V_OPEN};
use super::{AlignedFragment, GapModel};
use crate::alphabet::GAP;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plane {
    Score,
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Diagonal,
    Left,
    Up,
    Open,
    Extend,
}

const SCORE_PRIORITY: [(u8, Step); 3] = [
    (UP, Step::Up),
    (LEFT, Step::Left),
    (DIAGONAL, Step::Diagonal),
];
const HORIZONTAL_PRIORITY: [(u8, Step); 2] = [(H_EXTEND, Step::Extend), (H_OPEN, Step::Open)];
const VERTICAL_PRIORITY: [(u8, Step); 2] = [(V_EXTEND, Step::Extend), (V_OPEN, Step::Open)];

/// Partial path: current cell and plane plus the columns emitted so far,
/// in reverse order.
#[derive(Debug, Clone)]
struct PathState {
    row: usize,
    col: usize,
    plane: Plane,
    first: Vec<u8>,
    second: Vec<u8>,
}

impl PathState {
    /// Candidate steps in priority order; the first one is the deterministic path.
    /// No candidates on the S plane marks a stop cell.
    fn steps(&self, grid: &DpGrid) -> ([Option<Step>; 3], usize) {
        let bits = grid.moves(self.row, self.col);
        let priority: &[(u8, Step)] = match self.plane {
            Plane::Score => &SCORE_PRIORITY,
            Plane::Horizontal => &HORIZONTAL_PRIORITY,
            Plane::Vertical => &VERTICAL_PRIORITY,
        };

        let mut steps = [None; 3];
        let mut count = 0;
        for &(bit, step) in priority {
            if bits & bit != 0 {
                steps[count] = Some(step);
                count += 1;
            }
        }
        (steps, count)
    }

    fn apply(&mut self, step: Step, model: GapModel, reference: &[u8], query: &[u8]) {
        match (self.plane, step) {
            (Plane::Score, Step::Diagonal) => {
                self.first.push(reference[self.col - 1]);
                self.second.push(query[self.row - 1]);
                self.row -= 1;
                self.col -= 1;
            }
            (Plane::Score, Step::Left) => match model {
                GapModel::Simple => self.consume_reference(reference),
                GapModel::Affine => self.plane = Plane::Horizontal,
            },
            (Plane::Score, Step::Up) => match model {
                GapModel::Simple => self.consume_query(query),
                GapModel::Affine => self.plane = Plane::Vertical,
            },
            (Plane::Horizontal, step) => {
                self.consume_reference(reference);
                if matches!(step, Step::Open) {
                    self.plane = Plane::Score;
                }
            }
            (Plane::Vertical, step) => {
                self.consume_query(query);
                if matches!(step, Step::Open) {
                    self.plane = Plane::Score;
                }
            }
            (Plane::Score, Step::Open | Step::Extend) => {}
        }
    }

    fn consume_reference(&mut self, reference: &[u8]) {
        self.first.push(reference[self.col - 1]);
        self.second.push(GAP);
        self.col -= 1;
    }

    fn consume_query(&mut self, query: &[u8]) {
        self.first.push(GAP);
        self.second.push(query[self.row - 1]);
        self.row -= 1;
    }
}

/// Trace back from `origin`, producing at most `limit` co-optimal paths.
/// The deterministic path always comes first.
pub(crate) fn trace(
    grid: &DpGrid,
    reference: &[u8],
    query: &[u8],
    model: GapModel,
    origin: (usize, usize),
    limit: usize,
) -> Vec<AlignedFragment> {
    let (origin_row, origin_col) = origin;
    let score = grid.score(origin_row, origin_col);
    let capacity = origin_row + origin_col;

    let mut worklist = vec![PathState {
        row: origin_row,
        col: origin_col,
        plane: Plane::Score,
        first: Vec::with_capacity(capacity),
        second: Vec::with_capacity(capacity),
    }];
    let mut fragments = Vec::new();

    while let Some(mut state) = worklist.pop() {
        loop {
            let (steps, count) = state.steps(grid);
            if count == 0 {
                break;
            }
            if limit > 1 {
                // Alternatives go on the stack lowest priority first
                for step in steps[1..count].iter().rev().flatten() {
                    let mut branch = state.clone();
                    branch.apply(*step, model, reference, query);
                    worklist.push(branch);
                }
            }
            if let Some(step) = steps[0] {
                state.apply(step, model, reference, query);
            }
        }

        state.first.reverse();
        state.second.reverse();
        fragments.push(AlignedFragment {
            first: state.first,
            second: state.second,
            score,
            reference_start: state.col,
            query_start: state.row,
            reference_end: origin_col,
            query_end: origin_row,
        });

        if fragments.len() >= limit {
            if !worklist.is_empty() {
                warn!(
                    "Co-optimal traceback from ({}, {}) truncated at {} paths",
                    origin_row, origin_col, limit
                );
            }
            break;
        }
    }

    fragments
}
