/// Gap penalties
use duplex_core::{DuplexError, DuplexResult};
use serde::{Deserialize, Serialize};

/// Gap opening and extension costs, both expressed as non-positive scores.
///
/// The simple model charges `open` for every gap column. The affine model
/// charges `open + (L - 1) * extension` for a run of `L` gap columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapCosts {
    pub open: i32,
    pub extension: i32,
}

impl GapCosts {
    pub fn new(open: i32, extension: i32) -> Self {
        Self { open, extension }
    }

    /// Linear costs: every gap column charged `open`
    pub fn simple(open: i32) -> Self {
        Self {
            open,
            extension: open,
        }
    }

    /// True when the affine recurrence degenerates to the simple one
    pub fn is_linear(&self) -> bool {
        self.open == self.extension
    }

    /// Rules shared by every model
    pub fn validate_simple(&self) -> DuplexResult<()> {
        if self.open >= 0 {
            return Err(DuplexError::InvalidGapCost(
                "gap open cost must be less than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_affine(&self) -> DuplexResult<()> {
        self.validate_simple()?;
        if self.extension > 0 {
            return Err(DuplexError::InvalidGapCost(
                "gap extension cost must be less than or equal to 0".to_string(),
            ));
        }
        if self.open > self.extension {
            return Err(DuplexError::InvalidGapCost(
                "gap open cost must not be greater than gap extension cost".to_string(),
            ));
        }
        Ok(())
    }

    /// Cost of a run of `length` gap columns under the affine model
    pub fn affine_run(&self, length: usize) -> i64 {
        if length == 0 {
            return 0;
        }
        self.open as i64 + (length as i64 - 1) * self.extension as i64
    }

    /// Cost of a run of `length` gap columns under the simple model
    pub fn simple_run(&self, length: usize) -> i64 {
        self.open as i64 * length as i64
    }
}

impl Default for GapCosts {
    fn default() -> Self {
        Self::new(-8, -1)
    }
}
