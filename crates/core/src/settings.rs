//! Reconstruction settings.

use crate::error::{Result, TableError};
use crate::geometry::{DOWNWARD, RIGHTWARD, Vector, is_zero};

// Default constants
pub(crate) const DEFAULT_TOKEN_BAND_HEIGHT: i64 = 10;
pub(crate) const DEFAULT_CELL_BAND_HEIGHT: i64 = 20;

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSettings {
    /// Band height used to order tokens inside a cell.
    pub token_band_height: i64,
    /// Band height used for the coarse ordering of cells.
    pub cell_band_height: i64,
    /// Initial "same row" reference direction.
    pub row_direction: Vector,
    /// Initial "new row" reference direction.
    pub column_direction: Vector,
    /// Assign each token only to its smallest containing cell.
    pub exclusive_assignment: bool,
    /// Inserted between token strings when merging a cell.
    pub token_separator: String,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            token_band_height: DEFAULT_TOKEN_BAND_HEIGHT,
            cell_band_height: DEFAULT_CELL_BAND_HEIGHT,
            row_direction: RIGHTWARD,
            column_direction: DOWNWARD,
            exclusive_assignment: false,
            token_separator: String::new(),
        }
    }
}

impl LayoutSettings {
    /// Reject settings the passes cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.token_band_height <= 0 {
            return Err(TableError::InvalidSettings(format!(
                "token_band_height must be positive, got {}",
                self.token_band_height
            )));
        }
        if self.cell_band_height <= 0 {
            return Err(TableError::InvalidSettings(format!(
                "cell_band_height must be positive, got {}",
                self.cell_band_height
            )));
        }
        if is_zero(self.row_direction) || is_zero(self.column_direction) {
            return Err(TableError::InvalidSettings(
                "reference directions must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
