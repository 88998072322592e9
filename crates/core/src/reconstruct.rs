//! Row reconstruction from cell centroids.
//!
//! Cells are first sorted into a coarse reading order by a banded
//! `(y, x)` key. The sequence is then walked pairwise: each displacement
//! between consecutive centroids is compared by cosine similarity against
//! two reference directions, one for "same row" and one for "new row".
//! Whichever reference wins is replaced by the displacement, so the
//! classifier follows rows and line breaks that are not perfectly
//! axis-aligned.
//!
//! Ties go to "new row": continuation requires strictly greater
//! similarity to the row direction. A zero displacement (two cells sharing
//! a centroid) carries no direction and continues the current row without
//! touching either reference.

use tracing::{debug, trace, warn};

use crate::cell::CellRegion;
use crate::error::{Result, TableError};
use crate::geometry::{Vector, cosine_similarity};
use crate::settings::LayoutSettings;

/// One reconstructed table row: cell values in reading order.
pub type Row = Vec<String>;

/// Outcome of classifying one displacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    SameRow,
    NewRow,
}

/// Classifier state for a single reconstruction.
#[derive(Clone, Debug)]
pub struct Reconstructor {
    row_direction: Vector,
    column_direction: Vector,
}

impl Reconstructor {
    pub fn new(row_direction: Vector, column_direction: Vector) -> Self {
        Self {
            row_direction,
            column_direction,
        }
    }

    pub fn from_settings(settings: &LayoutSettings) -> Self {
        Self::new(settings.row_direction, settings.column_direction)
    }

    pub fn row_direction(&self) -> Vector {
        self.row_direction
    }

    pub fn column_direction(&self) -> Vector {
        self.column_direction
    }

    /// Classify the displacement `v` between cells `from` and `to` and
    /// update the winning reference direction.
    ///
    /// Fails with `DegenerateVector` when `v` is zero; state is unchanged.
    pub fn classify(&mut self, v: Vector, from: usize, to: usize) -> Result<Step> {
        let (Some(to_row), Some(to_column)) = (
            cosine_similarity(v, self.row_direction),
            cosine_similarity(v, self.column_direction),
        ) else {
            return Err(TableError::DegenerateVector {
                from,
                to,
                x: v.0,
                y: v.1,
            });
        };

        if to_row > to_column {
            self.row_direction = v;
            Ok(Step::SameRow)
        } else {
            self.column_direction = v;
            Ok(Step::NewRow)
        }
    }

    /// Walk `cells` in the given order and group their values into rows.
    ///
    /// Every cell must already be merged.
    pub fn run(&mut self, cells: &[CellRegion]) -> Result<Vec<Row>> {
        let mut rows: Vec<Row> = Vec::new();
        let Some(first) = cells.first() else {
            return Ok(rows);
        };

        let mut row: Row = vec![first.value()?.to_string()];
        for (i, pair) in cells.windows(2).enumerate() {
            let (prev, cell) = (&pair[0], &pair[1]);
            let value = cell.value()?.to_string();
            let v = prev.vector_to(cell);
            let step = match self.classify(v, i, i + 1) {
                Ok(step) => step,
                Err(err @ TableError::DegenerateVector { .. }) => {
                    warn!(%err, "no direction between cells; continuing row");
                    Step::SameRow
                }
                Err(err) => return Err(err),
            };
            trace!(
                index = i + 1,
                dx = v.0,
                dy = v.1,
                ?step,
                row_direction = ?self.row_direction,
                column_direction = ?self.column_direction,
                "classified cell"
            );
            match step {
                Step::SameRow => row.push(value),
                Step::NewRow => rows.push(std::mem::replace(&mut row, vec![value])),
            }
        }
        rows.push(row);
        Ok(rows)
    }
}

/// Sort cells into coarse reading order by `(y div band, x)`.
pub fn coarse_order(cells: &mut [CellRegion], band: i64) {
    cells.sort_by_key(|cell| cell.ordering_key_with_band(band));
}

/// Order merged cells and reconstruct their rows.
pub fn reconstruct_rows(cells: &mut [CellRegion], settings: &LayoutSettings) -> Result<Vec<Row>> {
    coarse_order(cells, settings.cell_band_height);
    let rows = Reconstructor::from_settings(settings).run(cells)?;
    debug!(cells = cells.len(), rows = rows.len(), "rows reconstructed");
    Ok(rows)
}
