//! High-level table reconstruction API.
//!
//! Provides the main public entry points:
//! - `extract_rows()` - Associate tokens, merge cells, reconstruct rows
//! - `extract_csv()` - The above, serialized as CSV to a writer

use std::io::Write;

use tracing::debug;

use crate::association::associate;
use crate::cell::CellRegion;
use crate::error::Result;
use crate::export::write_delimited;
use crate::reconstruct::{Row, reconstruct_rows};
use crate::settings::LayoutSettings;
use crate::token::Token;

/// Reconstruct table rows from detected cells and recognized tokens.
///
/// # Arguments
/// * `cells` - Cell regions from the detector, with no tokens assigned yet
/// * `tokens` - Text fragments from the recognizer
/// * `settings` - Reconstruction settings
///
/// # Returns
/// Rows of cell values in reading order.
pub fn extract_rows(
    mut cells: Vec<CellRegion>,
    tokens: &[Token],
    settings: &LayoutSettings,
) -> Result<Vec<Row>> {
    settings.validate()?;
    let assigned = associate(&mut cells, tokens, settings);
    debug!(assigned, "tokens associated");
    reconstruct_rows(&mut cells, settings)
}

/// Reconstruct rows and write them as delimited text to `writer`.
///
/// Rows are fully built before anything is written, so a failure leaves
/// the writer untouched.
pub fn extract_csv<W: Write>(
    cells: Vec<CellRegion>,
    tokens: &[Token],
    settings: &LayoutSettings,
    writer: W,
    delimiter: u8,
) -> Result<usize> {
    let rows = extract_rows(cells, tokens, settings)?;
    write_delimited(&rows, writer, delimiter)?;
    Ok(rows.len())
}
