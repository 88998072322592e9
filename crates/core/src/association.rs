//! Token to cell association.
//!
//! Every token whose centroid lies inside (or on the boundary of) a cell
//! polygon is assigned to that cell, then every cell is merged once.
//!
//! Two modes:
//! - shared (default): a token goes to every containing cell, so
//!   overlapping polygons may both receive it
//! - exclusive: a token goes only to the containing cell with the
//!   smallest area, ties resolved by input order

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::cell::CellRegion;
use crate::settings::LayoutSettings;
use crate::token::Token;

/// Assign tokens to cells and merge every cell.
///
/// Returns the number of (cell, token) assignments made.
pub fn associate(
    cells: &mut [CellRegion],
    tokens: &[Token],
    settings: &LayoutSettings,
) -> usize {
    let assigned = if settings.exclusive_assignment {
        assign_exclusive(cells, tokens)
    } else {
        assign_shared(cells, tokens)
    };

    for cell in cells.iter_mut() {
        cell.merge_with(settings.token_band_height, &settings.token_separator);
    }

    debug!(
        cells = cells.len(),
        tokens = tokens.len(),
        assigned,
        exclusive = settings.exclusive_assignment,
        "association pass complete"
    );
    assigned
}

/// Each cell scans the token list and appends to its own accumulator.
fn assign_shared(cells: &mut [CellRegion], tokens: &[Token]) -> usize {
    let hits: Vec<Vec<usize>> = cells
        .par_iter_mut()
        .map(|cell| {
            let hits: Vec<usize> = tokens
                .iter()
                .enumerate()
                .filter(|(_, token)| token.contained_in(cell.polygon()))
                .map(|(idx, _)| idx)
                .collect();
            for &idx in &hits {
                cell.assign_token(tokens[idx].clone());
            }
            hits
        })
        .collect();

    let mut covered = vec![false; tokens.len()];
    let mut assigned = 0usize;
    for idx in hits.iter().flatten() {
        covered[*idx] = true;
        assigned += 1;
    }
    let orphans = covered.iter().filter(|hit| !**hit).count();
    if orphans > 0 {
        warn!(orphans, "tokens outside every cell were dropped");
    }
    assigned
}

/// Pick each token's smallest containing cell in parallel, then append.
fn assign_exclusive(cells: &mut [CellRegion], tokens: &[Token]) -> usize {
    let shared: &[CellRegion] = cells;
    let areas: Vec<f64> = shared.iter().map(|cell| cell.polygon().area()).collect();
    let owners: Vec<Option<usize>> = tokens
        .par_iter()
        .map(|token| smallest_containing(shared, &areas, token))
        .collect();

    let mut assigned = 0usize;
    let mut orphans = 0usize;
    for (token, owner) in tokens.iter().zip(owners) {
        match owner {
            Some(idx) => {
                cells[idx].assign_token(token.clone());
                assigned += 1;
            }
            None => orphans += 1,
        }
    }
    if orphans > 0 {
        warn!(orphans, "tokens outside every cell were dropped");
    }
    assigned
}

fn smallest_containing(cells: &[CellRegion], areas: &[f64], token: &Token) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, cell) in cells.iter().enumerate() {
        if !token.contained_in(cell.polygon()) {
            continue;
        }
        match best {
            Some(b) if areas[b] <= areas[idx] => {}
            _ => best = Some(idx),
        }
    }
    best
}
