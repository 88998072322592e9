//! Detected table cell regions.
//!
//! A `CellRegion` accumulates the tokens whose centroids fall inside it and
//! merges them once into a single reading-order string.

use crate::error::{Result, TableError};
use crate::geometry::{Point, Polygon, Vector, displacement};
use crate::settings::{DEFAULT_CELL_BAND_HEIGHT, DEFAULT_TOKEN_BAND_HEIGHT};
use crate::token::{OrderingKey, Token};

#[derive(Clone, Debug)]
pub struct CellRegion {
    centroid: Point,
    polygon: Polygon,
    tokens: Vec<Token>,
    /// `None` until merged.
    value: Option<String>,
}

impl CellRegion {
    pub fn new(centroid: Point, polygon: Polygon) -> Self {
        Self {
            centroid,
            polygon,
            tokens: Vec::new(),
            value: None,
        }
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_merged(&self) -> bool {
        self.value.is_some()
    }

    /// Append a token. Order is settled at merge time.
    pub fn assign_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Merge assigned tokens with the default band and no separator.
    pub fn merge(&mut self) {
        self.merge_with(DEFAULT_TOKEN_BAND_HEIGHT, "");
    }

    /// Sort tokens by `(round(y / band), x)` and join their text.
    ///
    /// No-op once merged.
    pub fn merge_with(&mut self, band: i64, separator: &str) {
        if self.value.is_some() {
            return;
        }
        self.tokens
            .sort_by_key(|token| token.ordering_key_with_band(band));
        let value = self
            .tokens
            .iter()
            .map(Token::text)
            .collect::<Vec<_>>()
            .join(separator);
        self.value = Some(value);
    }

    /// The merged text. Fails with `InvalidState` before `merge`.
    pub fn value(&self) -> Result<&str> {
        self.value.as_deref().ok_or(TableError::InvalidState)
    }

    /// Displacement from this cell's centroid to `other`'s.
    pub fn vector_to(&self, other: &CellRegion) -> Vector {
        displacement(self.centroid, other.centroid)
    }

    /// Coarse reading-order key with the default 20px band.
    pub fn ordering_key(&self) -> OrderingKey {
        self.ordering_key_with_band(DEFAULT_CELL_BAND_HEIGHT)
    }

    /// Coarse reading-order key `(y div band, x)` using floor division.
    pub fn ordering_key_with_band(&self, band: i64) -> OrderingKey {
        (self.centroid.1.div_euclid(band.max(1)), self.centroid.0)
    }
}
