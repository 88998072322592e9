//! Recognized text fragments.

use crate::error::Result;
use crate::geometry::{Point, Polygon, round_pixel};
use crate::settings::DEFAULT_TOKEN_BAND_HEIGHT;

/// Sort key for reading order: (band index, x).
pub type OrderingKey = (i64, i64);

/// A text fragment produced by the recognizer, bounded by a quadrilateral.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    top_left: Point,
    top_right: Point,
    bottom_right: Point,
    bottom_left: Point,
    centroid: Point,
    text: String,
    confidence: f64,
}

impl Token {
    /// Create a token from its four corners in clockwise order starting
    /// at the top-left.
    pub fn new(corners: [Point; 4], text: impl Into<String>, confidence: f64) -> Self {
        let [top_left, top_right, bottom_right, bottom_left] = corners;
        let centroid = (
            midpoint(top_left.0, bottom_right.0),
            midpoint(top_left.1, bottom_right.1),
        );
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
            centroid,
            text: text.into(),
            confidence,
        }
    }

    /// Create a token from sub-pixel corners, rounding each to the nearest pixel.
    pub fn from_float_corners(
        corners: [(f64, f64); 4],
        text: impl Into<String>,
        confidence: f64,
    ) -> Result<Self> {
        let mut rounded = [(0i64, 0i64); 4];
        for (dst, (x, y)) in rounded.iter_mut().zip(corners) {
            *dst = (round_pixel(x)?, round_pixel(y)?);
        }
        Ok(Self::new(rounded, text, confidence))
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Recognizer confidence in [0, 1]. Informational only.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Whether the centroid lies inside or on the boundary of `polygon`.
    pub fn contained_in(&self, polygon: &Polygon) -> bool {
        polygon.contains(self.centroid)
    }

    /// Reading-order key with the default 10px band.
    pub fn ordering_key(&self) -> OrderingKey {
        self.ordering_key_with_band(DEFAULT_TOKEN_BAND_HEIGHT)
    }

    /// Reading-order key `(round(y / band), x)`.
    ///
    /// Banding absorbs baseline jitter so fragments on the same visual line
    /// sort left to right. Rounding is half-to-even.
    pub fn ordering_key_with_band(&self, band: i64) -> OrderingKey {
        let band = band.max(1);
        let row = (self.centroid.1 as f64 / band as f64).round_ties_even() as i64;
        (row, self.centroid.0)
    }
}

/// Floor of the mean of `a` and `b`, exact for any pair of i64s.
fn midpoint(a: i64, b: i64) -> i64 {
    (i128::from(a) + i128::from(b)).div_euclid(2) as i64
}
