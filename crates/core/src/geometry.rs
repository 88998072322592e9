//! Pixel-space geometry for table reconstruction.
//!
//! Provides:
//! - Integer point and vector types
//! - `Polygon`, a validated closed boundary with a boundary-inclusive
//!   containment test and enclosed area
//! - Cosine similarity between displacement vectors

use geo::{Area, Coord, Intersects, LineString};

use crate::error::{Result, TableError};

/// A 2D integer pixel coordinate (x, y). y grows downward.
pub type Point = (i64, i64);

/// An integer displacement between two points (dx, dy).
pub type Vector = (i64, i64);

/// Canonical "rightward" direction (positive x-axis).
pub const RIGHTWARD: Vector = (1, 0);

/// Canonical "downward" direction (positive y-axis).
pub const DOWNWARD: Vector = (0, 1);

/// Minimum number of vertices for a closed polygon.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Largest accepted pixel coordinate magnitude.
pub const MAX_PIXEL_COORD: i64 = 1 << 31;

/// Displacement from `from` to `to`.
#[inline]
pub fn displacement(from: Point, to: Point) -> Vector {
    (to.0.saturating_sub(from.0), to.1.saturating_sub(from.1))
}

#[inline]
pub fn is_zero(v: Vector) -> bool {
    v == (0, 0)
}

#[inline]
fn dot(a: Vector, b: Vector) -> f64 {
    (a.0 as f64) * (b.0 as f64) + (a.1 as f64) * (b.1 as f64)
}

#[inline]
fn norm(v: Vector) -> f64 {
    (v.0 as f64).hypot(v.1 as f64)
}

/// Cosine of the angle between `a` and `b`.
///
/// Returns `None` when either vector has zero length, since the angle is
/// undefined there. Callers decide what a missing direction means.
pub fn cosine_similarity(a: Vector, b: Vector) -> Option<f64> {
    if is_zero(a) || is_zero(b) {
        return None;
    }
    Some(dot(a, b) / (norm(a) * norm(b)))
}

/// Check that both coordinates of `p` are within `MAX_PIXEL_COORD`.
pub fn check_point(p: Point) -> Result<Point> {
    if p.0.abs() > MAX_PIXEL_COORD || p.1.abs() > MAX_PIXEL_COORD {
        return Err(TableError::MalformedGeometry(format!(
            "coordinate ({}, {}) outside +/-{MAX_PIXEL_COORD}",
            p.0, p.1
        )));
    }
    Ok(p)
}

/// Round a float coordinate to the nearest pixel, ties to even.
pub fn round_pixel(v: f64) -> Result<i64> {
    if !v.is_finite() {
        return Err(TableError::MalformedGeometry(format!(
            "non-finite coordinate {v}"
        )));
    }
    let rounded = v.round_ties_even();
    if rounded.abs() > MAX_PIXEL_COORD as f64 {
        return Err(TableError::MalformedGeometry(format!(
            "coordinate {v} outside +/-{MAX_PIXEL_COORD}"
        )));
    }
    Ok(rounded as i64)
}

fn to_coord(p: Point) -> Coord<f64> {
    Coord {
        x: p.0 as f64,
        y: p.1 as f64,
    }
}

/// A closed polygon given as an ordered list of boundary vertices.
///
/// The closing edge from the last vertex back to the first is implicit.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
    shape: geo::Polygon<f64>,
}

impl Polygon {
    /// Create a polygon, failing if it has fewer than three vertices or a
    /// vertex outside the pixel range.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() < MIN_POLYGON_POINTS {
            return Err(TableError::MalformedGeometry(format!(
                "polygon needs at least {MIN_POLYGON_POINTS} points, got {}",
                points.len()
            )));
        }
        for p in &points {
            check_point(*p)?;
        }
        Ok(Self::from_points(points))
    }

    /// Axis-aligned rectangle from its top-left and bottom-right corners.
    pub fn rect(x0: i64, top: i64, x1: i64, bottom: i64) -> Self {
        Self::from_points(vec![(x0, top), (x1, top), (x1, bottom), (x0, bottom)])
    }

    fn from_points(points: Vec<Point>) -> Self {
        let ring: Vec<Coord<f64>> = points.iter().copied().map(to_coord).collect();
        let shape = geo::Polygon::new(LineString::from(ring), vec![]);
        Self { points, shape }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Unsigned enclosed area in square pixels.
    pub fn area(&self) -> f64 {
        self.shape.unsigned_area()
    }

    /// Whether `p` lies inside the polygon or on its boundary.
    pub fn contains(&self, p: Point) -> bool {
        self.shape.intersects(&to_coord(p))
    }
}
