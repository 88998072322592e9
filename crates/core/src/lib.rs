//! celltab - Table layout reconstruction from cell regions and OCR tokens.
//!
//! Inputs are two unordered sets in pixel space: rectangular cell regions
//! from a detector and text fragments from a recognizer. Tokens are
//! associated with the cells containing their centroids, merged into one
//! value per cell, and the cells are grouped into rows by an adaptive
//! directional classifier over their centroids.

pub mod association;
pub mod cell;
pub mod error;
pub mod export;
pub mod geometry;
pub mod high_level;
pub mod reconstruct;
pub mod settings;
pub mod token;

pub use cell::CellRegion;
pub use error::{Result, TableError};
pub use geometry::{Point, Polygon, Vector};
pub use high_level::{extract_csv, extract_rows};
pub use reconstruct::{Reconstructor, Row, Step};
pub use settings::LayoutSettings;
pub use token::Token;
