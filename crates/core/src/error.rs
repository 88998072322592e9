//! Error types for celltab table reconstruction.

use thiserror::Error;

/// Primary error type for table reconstruction operations.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("cell value read before merge; call merge() first")]
    InvalidState,

    #[error("cells {from} and {to} share the centroid ({x}, {y})")]
    DegenerateVector {
        from: usize,
        to: usize,
        x: i64,
        y: i64,
    },

    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience Result type alias for TableError.
pub type Result<T> = std::result::Result<T, TableError>;
