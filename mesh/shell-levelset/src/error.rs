//! Error types for level-set extraction.

use thiserror::Error;

/// Result type for level-set operations.
pub type LevelSetResult<T> = Result<T, LevelSetError>;

/// Errors that can occur during isosurface extraction.
#[derive(Debug, Error)]
pub enum LevelSetError {
    /// Sampling edge length must be positive and finite.
    #[error("invalid sampling edge length: {0}")]
    InvalidEdgeLength(f64),

    /// Sampling bounds have a non-finite corner.
    #[error("sampling bounds are degenerate")]
    DegenerateBounds,
}
