//! Error types for spatial queries.

use thiserror::Error;

/// Result type for spatial structure construction.
pub type SpatialResult<T> = Result<T, SpatialError>;

/// Errors that can occur while building a spatial structure.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// A triangle references a vertex index outside the position buffer.
    #[error("triangle {triangle} references vertex {index} outside the position buffer")]
    IndexOutOfBounds {
        /// Index of the offending triangle.
        triangle: usize,
        /// The out-of-range vertex index.
        index: u32,
    },
}
