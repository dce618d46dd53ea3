//! Error types for solid container operations.

use thiserror::Error;

/// Result type for solid container operations.
pub type SolidResult<T> = Result<T, SolidError>;

/// Errors that can occur while operating on a [`crate::Solid`].
#[derive(Debug, Error)]
pub enum SolidError {
    /// A triangle references a vertex index outside the position buffer.
    #[error("triangle {triangle} references vertex {index} outside the position buffer")]
    CorruptIndexBuffer {
        /// Index of the offending triangle.
        triangle: usize,
        /// The out-of-range vertex index.
        index: u32,
    },
}
