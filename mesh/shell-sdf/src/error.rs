//! Error types for signed-distance computation.

use thiserror::Error;

/// Result type for signed-distance operations.
pub type SdfResult<T> = Result<T, SdfError>;

/// Errors that can occur while building a signed-distance source.
#[derive(Debug, Error)]
pub enum SdfError {
    /// The source solid has no geometry.
    #[error("source solid has no geometry")]
    EmptySolid,

    /// The acceleration structure rejected the source buffers.
    #[error("acceleration structure build failed: {0}")]
    Spatial(#[from] shell_spatial::SpatialError),
}
