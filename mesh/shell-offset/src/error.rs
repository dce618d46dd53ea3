//! Error types for offset generation.

use thiserror::Error;

/// Result type for offset operations.
pub type OffsetResult<T> = Result<T, OffsetError>;

/// Errors that can occur during offset-shell generation.
///
/// Only [`OffsetError::NotManifoldizable`] is a configuration error raised
/// before any work happens; degenerate inputs (zero or non-finite
/// distance, empty source) are valid no-ops and never reach this enum.
#[derive(Debug, Error)]
pub enum OffsetError {
    /// The source solid cannot be handed to manifold-only operations.
    #[error("source solid is not manifoldizable")]
    NotManifoldizable,

    /// Signed-distance sampling setup failed.
    #[error("signed-distance sampling failed: {0}")]
    Sdf(#[from] shell_sdf::SdfError),

    /// Level-set extraction failed.
    #[error("level-set extraction failed: {0}")]
    LevelSet(#[from] shell_levelset::LevelSetError),

    /// The extracted level set is empty: the offset swallowed the solid.
    #[error("offset produced no surface; an inward offset may have consumed the solid")]
    EmptyResult,
}
