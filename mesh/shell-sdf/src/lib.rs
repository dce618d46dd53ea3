//! Signed-distance sampling of labeled solids.
//!
//! This crate provides the two sampling-side components of the offset
//! pipeline:
//!
//! - [`SourceSurface`] - an immutable snapshot of a solid's buffers with
//!   a triangle BVH and a cached face-normal table, resolving triangle
//!   indices back to face names
//! - [`SignedDistance`] - the signed-distance oracle over a snapshot,
//!   **positive inside**, sign classified by parity ray casting
//!
//! # Layer 0 Crate
//!
//! Engine-free; `f64` throughout.
//!
//! # Determinism
//!
//! Queries are pure functions of the snapshot and a fixed parity-ray
//! direction; nothing is cached between queries, so an operation that
//! samples the same points twice gets identical answers.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Safety: deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod oracle;
mod surface;

pub use error::{SdfError, SdfResult};
pub use oracle::SignedDistance;
pub use surface::SourceSurface;
