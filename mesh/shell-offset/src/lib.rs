//! Offset-shell generation with face-identity preservation.
//!
//! Offsets a labeled solid by a signed distance using implicit-surface
//! sampling: a signed-distance oracle over the source triangulation is
//! extracted at the offset level, and every triangle of the remeshed
//! result votes its way back to the source face names it approximates.
//! Creases between original faces become fused `a+b` labels instead of
//! being arbitrarily assigned to one side, so downstream consumers that
//! key behavior off face names keep working on offset geometry.
//!
//! # Pipeline
//!
//! 1. Snapshot the source buffers and build the triangle BVH
//! 2. Resolve the sampling policy (edge length, expanded/shrunk bounds)
//! 3. Extract the level set of the positive-inside distance oracle at
//!    the negated offset distance
//! 4. Reconstruct per-triangle face identity by sampled voting
//! 5. Assemble the labeled result, carry over face metadata and aux
//!    edges, and run a best-effort small-island cleanup
//!
//! The whole pipeline is synchronous and single-threaded; one call
//! computes one offset end-to-end and releases all scratch state before
//! returning.
//!
//! # Example
//!
//! ```
//! use shell_offset::{generate, OffsetOptions};
//! use shell_types::primitives::cylinder;
//!
//! let body = cylinder("body", 1.0, 4.0, 16);
//! let shrunk = generate(&body, -0.5, &OffsetOptions::default()).unwrap();
//! assert!(shrunk.triangle_count() > 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Safety: deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod generate;
mod reconstruct;

pub use error::{OffsetError, OffsetResult};
pub use generate::{generate, generate_with_stats, OffsetOptions, OffsetStats};
pub use reconstruct::FALLBACK_LABEL;
