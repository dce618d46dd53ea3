//! Isosurface extraction for the offset-shell kernel.
//!
//! Samples a scalar field over an axis-aligned box and extracts a level
//! set as an indexed triangle mesh:
//!
//! - [`ScalarGrid`] - dense corner lattice of field samples
//! - [`LevelSetMesh`] - the raw, label-free extraction result
//! - [`extract_level_set`] - scalar surface-nets extraction
//!
//! # Layer 0 Crate
//!
//! Engine-free; `f64` throughout.
//!
//! # Orientation
//!
//! Triangles are wound so normals point toward the negative side of
//! `field - isovalue`. Offset generation feeds a positive-inside signed
//! distance field, so extracted normals face outward.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Safety: deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod extract;
mod grid;

pub use error::{LevelSetError, LevelSetResult};
pub use extract::{extract_level_set, LevelSetMesh};
pub use grid::ScalarGrid;
