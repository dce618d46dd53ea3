//! Spatial acceleration for the offset-shell kernel.
//!
//! Provides the per-operation triangle BVH used by the signed-distance
//! oracle and the face-identity reconstructor:
//!
//! - [`TriangleBvh`] - binary BVH over a raw position/index buffer pair
//! - [`NearestHit`] - result of an exact nearest-point query
//! - [`Ray`] - origin/direction ray for parity counting
//! - [`closest_point_on_triangle`] / [`ray_triangle_intersect`] - the
//!   exact primitives the tree runs at its leaves
//!
//! # Layer 0 Crate
//!
//! Engine-free; `f64` throughout.
//!
//! # Lifetime discipline
//!
//! A [`TriangleBvh`] is scratch state: built once at the start of a
//! modeling operation from immutable buffers, queried, and dropped when
//! the operation returns. Queries never mutate the tree, so results are
//! deterministic for a fixed build.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Safety: deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bvh;
mod error;
mod ray;
mod triangle;

pub use bvh::{NearestHit, TriangleBvh};
pub use error::{SpatialError, SpatialResult};
pub use ray::Ray;
pub use triangle::{closest_point_on_triangle, ray_triangle_intersect};
