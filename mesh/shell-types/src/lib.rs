//! Core types for the offset-shell modeling kernel.
//!
//! This crate provides the labeled solid container and the geometry
//! types shared by the rest of the workspace:
//!
//! - [`Solid`] - a triangulated solid whose triangles belong to named faces
//! - [`FaceId`] - opaque per-solid face identifier
//! - [`SurfaceInfo`] - analytic face metadata (planar/cylindrical/...)
//! - [`AuxEdge`] - auxiliary reference polylines carried across operations
//! - [`Aabb`] - axis-aligned bounding box
//! - [`FaceAdjacency`] - edge adjacency, manifold checks, connected components
//! - [`primitives`] - named-face cylinder and cuboid builders
//!
//! # Layer 0 Crate
//!
//! Engine-free: usable from CLI tools, WASM, servers, and bindings.
//!
//! # Units and Coordinates
//!
//! Unit-agnostic `f64` throughout, right-handed coordinate system, face
//! winding counter-clockwise viewed from outside (normals point outward).
//!
//! # Example
//!
//! ```
//! use shell_types::primitives::cylinder;
//!
//! let solid = cylinder("body", 1.0, 4.0, 16);
//! assert!(solid.is_manifoldizable());
//! assert_eq!(solid.face_count(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Safety: deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod adjacency;
mod bounds;
mod error;
mod islands;
pub mod primitives;
mod solid;
mod surface;

pub use adjacency::FaceAdjacency;
pub use bounds::Aabb;
pub use error::{SolidError, SolidResult};
pub use islands::IslandRemovalOptions;
pub use solid::{FaceId, Solid};
pub use surface::{AuxEdge, SurfaceInfo};

// Re-exported so downstream crates share one nalgebra surface.
pub use nalgebra::{Point3, Vector3};
