//! Face metadata and auxiliary edges.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometric classification of a named face.
///
/// Downstream consumers key behavior (dimensioning, constraint snapping)
/// off the surface kind; faces produced by remeshing operations that no
/// longer match an analytic surface carry no entry or [`SurfaceInfo::Opaque`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SurfaceInfo {
    /// A planar face.
    Planar {
        /// A point on the plane.
        origin: Point3<f64>,
        /// Unit plane normal.
        normal: Vector3<f64>,
    },
    /// A cylindrical face.
    Cylindrical {
        /// A point on the cylinder axis.
        origin: Point3<f64>,
        /// Unit axis direction.
        axis: Vector3<f64>,
        /// Cylinder radius.
        radius: f64,
    },
    /// A conical face.
    Conical {
        /// The cone apex.
        origin: Point3<f64>,
        /// Unit axis direction.
        axis: Vector3<f64>,
        /// Half-angle at the apex, in radians.
        half_angle: f64,
    },
    /// A spherical face.
    Spherical {
        /// Sphere center.
        center: Point3<f64>,
        /// Sphere radius.
        radius: f64,
    },
    /// A face with no known analytic classification.
    Opaque,
}

impl SurfaceInfo {
    /// Short kind tag, useful for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Planar { .. } => "planar",
            Self::Cylindrical { .. } => "cylindrical",
            Self::Conical { .. } => "conical",
            Self::Spherical { .. } => "spherical",
            Self::Opaque => "opaque",
        }
    }
}

/// A named auxiliary polyline edge.
///
/// Aux edges are display/reference geometry (cap rims, silhouette curves)
/// carried alongside the triangulation. Operations that remesh the solid
/// carry them over unchanged.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AuxEdge {
    /// Edge name.
    pub name: String,
    /// Polyline points, in order. A closed loop repeats its first point.
    pub points: Vec<Point3<f64>>,
}

impl AuxEdge {
    /// Create an aux edge from a name and points.
    #[must_use]
    pub fn new(name: impl Into<String>, points: Vec<Point3<f64>>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}
