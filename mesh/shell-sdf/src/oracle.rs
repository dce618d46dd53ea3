//! The signed-distance oracle.
//!
//! Sign convention: **positive inside, negative outside**. Level-set
//! extraction of an offset surface therefore samples this oracle at the
//! *negated* offset distance (growing outward by `d` extracts the `-d`
//! level set).

use std::cell::Cell;

use nalgebra::{Point3, Vector3};
use shell_spatial::Ray;
use tracing::warn;

use crate::surface::SourceSurface;

/// Distances below this are treated as lying on the surface.
const SURFACE_EPSILON: f64 = 1e-9;

/// Fixed parity-ray direction. Deliberately skew to every axis so the ray
/// cannot run inside an axis-aligned face plane, which would produce
/// coplanar intersections the parity count cannot classify.
fn parity_ray_direction() -> Vector3<f64> {
    Vector3::new(0.437, 0.821, 0.368).normalize()
}

/// Signed distance to a [`SourceSurface`], positive inside.
///
/// The oracle is a pure function of the immutable snapshot and a fixed
/// ray direction, so repeated evaluation is deterministic. The only state
/// is an audit counter for the defensive no-nearest-point path.
///
/// # Example
///
/// ```
/// use shell_sdf::{SignedDistance, SourceSurface};
/// use shell_types::primitives::cuboid;
/// use nalgebra::{Point3, Vector3};
///
/// let solid = cuboid("cube", Vector3::new(2.0, 2.0, 2.0));
/// let surface = SourceSurface::from_solid(&solid).unwrap();
/// let oracle = SignedDistance::new(&surface, 0.5);
///
/// // Center of the cube: one unit inside.
/// assert!((oracle.eval(Point3::origin()) - 1.0).abs() < 1e-9);
/// // Two units outside the +X face.
/// assert!((oracle.eval(Point3::new(3.0, 0.0, 0.0)) + 2.0).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct SignedDistance<'a> {
    surface: &'a SourceSurface,
    /// Whether the offset this oracle serves grows outward (`distance >= 0`).
    outward: bool,
    /// Number of queries that found no nearest point at all.
    misses: Cell<u64>,
}

impl<'a> SignedDistance<'a> {
    /// Create an oracle for an offset of the given signed distance.
    ///
    /// The offset direction only affects which side of the surface a
    /// point closer than the surface epsilon is assigned to; it keeps the
    /// sign from flickering exactly at the boundary.
    #[must_use]
    pub fn new(surface: &'a SourceSurface, offset_distance: f64) -> Self {
        Self {
            surface,
            outward: offset_distance >= 0.0,
            misses: Cell::new(0),
        }
    }

    /// Evaluate the signed distance at a point.
    ///
    /// Non-finite components of `point` are treated as 0. When the
    /// nearest-point query finds nothing at all (not expected for a
    /// non-empty snapshot) the oracle returns `-∞`, meaning "deep exterior",
    /// and counts the miss rather than failing.
    #[must_use]
    pub fn eval(&self, point: Point3<f64>) -> f64 {
        let point = sanitize(point);

        let Some(hit) = self.surface.nearest(&point) else {
            warn!("no nearest surface point found; treating query as deep exterior");
            self.misses.set(self.misses.get() + 1);
            return f64::NEG_INFINITY;
        };

        // Resolve the nearest triangle's normal, recomputing degenerate
        // cache entries live. A zero resolved normal marks a doubly
        // degenerate contact; such a hit cannot anchor the on-surface
        // shortcut and falls through to parity classification.
        let normal = self.surface.face_normal(hit.triangle);

        if hit.distance < SURFACE_EPSILON && normal.norm_squared() > 0.0 {
            // Essentially on the surface: pick the side that agrees with
            // the offset direction instead of casting an unstable ray.
            return if self.outward {
                -hit.distance
            } else {
                hit.distance
            };
        }

        let direction = parity_ray_direction();
        let origin = point + direction * SURFACE_EPSILON;
        let hits = self.surface.count_ray_hits(&Ray::new(origin, direction));
        let inside = hits % 2 == 1;

        if inside {
            hit.distance
        } else {
            -hit.distance
        }
    }

    /// Number of queries that hit the defensive no-nearest-point path.
    #[must_use]
    pub fn miss_count(&self) -> u64 {
        self.misses.get()
    }
}

/// Replace non-finite components with 0.
fn sanitize(point: Point3<f64>) -> Point3<f64> {
    let clean = |v: f64| if v.is_finite() { v } else { 0.0 };
    Point3::new(clean(point.x), clean(point.y), clean(point.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shell_types::primitives::{cuboid, cylinder};
    use shell_types::Solid;

    fn cube_surface() -> SourceSurface {
        let solid = cuboid("cube", Vector3::new(2.0, 2.0, 2.0));
        SourceSurface::from_solid(&solid).unwrap()
    }

    #[test]
    fn positive_inside_negative_outside() {
        let surface = cube_surface();
        let oracle = SignedDistance::new(&surface, 0.25);

        assert_relative_eq!(oracle.eval(Point3::origin()), 1.0, epsilon = 1e-9);
        assert_relative_eq!(
            oracle.eval(Point3::new(0.5, 0.0, 0.0)),
            0.5,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            oracle.eval(Point3::new(3.0, 0.0, 0.0)),
            -2.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            oracle.eval(Point3::new(-1.5, -1.5, -1.5)),
            -(3.0_f64 * 0.25).sqrt(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn on_surface_sign_follows_offset_direction() {
        let surface = cube_surface();
        let on_face = Point3::new(1.0, 0.2, -0.3);

        let outward = SignedDistance::new(&surface, 0.5);
        assert!(outward.eval(on_face) <= 0.0);
        assert!(outward.eval(on_face).abs() < SURFACE_EPSILON);

        let inward = SignedDistance::new(&surface, -0.5);
        assert!(inward.eval(on_face) >= 0.0);
        assert!(inward.eval(on_face).abs() < SURFACE_EPSILON);
    }

    #[test]
    fn non_finite_components_are_zeroed() {
        let surface = cube_surface();
        let oracle = SignedDistance::new(&surface, 0.5);

        let with_nan = oracle.eval(Point3::new(f64::NAN, 0.0, 0.0));
        let with_inf = oracle.eval(Point3::new(0.0, f64::INFINITY, 0.0));
        let at_origin = oracle.eval(Point3::origin());

        assert_relative_eq!(with_nan, at_origin);
        assert_relative_eq!(with_inf, at_origin);
    }

    #[test]
    fn cylinder_interior_distance() {
        let solid = cylinder("c", 1.0, 4.0, 64);
        let surface = SourceSurface::from_solid(&solid).unwrap();
        let oracle = SignedDistance::new(&surface, 0.5);

        // On the axis, mid-height: nearest surface is the wall, one
        // (poly-)radius away.
        let d = oracle.eval(Point3::new(0.0, 2.0, 0.0));
        assert!(d > 0.9 && d <= 1.0, "axis distance was {d}");

        // Just above the top cap.
        let d = oracle.eval(Point3::new(0.0, 4.5, 0.0));
        assert_relative_eq!(d, -0.5, epsilon = 1e-9);
    }

    #[test]
    fn no_misses_on_well_formed_surface() {
        let surface = cube_surface();
        let oracle = SignedDistance::new(&surface, 0.5);
        let _ = oracle.eval(Point3::new(0.3, -0.8, 2.4));
        let _ = oracle.eval(Point3::new(-5.0, 0.0, 0.0));
        assert_eq!(oracle.miss_count(), 0);
    }

    #[test]
    fn degenerate_only_solid_still_answers() {
        // A solid made of one zero-area triangle: nearest exists, the
        // normal cannot be resolved, and parity sees no crossings, so
        // every query lands outside.
        let mut solid = Solid::new("sliver");
        solid.insert_triangle(
            "f",
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
            ],
        );
        let surface = SourceSurface::from_solid(&solid).unwrap();
        let oracle = SignedDistance::new(&surface, 0.5);

        let d = oracle.eval(Point3::new(0.5, 0.0, 0.0));
        assert!(d <= 0.0);
        assert_eq!(oracle.miss_count(), 0);
    }
}
