//! Primitive solid builders.
//!
//! Construction-surface primitives with the face naming scheme the
//! modeling pipeline keys on: `{solid}_CYL_B` / `{solid}_CYL_T` /
//! `{solid}_CYL_S` for cylinders, `{solid}_XN` .. `{solid}_ZP` for
//! cuboids. All windings are CCW viewed from outside.

use nalgebra::{Point3, Vector3};

use crate::solid::Solid;
use crate::surface::{AuxEdge, SurfaceInfo};

/// Build a closed cylinder along +Y, base at `y = 0`, cap at `y = height`.
///
/// `resolution` is the number of segments around the circumference
/// (clamped to at least 3). The side wall is a prism over a regular
/// polygon with circumradius `radius`.
///
/// Faces: `{name}_CYL_B` (bottom cap), `{name}_CYL_T` (top cap),
/// `{name}_CYL_S` (side wall). Cap rims are recorded as aux edges and
/// analytic [`SurfaceInfo`] is attached to all three faces.
///
/// # Example
///
/// ```
/// use shell_types::primitives::cylinder;
///
/// let solid = cylinder("c", 1.0, 4.0, 16);
/// assert_eq!(solid.triangle_count(), 64);
/// assert!(solid.is_manifoldizable());
/// ```
#[must_use]
pub fn cylinder(name: &str, radius: f64, height: f64, resolution: usize) -> Solid {
    let n = resolution.max(3);
    let mut solid = Solid::new(name);

    let bottom_name = format!("{name}_CYL_B");
    let top_name = format!("{name}_CYL_T");
    let side_name = format!("{name}_CYL_S");

    let ring = |i: usize, y: f64| {
        let theta = std::f64::consts::TAU * (i % n) as f64 / n as f64;
        Point3::new(radius * theta.cos(), y, radius * theta.sin())
    };

    let bottom_center = Point3::new(0.0, 0.0, 0.0);
    let top_center = Point3::new(0.0, height, 0.0);

    for i in 0..n {
        let (b0, b1) = (ring(i, 0.0), ring(i + 1, 0.0));
        let (t0, t1) = (ring(i, height), ring(i + 1, height));

        // Caps fan around the axis; bottom winds for -Y, top for +Y.
        solid.insert_triangle(&bottom_name, [bottom_center, b0, b1]);
        solid.insert_triangle(&top_name, [top_center, t1, t0]);

        // Side wall quad, outward radial normal.
        solid.insert_triangle(&side_name, [b0, t0, b1]);
        solid.insert_triangle(&side_name, [b1, t0, t1]);
    }

    solid.set_surface_info(
        bottom_name.clone(),
        SurfaceInfo::Planar {
            origin: bottom_center,
            normal: -Vector3::y(),
        },
    );
    solid.set_surface_info(
        top_name.clone(),
        SurfaceInfo::Planar {
            origin: top_center,
            normal: Vector3::y(),
        },
    );
    solid.set_surface_info(
        side_name,
        SurfaceInfo::Cylindrical {
            origin: bottom_center,
            axis: Vector3::y(),
            radius,
        },
    );

    let rim = |y: f64| {
        let mut points: Vec<Point3<f64>> = (0..n).map(|i| ring(i, y)).collect();
        points.push(ring(0, y));
        points
    };
    solid.push_aux_edge(AuxEdge::new(format!("{bottom_name}_rim"), rim(0.0)));
    solid.push_aux_edge(AuxEdge::new(format!("{top_name}_rim"), rim(height)));

    solid
}

/// Build a closed axis-aligned cuboid centered at the origin.
///
/// `extents` are the full side lengths. Faces are named
/// `{name}_XN`, `{name}_XP`, `{name}_YN`, `{name}_YP`, `{name}_ZN`,
/// `{name}_ZP` after their outward axis direction.
#[must_use]
pub fn cuboid(name: &str, extents: Vector3<f64>) -> Solid {
    let h = extents / 2.0;
    let mut solid = Solid::new(name);

    let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);

    // Each quad is listed CCW viewed from outside; the helper splits it
    // into two triangles sharing the first corner.
    let faces: [(&str, [Point3<f64>; 4], Vector3<f64>); 6] = [
        (
            "XP",
            [
                p(h.x, -h.y, -h.z),
                p(h.x, h.y, -h.z),
                p(h.x, h.y, h.z),
                p(h.x, -h.y, h.z),
            ],
            Vector3::x(),
        ),
        (
            "XN",
            [
                p(-h.x, -h.y, -h.z),
                p(-h.x, -h.y, h.z),
                p(-h.x, h.y, h.z),
                p(-h.x, h.y, -h.z),
            ],
            -Vector3::x(),
        ),
        (
            "YP",
            [
                p(-h.x, h.y, -h.z),
                p(-h.x, h.y, h.z),
                p(h.x, h.y, h.z),
                p(h.x, h.y, -h.z),
            ],
            Vector3::y(),
        ),
        (
            "YN",
            [
                p(-h.x, -h.y, -h.z),
                p(h.x, -h.y, -h.z),
                p(h.x, -h.y, h.z),
                p(-h.x, -h.y, h.z),
            ],
            -Vector3::y(),
        ),
        (
            "ZP",
            [
                p(-h.x, -h.y, h.z),
                p(h.x, -h.y, h.z),
                p(h.x, h.y, h.z),
                p(-h.x, h.y, h.z),
            ],
            Vector3::z(),
        ),
        (
            "ZN",
            [
                p(-h.x, -h.y, -h.z),
                p(-h.x, h.y, -h.z),
                p(h.x, h.y, -h.z),
                p(h.x, -h.y, -h.z),
            ],
            -Vector3::z(),
        ),
    ];

    for (suffix, quad, normal) in faces {
        let face_name = format!("{name}_{suffix}");
        solid.insert_triangle(&face_name, [quad[0], quad[1], quad[2]]);
        solid.insert_triangle(&face_name, [quad[0], quad[2], quad[3]]);
        solid.set_surface_info(
            face_name,
            SurfaceInfo::Planar {
                origin: Point3::from(normal.component_mul(&h)),
                normal,
            },
        );
    }

    solid
}
