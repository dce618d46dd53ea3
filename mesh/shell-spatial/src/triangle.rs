//! Exact point/triangle and ray/triangle primitives.
//!
//! The closest-point routine follows "Real-Time Collision Detection"
//! (Ericson); the ray test is Möller–Trumbore.

use nalgebra::{Point3, Vector3};

/// Intersections with `t` at or below this are treated as self-hits and
/// ignored.
pub(crate) const RAY_EPSILON: f64 = 1e-10;

/// Compute the closest point on a triangle to a query point.
#[must_use]
pub fn closest_point_on_triangle(
    point: &Point3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Point3<f64> {
    let ab = v1 - v0;
    let ac = v2 - v0;
    let ap = point - v0;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    // Vertex region A
    if d1 <= 0.0 && d2 <= 0.0 {
        return *v0;
    }

    let bp = point - v1;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    // Vertex region B
    if d3 >= 0.0 && d4 <= d3 {
        return *v1;
    }

    // Edge region AB
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return v0 + ab * v;
    }

    let cp = point - v2;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    // Vertex region C
    if d6 >= 0.0 && d5 <= d6 {
        return *v2;
    }

    // Edge region AC
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return v0 + ac * w;
    }

    // Edge region BC
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return v1 + (v2 - v1) * w;
    }

    // Interior region
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    v0 + ab * v + ac * w
}

/// Test a ray against a triangle.
///
/// Returns `Some(t)` with the ray parameter at the intersection, or `None`
/// when the ray misses, is parallel, or hits at `t <= RAY_EPSILON`.
#[must_use]
pub fn ray_triangle_intersect(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);
    // Parallel to the triangle plane
    if a.abs() < RAY_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > RAY_EPSILON).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tri() -> (Point3<f64>, Point3<f64>, Point3<f64>) {
        (
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(5.0, 10.0, 0.0),
        )
    }

    #[test]
    fn closest_point_interior_projects_to_plane() {
        let (v0, v1, v2) = tri();
        let closest = closest_point_on_triangle(&Point3::new(5.0, 3.0, 7.0), &v0, &v1, &v2);
        assert_relative_eq!(closest.x, 5.0);
        assert_relative_eq!(closest.y, 3.0);
        assert_relative_eq!(closest.z, 0.0);
    }

    #[test]
    fn closest_point_vertex_region() {
        let (v0, v1, v2) = tri();
        let closest = closest_point_on_triangle(&Point3::new(-3.0, -3.0, 1.0), &v0, &v1, &v2);
        assert_relative_eq!(closest.x, 0.0);
        assert_relative_eq!(closest.y, 0.0);
    }

    #[test]
    fn closest_point_edge_region() {
        let (v0, v1, v2) = tri();
        let closest = closest_point_on_triangle(&Point3::new(5.0, -4.0, 0.0), &v0, &v1, &v2);
        assert_relative_eq!(closest.y, 0.0);
        assert!(closest.x > 0.0 && closest.x < 10.0);
    }

    #[test]
    fn ray_hits_triangle() {
        let (v0, v1, v2) = tri();
        let t = ray_triangle_intersect(
            &Point3::new(5.0, 3.0, 5.0),
            &Vector3::new(0.0, 0.0, -1.0),
            &v0,
            &v1,
            &v2,
        );
        assert_relative_eq!(t.unwrap(), 5.0);
    }

    #[test]
    fn ray_misses_triangle() {
        let (v0, v1, v2) = tri();
        let t = ray_triangle_intersect(
            &Point3::new(50.0, 50.0, 5.0),
            &Vector3::new(0.0, 0.0, -1.0),
            &v0,
            &v1,
            &v2,
        );
        assert!(t.is_none());
    }

    #[test]
    fn ray_behind_origin_is_ignored() {
        let (v0, v1, v2) = tri();
        let t = ray_triangle_intersect(
            &Point3::new(5.0, 3.0, -5.0),
            &Vector3::new(0.0, 0.0, -1.0),
            &v0,
            &v1,
            &v2,
        );
        assert!(t.is_none());
    }

    #[test]
    fn parallel_ray_is_ignored() {
        let (v0, v1, v2) = tri();
        let t = ray_triangle_intersect(
            &Point3::new(5.0, 3.0, 5.0),
            &Vector3::new(1.0, 0.0, 0.0),
            &v0,
            &v1,
            &v2,
        );
        assert!(t.is_none());
    }
}
