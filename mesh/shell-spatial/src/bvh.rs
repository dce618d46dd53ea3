//! Bounding volume hierarchy over a triangle buffer.
//!
//! Built once per modeling operation from a raw position/index buffer
//! pair, queried heavily, then dropped; nothing is shared between
//! operations.

use nalgebra::Point3;
use shell_types::Aabb;

use crate::error::{SpatialError, SpatialResult};
use crate::ray::Ray;
use crate::triangle::{closest_point_on_triangle, ray_triangle_intersect};

/// Leaves hold at most this many triangles.
const MAX_LEAF_TRIANGLES: usize = 8;

/// Result of a nearest-point query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestHit {
    /// Distance from the query point to the closest surface point.
    pub distance: f64,
    /// Index of the closest triangle in the build buffer.
    pub triangle: usize,
    /// The closest point itself.
    pub point: Point3<f64>,
}

#[derive(Debug)]
enum BvhNode {
    Leaf {
        aabb: Aabb,
        triangles: Vec<usize>,
    },
    Internal {
        aabb: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    fn aabb(&self) -> &Aabb {
        match self {
            Self::Leaf { aabb, .. } | Self::Internal { aabb, .. } => aabb,
        }
    }
}

/// A binary BVH over triangles, supporting exact nearest-point queries and
/// all-hits ray counting.
///
/// # Example
///
/// ```
/// use shell_spatial::TriangleBvh;
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let triangles = vec![[0_u32, 1, 2]];
/// let bvh = TriangleBvh::build(&positions, &triangles).unwrap();
///
/// let hit = bvh.nearest_point(&Point3::new(0.25, 0.25, 2.0)).unwrap();
/// assert!((hit.distance - 2.0).abs() < 1e-12);
/// assert_eq!(hit.triangle, 0);
/// ```
#[derive(Debug)]
pub struct TriangleBvh {
    /// Per-triangle corner positions, copied out of the build buffers.
    corners: Vec<[Point3<f64>; 3]>,
    root: Option<BvhNode>,
}

impl TriangleBvh {
    /// Build a BVH from a position buffer and a triangle index buffer.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::IndexOutOfBounds`] if an index references a
    /// vertex outside `positions`.
    pub fn build(positions: &[Point3<f64>], triangles: &[[u32; 3]]) -> SpatialResult<Self> {
        let mut corners = Vec::with_capacity(triangles.len());
        for (tri_idx, tri) in triangles.iter().enumerate() {
            let mut resolved = [Point3::origin(); 3];
            for (slot, &index) in resolved.iter_mut().zip(tri) {
                *slot = *positions.get(index as usize).ok_or(
                    SpatialError::IndexOutOfBounds {
                        triangle: tri_idx,
                        index,
                    },
                )?;
            }
            corners.push(resolved);
        }

        let root = if corners.is_empty() {
            None
        } else {
            let indices: Vec<usize> = (0..corners.len()).collect();
            Some(build_node(&corners, indices))
        };

        Ok(Self { corners, root })
    }

    /// Number of triangles in the tree.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.corners.len()
    }

    /// Bounds of the whole tree, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        self.root.as_ref().map(|root| *root.aabb())
    }

    /// Find the closest surface point to `point`.
    ///
    /// Returns `None` only for an empty tree.
    #[must_use]
    pub fn nearest_point(&self, point: &Point3<f64>) -> Option<NearestHit> {
        let root = self.root.as_ref()?;
        let mut best: Option<(f64, usize, Point3<f64>)> = None;
        self.nearest_recursive(root, point, &mut best);
        best.map(|(dist_sq, triangle, closest)| NearestHit {
            distance: dist_sq.sqrt(),
            triangle,
            point: closest,
        })
    }

    fn nearest_recursive(
        &self,
        node: &BvhNode,
        point: &Point3<f64>,
        best: &mut Option<(f64, usize, Point3<f64>)>,
    ) {
        match node {
            BvhNode::Leaf { triangles, .. } => {
                for &tri in triangles {
                    let [v0, v1, v2] = &self.corners[tri];
                    let closest = closest_point_on_triangle(point, v0, v1, v2);
                    let dist_sq = (closest - point).norm_squared();
                    if best.map_or(true, |(b, _, _)| dist_sq < b) {
                        *best = Some((dist_sq, tri, closest));
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                // Descend nearest child first so pruning bites sooner.
                let left_dist = left.aabb().distance_squared(point);
                let right_dist = right.aabb().distance_squared(point);
                let (first, first_dist, second, second_dist) = if left_dist <= right_dist {
                    (left, left_dist, right, right_dist)
                } else {
                    (right, right_dist, left, left_dist)
                };

                if best.map_or(true, |(b, _, _)| first_dist < b) {
                    self.nearest_recursive(first, point, best);
                }
                if best.map_or(true, |(b, _, _)| second_dist < b) {
                    self.nearest_recursive(second, point, best);
                }
            }
        }
    }

    /// Count every triangle intersection along a ray.
    ///
    /// All hits with `t` above the self-intersection epsilon are counted,
    /// with no early exit; the parity of the count classifies the ray
    /// origin as inside (odd) or outside (even) a closed surface.
    #[must_use]
    pub fn count_ray_hits(&self, ray: &Ray) -> usize {
        let Some(root) = self.root.as_ref() else {
            return 0;
        };
        self.count_hits_recursive(root, ray)
    }

    fn count_hits_recursive(&self, node: &BvhNode, ray: &Ray) -> usize {
        if !ray_intersects_aabb(ray, node.aabb()) {
            return 0;
        }
        match node {
            BvhNode::Leaf { triangles, .. } => triangles
                .iter()
                .filter(|&&tri| {
                    let [v0, v1, v2] = &self.corners[tri];
                    ray_triangle_intersect(&ray.origin, &ray.direction, v0, v1, v2).is_some()
                })
                .count(),
            BvhNode::Internal { left, right, .. } => {
                self.count_hits_recursive(left, ray) + self.count_hits_recursive(right, ray)
            }
        }
    }
}

/// Recursively build a node from triangle indices (median split on the
/// longest axis).
fn build_node(corners: &[[Point3<f64>; 3]], mut indices: Vec<usize>) -> BvhNode {
    let mut aabb = triangle_aabb(&corners[indices[0]]);
    for &tri in indices.iter().skip(1) {
        aabb.expand_aabb(&triangle_aabb(&corners[tri]));
    }

    if indices.len() <= MAX_LEAF_TRIANGLES {
        return BvhNode::Leaf {
            aabb,
            triangles: indices,
        };
    }

    let size = aabb.size();
    let axis = if size.x >= size.y && size.x >= size.z {
        0
    } else if size.y >= size.z {
        1
    } else {
        2
    };

    indices.sort_by(|&a, &b| {
        let ca = triangle_center_axis(&corners[a], axis);
        let cb = triangle_center_axis(&corners[b], axis);
        ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mid = indices.len() / 2;
    let right_indices = indices.split_off(mid);
    BvhNode::Internal {
        aabb,
        left: Box::new(build_node(corners, indices)),
        right: Box::new(build_node(corners, right_indices)),
    }
}

fn triangle_aabb(corners: &[Point3<f64>; 3]) -> Aabb {
    let mut aabb = Aabb::from_point(corners[0]);
    aabb.expand_point(&corners[1]);
    aabb.expand_point(&corners[2]);
    aabb
}

fn triangle_center_axis(corners: &[Point3<f64>; 3], axis: usize) -> f64 {
    (corners[0][axis] + corners[1][axis] + corners[2][axis]) / 3.0
}

/// Slab test: does the ray (t >= 0) touch the box?
fn ray_intersects_aabb(ray: &Ray, aabb: &Aabb) -> bool {
    let mut t_min = 0.0_f64;
    let mut t_max = f64::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if direction.abs() < f64::EPSILON {
            if origin < lo || origin > hi {
                return false;
            }
        } else {
            let inv = 1.0 / direction;
            let (t0, t1) = if inv >= 0.0 {
                ((lo - origin) * inv, (hi - origin) * inv)
            } else {
                ((hi - origin) * inv, (lo - origin) * inv)
            };
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use shell_types::primitives::cuboid;

    fn cube_buffers() -> (Vec<Point3<f64>>, Vec<[u32; 3]>) {
        let solid = cuboid("cube", Vector3::new(2.0, 2.0, 2.0));
        (solid.positions().to_vec(), solid.triangles().to_vec())
    }

    /// Brute-force nearest point for cross-checking the tree.
    fn brute_force_nearest(
        positions: &[Point3<f64>],
        triangles: &[[u32; 3]],
        point: &Point3<f64>,
    ) -> f64 {
        triangles
            .iter()
            .map(|tri| {
                let closest = closest_point_on_triangle(
                    point,
                    &positions[tri[0] as usize],
                    &positions[tri[1] as usize],
                    &positions[tri[2] as usize],
                );
                (closest - point).norm()
            })
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn empty_tree_has_no_hits() {
        let bvh = TriangleBvh::build(&[], &[]).unwrap();
        assert!(bvh.nearest_point(&Point3::origin()).is_none());
        assert_eq!(
            bvh.count_ray_hits(&Ray::new(Point3::origin(), Vector3::x())),
            0
        );
        assert!(bvh.bounds().is_none());
    }

    #[test]
    fn build_rejects_bad_indices() {
        let positions = vec![Point3::origin()];
        let triangles = vec![[0_u32, 1, 2]];
        assert!(TriangleBvh::build(&positions, &triangles).is_err());
    }

    #[test]
    fn nearest_matches_brute_force_on_cube() {
        let (positions, triangles) = cube_buffers();
        let bvh = TriangleBvh::build(&positions, &triangles).unwrap();

        let queries = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.2, -0.4),
            Point3::new(-2.5, 2.5, 2.5),
            Point3::new(0.9, 0.9, 0.9),
            Point3::new(0.0, -5.0, 0.3),
        ];
        for query in &queries {
            let hit = bvh.nearest_point(query).unwrap();
            let expected = brute_force_nearest(&positions, &triangles, query);
            assert_relative_eq!(hit.distance, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn nearest_reports_closest_point() {
        let (positions, triangles) = cube_buffers();
        let bvh = TriangleBvh::build(&positions, &triangles).unwrap();

        let hit = bvh.nearest_point(&Point3::new(0.0, 0.0, 5.0)).unwrap();
        assert_relative_eq!(hit.distance, 4.0);
        assert_relative_eq!(hit.point.z, 1.0);
    }

    #[test]
    fn parity_inside_cube_is_odd() {
        let (positions, triangles) = cube_buffers();
        let bvh = TriangleBvh::build(&positions, &triangles).unwrap();

        let direction = Vector3::new(0.437, 0.821, 0.368);
        let hits = bvh.count_ray_hits(&Ray::new(Point3::new(0.1, 0.2, -0.3), direction));
        assert_eq!(hits % 2, 1);
    }

    #[test]
    fn parity_outside_cube_is_even() {
        let (positions, triangles) = cube_buffers();
        let bvh = TriangleBvh::build(&positions, &triangles).unwrap();

        let direction = Vector3::new(0.437, 0.821, 0.368);
        let hits = bvh.count_ray_hits(&Ray::new(Point3::new(4.0, 0.1, 0.2), direction));
        assert_eq!(hits % 2, 0);
    }

    #[test]
    fn bounds_cover_the_mesh() {
        let (positions, triangles) = cube_buffers();
        let bvh = TriangleBvh::build(&positions, &triangles).unwrap();
        let bounds = bvh.bounds().unwrap();
        assert_relative_eq!(bounds.min.x, -1.0);
        assert_relative_eq!(bounds.max.z, 1.0);
    }

    #[test]
    fn deep_tree_still_finds_nearest() {
        // A long strip of triangles forces several split levels.
        let mut positions = Vec::new();
        let mut triangles = Vec::new();
        for i in 0..100_u32 {
            let x = f64::from(i);
            positions.push(Point3::new(x, 0.0, 0.0));
            positions.push(Point3::new(x + 1.0, 0.0, 0.0));
            positions.push(Point3::new(x + 0.5, 1.0, 0.0));
            triangles.push([3 * i, 3 * i + 1, 3 * i + 2]);
        }
        let bvh = TriangleBvh::build(&positions, &triangles).unwrap();

        let hit = bvh.nearest_point(&Point3::new(42.5, 0.5, 2.0)).unwrap();
        assert_relative_eq!(hit.distance, 2.0, epsilon = 1e-12);
        assert_eq!(hit.triangle, 42);
    }
}
