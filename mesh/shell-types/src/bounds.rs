//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (AABB).
///
/// Defined by minimum and maximum corner points. Used for solid bounds,
/// level-set sampling domains, and BVH nodes.
///
/// # Example
///
/// ```
/// use shell_types::Aabb;
/// use nalgebra::Point3;
///
/// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0));
/// assert!(aabb.contains(&Point3::new(1.0, 1.0, 1.0)));
/// assert!((aabb.diagonal() - 56.0_f64.sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a new AABB from two corners.
    ///
    /// The corners are swapped per-axis if `min > max`.
    #[must_use]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min: Point3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Point3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    /// Create an AABB containing a single point.
    #[inline]
    #[must_use]
    pub const fn from_point(point: Point3<f64>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Compute the AABB of a set of points.
    ///
    /// Returns `None` for an empty set.
    #[must_use]
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::from_point(*first);
        for p in iter {
            aabb.expand_point(p);
        }
        Some(aabb)
    }

    /// Expand this AABB to include a point.
    pub fn expand_point(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Expand this AABB to include another AABB.
    pub fn expand_aabb(&mut self, other: &Self) {
        self.expand_point(&other.min);
        self.expand_point(&other.max);
    }

    /// The box center.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Per-axis extents (`max - min`).
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Length of the box diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.size().norm()
    }

    /// Check whether a point lies inside the box (inclusive).
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.y >= self.min.y
            && point.z >= self.min.z
            && point.x <= self.max.x
            && point.y <= self.max.y
            && point.z <= self.max.z
    }

    /// Return a copy grown by `amount` on every side.
    ///
    /// A negative `amount` shrinks the box; axes are not guarded against
    /// inversion here; callers that shrink apply their own per-axis
    /// degeneracy policy (see the offset bounds computation).
    #[must_use]
    pub fn grown(&self, amount: f64) -> Self {
        let delta = Vector3::new(amount, amount, amount);
        Self {
            min: self.min - delta,
            max: self.max + delta,
        }
    }

    /// Squared distance from a point to the box (zero inside).
    #[must_use]
    pub fn distance_squared(&self, point: &Point3<f64>) -> f64 {
        let dx = (self.min.x - point.x).max(0.0).max(point.x - self.max.x);
        let dy = (self.min.y - point.y).max(0.0).max(point.y - self.max.y);
        let dz = (self.min.z - point.z).max(0.0).max(point.z - self.max.z);
        dx * dx + dy * dy + dz * dz
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_swaps_corners() {
        let aabb = Aabb::new(Point3::new(1.0, 0.0, 3.0), Point3::new(0.0, 2.0, 1.0));
        assert_relative_eq!(aabb.min.x, 0.0);
        assert_relative_eq!(aabb.min.z, 1.0);
        assert_relative_eq!(aabb.max.x, 1.0);
        assert_relative_eq!(aabb.max.z, 3.0);
    }

    #[test]
    fn from_points_empty() {
        let no_points: Vec<Point3<f64>> = Vec::new();
        assert!(Aabb::from_points(&no_points).is_none());
    }

    #[test]
    fn from_points_covers_all() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(-1.0, 2.0, 0.5),
            Point3::new(3.0, -4.0, 0.0),
        ];
        let aabb = Aabb::from_points(&pts).unwrap();
        for p in &pts {
            assert!(aabb.contains(p));
        }
    }

    #[test]
    fn grown_positive_and_negative() {
        let aabb = Aabb::new(Point3::origin(), Point3::new(4.0, 4.0, 4.0));
        let bigger = aabb.grown(1.0);
        assert_relative_eq!(bigger.min.x, -1.0);
        assert_relative_eq!(bigger.max.y, 5.0);

        let smaller = aabb.grown(-1.0);
        assert_relative_eq!(smaller.min.x, 1.0);
        assert_relative_eq!(smaller.max.y, 3.0);
    }

    #[test]
    fn distance_squared_inside_is_zero() {
        let aabb = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(aabb.distance_squared(&Point3::new(0.5, 0.5, 0.5)), 0.0);
    }

    #[test]
    fn distance_squared_outside() {
        let aabb = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(aabb.distance_squared(&Point3::new(3.0, 0.5, 0.5)), 4.0);
    }

    #[test]
    fn diagonal_unit_cube() {
        let aabb = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(aabb.diagonal(), 3.0_f64.sqrt());
    }
}
