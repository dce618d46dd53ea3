//! Source surface adapter.
//!
//! Copies a solid's raw buffers into an immutable, query-ready snapshot:
//! triangle BVH plus a cached face-normal table. The snapshot owns all of
//! its data, so the source solid can change or drop while an operation is
//! still sampling.

use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use shell_spatial::{NearestHit, Ray, TriangleBvh};
use shell_types::{Aabb, FaceId, Solid};

use crate::error::{SdfError, SdfResult};

/// An immutable sampling snapshot of a solid's surface.
///
/// Built once per modeling operation and dropped with it. Holds the
/// acceleration structure for nearest-point and ray-parity queries and
/// resolves triangle indices back to the source's face names.
#[derive(Debug)]
pub struct SourceSurface {
    positions: Vec<Point3<f64>>,
    triangles: Vec<[u32; 3]>,
    face_ids: Vec<FaceId>,
    face_names: HashMap<FaceId, String>,
    /// One unit normal per triangle; the zero vector marks a degenerate
    /// (near-zero-area) triangle, recomputed live on lookup.
    face_normals: Vec<Vector3<f64>>,
    bvh: TriangleBvh,
}

impl SourceSurface {
    /// Snapshot a solid for sampling.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::EmptySolid`] when the solid has no geometry.
    /// Callers implementing degenerate no-op contracts check
    /// [`Solid::is_empty`] before building.
    pub fn from_solid(solid: &Solid) -> SdfResult<Self> {
        if solid.is_empty() {
            return Err(SdfError::EmptySolid);
        }

        let positions = solid.positions().to_vec();
        let triangles = solid.triangles().to_vec();
        let face_ids = solid.face_ids().to_vec();
        let face_names: HashMap<FaceId, String> = solid
            .faces()
            .map(|(id, name)| (id, name.to_string()))
            .collect();

        let bvh = TriangleBvh::build(&positions, &triangles)?;
        let face_normals = compute_face_normals(&positions, &triangles);

        Ok(Self {
            positions,
            triangles,
            face_ids,
            face_names,
            face_normals,
            bvh,
        })
    }

    /// Number of source triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Bounding box of the source surface.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.bvh.bounds()
    }

    /// Closest surface point to `point`.
    #[must_use]
    pub fn nearest(&self, point: &Point3<f64>) -> Option<NearestHit> {
        self.bvh.nearest_point(point)
    }

    /// Count all triangle intersections along a ray.
    #[must_use]
    pub fn count_ray_hits(&self, ray: &Ray) -> usize {
        self.bvh.count_ray_hits(ray)
    }

    /// The face name a triangle belongs to.
    #[must_use]
    pub fn face_name_of(&self, triangle: usize) -> Option<&str> {
        let id = self.face_ids.get(triangle)?;
        self.face_names.get(id).map(String::as_str)
    }

    /// The unit normal of a triangle.
    ///
    /// Returns the cached build-time normal; when that entry is the zero
    /// vector (degenerate triangle) the normal is recomputed live from the
    /// current positions. A triangle that is still degenerate yields the
    /// zero vector.
    #[must_use]
    pub fn face_normal(&self, triangle: usize) -> Vector3<f64> {
        let cached = self
            .face_normals
            .get(triangle)
            .copied()
            .unwrap_or_else(Vector3::zeros);
        if cached.norm_squared() > 0.0 {
            return cached;
        }
        self.triangles
            .get(triangle)
            .map(|tri| triangle_normal(&self.positions, tri))
            .unwrap_or_else(Vector3::zeros)
    }
}

/// Compute unit normals for every triangle; degenerate triangles store the
/// zero vector.
fn compute_face_normals(
    positions: &[Point3<f64>],
    triangles: &[[u32; 3]],
) -> Vec<Vector3<f64>> {
    triangles
        .iter()
        .map(|tri| triangle_normal(positions, tri))
        .collect()
}

fn triangle_normal(positions: &[Point3<f64>], tri: &[u32; 3]) -> Vector3<f64> {
    let v0 = &positions[tri[0] as usize];
    let v1 = &positions[tri[1] as usize];
    let v2 = &positions[tri[2] as usize];
    let cross = (v1 - v0).cross(&(v2 - v0));
    cross.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
}
