//! The labeled solid container.

use hashbrown::HashMap;
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;
use crate::surface::{AuxEdge, SurfaceInfo};

/// Vertex positions closer than this are welded to a single index.
const WELD_EPSILON: f64 = 1e-9;

/// Opaque identifier of a named face within one [`Solid`].
///
/// Ids are allocated per solid and are not stable across solids; the face
/// *name* is the identity that survives modeling operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceId(pub(crate) u32);

impl FaceId {
    /// The raw id value.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// A triangulated solid whose triangles are grouped into named faces.
///
/// Storage is flat: a position buffer, a triangle index buffer, and one
/// [`FaceId`] per triangle (invariant: `triangles.len() == face_ids.len()`).
/// Triangles are inserted through [`Solid::insert_triangle`], which welds
/// coincident vertices and allocates face ids on first use of a name.
///
/// Faces additionally carry optional analytic metadata ([`SurfaceInfo`],
/// keyed by face name) and the solid carries auxiliary reference edges;
/// both are copied, not recomputed, by remeshing operations.
///
/// # Example
///
/// ```
/// use shell_types::Solid;
/// use nalgebra::Point3;
///
/// let mut solid = Solid::new("part");
/// solid.insert_triangle(
///     "part_FACE_0",
///     [
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
/// );
/// assert_eq!(solid.triangle_count(), 1);
/// assert_eq!(solid.face_count(), 1);
/// assert_eq!(solid.vertex_count(), 3);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solid {
    name: String,
    positions: Vec<Point3<f64>>,
    triangles: Vec<[u32; 3]>,
    face_ids: Vec<FaceId>,
    face_names: HashMap<FaceId, String>,
    name_lookup: HashMap<String, FaceId>,
    surface_info: HashMap<String, SurfaceInfo>,
    aux_edges: Vec<AuxEdge>,
    next_face_id: u32,
    /// Quantized-position welding index. Rebuilt lazily after
    /// deserialization or triangle removal.
    #[cfg_attr(feature = "serde", serde(skip))]
    weld: HashMap<(i64, i64, i64), u32>,
}

impl Solid {
    /// Create an empty solid with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The solid's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the solid.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Vertex position buffer.
    #[must_use]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Triangle index buffer, one `[v0, v1, v2]` per triangle.
    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Per-triangle face ids, parallel to [`Solid::triangles`].
    #[must_use]
    pub fn face_ids(&self) -> &[FaceId] {
        &self.face_ids
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of named faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.face_names.len()
    }

    /// Whether the solid has no geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.triangles.is_empty()
    }

    /// Look up a face name by id.
    #[must_use]
    pub fn face_name(&self, id: FaceId) -> Option<&str> {
        self.face_names.get(&id).map(String::as_str)
    }

    /// Look up a face id by name.
    #[must_use]
    pub fn face_id(&self, name: &str) -> Option<FaceId> {
        self.name_lookup.get(name).copied()
    }

    /// Iterate over `(id, name)` pairs of all named faces.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &str)> {
        self.face_names.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// The face name of a triangle, if the triangle index is valid.
    #[must_use]
    pub fn triangle_face_name(&self, triangle: usize) -> Option<&str> {
        self.face_ids
            .get(triangle)
            .and_then(|id| self.face_name(*id))
    }

    /// Indices of all triangles belonging to a named face.
    #[must_use]
    pub fn face_triangles(&self, name: &str) -> Vec<usize> {
        match self.face_id(name) {
            Some(id) => self
                .face_ids
                .iter()
                .enumerate()
                .filter(|(_, fid)| **fid == id)
                .map(|(i, _)| i)
                .collect(),
            None => Vec::new(),
        }
    }

    /// The three vertex positions of a triangle.
    #[must_use]
    pub fn triangle_positions(&self, triangle: usize) -> Option<[Point3<f64>; 3]> {
        let tri = self.triangles.get(triangle)?;
        Some([
            *self.positions.get(tri[0] as usize)?,
            *self.positions.get(tri[1] as usize)?,
            *self.positions.get(tri[2] as usize)?,
        ])
    }

    /// The centroid of a triangle.
    #[must_use]
    pub fn triangle_centroid(&self, triangle: usize) -> Option<Point3<f64>> {
        let [a, b, c] = self.triangle_positions(triangle)?;
        Some(Point3::from((a.coords + b.coords + c.coords) / 3.0))
    }

    /// The solid's axis-aligned bounding box, or `None` when empty.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Face metadata, keyed by face name.
    #[must_use]
    pub fn surface_info(&self) -> &HashMap<String, SurfaceInfo> {
        &self.surface_info
    }

    /// Record metadata for a named face.
    pub fn set_surface_info(&mut self, face_name: impl Into<String>, info: SurfaceInfo) {
        self.surface_info.insert(face_name.into(), info);
    }

    /// Replace the whole metadata map (used for carryover between solids).
    pub fn set_surface_info_map(&mut self, info: HashMap<String, SurfaceInfo>) {
        self.surface_info = info;
    }

    /// Auxiliary reference edges.
    #[must_use]
    pub fn aux_edges(&self) -> &[AuxEdge] {
        &self.aux_edges
    }

    /// Append an auxiliary edge.
    pub fn push_aux_edge(&mut self, edge: AuxEdge) {
        self.aux_edges.push(edge);
    }

    /// Replace the aux edge list (used for carryover between solids).
    pub fn set_aux_edges(&mut self, edges: Vec<AuxEdge>) {
        self.aux_edges = edges;
    }

    /// Insert one triangle under a face name.
    ///
    /// Vertices within [`WELD_EPSILON`] of an existing vertex reuse its
    /// index, so solids assembled triangle-by-triangle share corners and
    /// stay watertight. A new [`FaceId`] is allocated the first time a
    /// name is seen.
    ///
    /// Returns the triangle's face id.
    pub fn insert_triangle(&mut self, face_name: &str, corners: [Point3<f64>; 3]) -> FaceId {
        let id = match self.name_lookup.get(face_name) {
            Some(id) => *id,
            None => {
                let id = FaceId(self.next_face_id);
                self.next_face_id += 1;
                self.name_lookup.insert(face_name.to_string(), id);
                self.face_names.insert(id, face_name.to_string());
                id
            }
        };

        let tri = [
            self.vertex_index(corners[0]),
            self.vertex_index(corners[1]),
            self.vertex_index(corners[2]),
        ];
        self.triangles.push(tri);
        self.face_ids.push(id);
        id
    }

    /// Check whether the triangulation can be handed to manifold-only
    /// operations: every edge shared by exactly two triangles.
    ///
    /// An empty solid is trivially manifoldizable, which keeps the
    /// degenerate no-op path of offset-style operations reachable.
    #[must_use]
    pub fn is_manifoldizable(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        match crate::adjacency::FaceAdjacency::from_solid(self) {
            Ok(adjacency) => adjacency.is_manifold() && adjacency.is_watertight(),
            Err(_) => false,
        }
    }

    /// Remove triangles whose indices are flagged in `removed`, compacting
    /// the vertex buffer. Used by the island cleanup pass.
    pub(crate) fn retain_triangles(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.triangles.len());

        let mut triangles = Vec::with_capacity(self.triangles.len());
        let mut face_ids = Vec::with_capacity(self.face_ids.len());
        for (i, tri) in self.triangles.iter().enumerate() {
            if keep.get(i).copied().unwrap_or(false) {
                triangles.push(*tri);
                face_ids.push(self.face_ids[i]);
            }
        }

        // Compact vertices: drop positions no surviving triangle references.
        let mut remap: Vec<Option<u32>> = vec![None; self.positions.len()];
        let mut positions = Vec::new();
        for tri in &mut triangles {
            for index in tri.iter_mut() {
                let old = *index as usize;
                let new = match remap[old] {
                    Some(n) => n,
                    None => {
                        let n = u32::try_from(positions.len()).unwrap_or(u32::MAX);
                        positions.push(self.positions[old]);
                        remap[old] = Some(n);
                        n
                    }
                };
                *index = new;
            }
        }

        self.triangles = triangles;
        self.face_ids = face_ids;
        self.positions = positions;
        // Stale after compaction; rebuilt on the next insertion.
        self.weld.clear();
    }

    /// Find or create the welded index for a position.
    fn vertex_index(&mut self, point: Point3<f64>) -> u32 {
        if self.weld.is_empty() && !self.positions.is_empty() {
            self.rebuild_weld_index();
        }
        let key = weld_key(&point);
        if let Some(index) = self.weld.get(&key) {
            return *index;
        }
        let index = u32::try_from(self.positions.len()).unwrap_or(u32::MAX);
        self.positions.push(point);
        self.weld.insert(key, index);
        index
    }

    fn rebuild_weld_index(&mut self) {
        self.weld = self
            .positions
            .iter()
            .enumerate()
            .map(|(i, p)| (weld_key(p), u32::try_from(i).unwrap_or(u32::MAX)))
            .collect();
    }
}

/// Quantize a position to its welding cell.
fn weld_key(point: &Point3<f64>) -> (i64, i64, i64) {
    let quantize = |v: f64| {
        if v.is_finite() {
            #[allow(clippy::cast_possible_truncation)]
            {
                (v / WELD_EPSILON).round() as i64
            }
        } else {
            i64::MAX
        }
    };
    (quantize(point.x), quantize(point.y), quantize(point.z))
}
