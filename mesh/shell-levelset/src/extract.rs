//! Scalar surface-nets isosurface extraction.
//!
//! A tri-table marching-cubes extractor is prone to ambiguous cube
//! configurations that open cracks when the field comes from a sampled
//! triangle-soup distance oracle. Surface nets sidesteps the ambiguity:
//! one vertex per sign-crossing cell, one quad per crossing lattice edge,
//! every quad stitched between cells that share that edge.

use nalgebra::Point3;
use shell_types::Aabb;

use crate::error::{LevelSetError, LevelSetResult};
use crate::grid::ScalarGrid;

/// Corner offsets of a cell, in a fixed order.
const CORNER_OFFSETS: [(usize, usize, usize); 8] = [
    (0, 0, 0),
    (1, 0, 0),
    (1, 1, 0),
    (0, 1, 0),
    (0, 0, 1),
    (1, 0, 1),
    (1, 1, 1),
    (0, 1, 1),
];

/// Cell edges as corner-index pairs into [`CORNER_OFFSETS`].
const CELL_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// A raw, label-free triangle mesh produced by extraction.
///
/// Positions plus indices, nothing else: face identity is reconstructed
/// by the caller. Dropping the mesh releases everything.
#[derive(Debug, Clone, Default)]
pub struct LevelSetMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Triangle index buffer.
    pub triangles: Vec<[u32; 3]>,
}

impl LevelSetMesh {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Whether the extraction produced no surface.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Extract the `isovalue` level set of a scalar field over `bounds`.
///
/// The field is sampled on a corner lattice with the given edge length,
/// padded by one cell on every side so surfaces touching the bounds stay
/// closed. Triangles are wound so their normals point toward the
/// *negative* side of `field - isovalue`; with a positive-inside signed
/// distance field the normals face outward.
///
/// A field that never crosses the isovalue yields an empty mesh, not an
/// error.
///
/// # Errors
///
/// Returns [`LevelSetError::InvalidEdgeLength`] for a non-positive or
/// non-finite edge length, and [`LevelSetError::DegenerateBounds`] when a
/// bounds corner is non-finite.
///
/// # Example
///
/// ```
/// use shell_levelset::extract_level_set;
/// use shell_types::Aabb;
/// use nalgebra::Point3;
///
/// // Positive-inside sphere of radius 1.
/// let bounds = Aabb::new(Point3::new(-1.5, -1.5, -1.5), Point3::new(1.5, 1.5, 1.5));
/// let mesh = extract_level_set(|p| 1.0 - p.coords.norm(), &bounds, 0.2, 0.0).unwrap();
/// assert!(!mesh.is_empty());
/// ```
pub fn extract_level_set<F>(
    mut field: F,
    bounds: &Aabb,
    edge_length: f64,
    isovalue: f64,
) -> LevelSetResult<LevelSetMesh>
where
    F: FnMut(Point3<f64>) -> f64,
{
    if !(edge_length.is_finite() && edge_length > 0.0) {
        return Err(LevelSetError::InvalidEdgeLength(edge_length));
    }
    if !(bounds.min.coords.iter().all(|v| v.is_finite())
        && bounds.max.coords.iter().all(|v| v.is_finite()))
    {
        return Err(LevelSetError::DegenerateBounds);
    }

    let size = bounds.size();
    let cell_count = |extent: f64| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cells = (extent / edge_length).ceil().max(1.0) as usize;
        // One padding cell on each side.
        cells + 2
    };
    let cells = (cell_count(size.x), cell_count(size.y), cell_count(size.z));
    let corners = (cells.0 + 1, cells.1 + 1, cells.2 + 1);
    let origin = Point3::new(
        bounds.min.x - edge_length,
        bounds.min.y - edge_length,
        bounds.min.z - edge_length,
    );

    // Sample the field once per lattice corner, iso-shifted so the
    // extraction below only reasons about signs around zero.
    let mut grid = ScalarGrid::new(corners, origin, edge_length);
    for iz in 0..corners.2 {
        for iy in 0..corners.1 {
            for ix in 0..corners.0 {
                let value = field(grid.position(ix, iy, iz)) - isovalue;
                grid.set(ix, iy, iz, value);
            }
        }
    }

    let mut mesh = LevelSetMesh::default();

    // One vertex per sign-crossing cell, at the mean of the cell's
    // interpolated edge crossings.
    let cell_index =
        |cx: usize, cy: usize, cz: usize| cx + cy * cells.0 + cz * cells.0 * cells.1;
    let mut cell_vertex: Vec<Option<u32>> = vec![None; cells.0 * cells.1 * cells.2];

    for cz in 0..cells.2 {
        for cy in 0..cells.1 {
            for cx in 0..cells.0 {
                let mut values = [0.0_f64; 8];
                let mut any_inside = false;
                let mut any_outside = false;
                for (slot, (dx, dy, dz)) in values.iter_mut().zip(CORNER_OFFSETS) {
                    let v = grid.get(cx + dx, cy + dy, cz + dz);
                    *slot = v;
                    if v >= 0.0 {
                        any_inside = true;
                    } else {
                        any_outside = true;
                    }
                }
                if !(any_inside && any_outside) {
                    continue;
                }

                let mut accum = Point3::origin().coords;
                let mut crossings = 0_u32;
                for (a, b) in CELL_EDGES {
                    let (fa, fb) = (values[a], values[b]);
                    if (fa >= 0.0) == (fb >= 0.0) {
                        continue;
                    }
                    let (adx, ady, adz) = CORNER_OFFSETS[a];
                    let (bdx, bdy, bdz) = CORNER_OFFSETS[b];
                    let pa = grid.position(cx + adx, cy + ady, cz + adz);
                    let pb = grid.position(cx + bdx, cy + bdy, cz + bdz);
                    let t = fa / (fa - fb);
                    accum += pa.coords + (pb.coords - pa.coords) * t;
                    crossings += 1;
                }
                if crossings == 0 {
                    continue;
                }

                let vertex = Point3::from(accum / f64::from(crossings));
                let index = u32::try_from(mesh.positions.len()).unwrap_or(u32::MAX);
                mesh.positions.push(vertex);
                cell_vertex[cell_index(cx, cy, cz)] = Some(index);
            }
        }
    }

    // Stitch one quad around every crossing lattice edge. For an edge
    // along axis `a` with cyclic transverse axes `(u, v)`, the four
    // incident cells wind `(u, v)`-counter-clockwise, giving normals
    // along `+a` when the low corner is inside.
    let cell_dims = [cells.0, cells.1, cells.2];
    let cyclic_axes: [(usize, usize, usize); 3] = [(0, 1, 2), (1, 2, 0), (2, 0, 1)];

    for (axis, u, v) in cyclic_axes {
        let mut step = [0_usize; 3];
        step[axis] = 1;

        for k in 0..corners.2 {
            for j in 0..corners.1 {
                for i in 0..corners.0 {
                    let corner = [i, j, k];
                    // The edge runs from this corner along `axis`; the
                    // transverse coordinates must leave room for both
                    // flanking cell rows.
                    if corner[axis] >= cell_dims[axis] {
                        continue;
                    }
                    if corner[u] == 0 || corner[u] >= cell_dims[u] {
                        continue;
                    }
                    if corner[v] == 0 || corner[v] >= cell_dims[v] {
                        continue;
                    }

                    let low = grid.get(corner[0], corner[1], corner[2]);
                    let high =
                        grid.get(corner[0] + step[0], corner[1] + step[1], corner[2] + step[2]);
                    if (low >= 0.0) == (high >= 0.0) {
                        continue;
                    }

                    let cell_at = |du: usize, dv: usize| {
                        let mut c = corner;
                        c[u] -= du;
                        c[v] -= dv;
                        cell_vertex[cell_index(c[0], c[1], c[2])]
                    };
                    let (Some(q00), Some(q10), Some(q11), Some(q01)) =
                        (cell_at(1, 1), cell_at(0, 1), cell_at(0, 0), cell_at(1, 0))
                    else {
                        continue;
                    };

                    if low >= 0.0 {
                        mesh.triangles.push([q00, q10, q11]);
                        mesh.triangles.push([q00, q11, q01]);
                    } else {
                        mesh.triangles.push([q00, q01, q11]);
                        mesh.triangles.push([q00, q11, q10]);
                    }
                }
            }
        }
    }

    Ok(mesh)
}
