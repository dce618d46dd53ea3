//! Triangle adjacency and connected components.
//!
//! Provides edge-to-triangle lookups, manifold/watertight predicates, and
//! connected-component traversal over a solid's triangulation.

use hashbrown::HashMap;

use crate::error::{SolidError, SolidResult};
use crate::solid::Solid;

/// Adjacency information for a solid's triangulation.
///
/// Edges are undirected: `(v0, v1)` is stored with `v0 < v1`.
#[derive(Debug, Clone)]
pub struct FaceAdjacency {
    /// Maps an edge to the triangles sharing it.
    edge_to_triangles: HashMap<(u32, u32), Vec<usize>>,
    /// Neighbor triangles per triangle (shared-edge adjacency).
    neighbors: Vec<Vec<usize>>,
}

impl FaceAdjacency {
    /// Build adjacency for a solid.
    ///
    /// # Errors
    ///
    /// Returns [`SolidError::CorruptIndexBuffer`] if a triangle references
    /// a vertex outside the position buffer.
    pub fn from_solid(solid: &Solid) -> SolidResult<Self> {
        let vertex_count = u32::try_from(solid.vertex_count()).unwrap_or(u32::MAX);
        let triangles = solid.triangles();

        let mut edge_to_triangles: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
        for (tri_idx, tri) in triangles.iter().enumerate() {
            for &index in tri {
                if index >= vertex_count {
                    return Err(SolidError::CorruptIndexBuffer {
                        triangle: tri_idx,
                        index,
                    });
                }
            }
            for edge in [
                normalize_edge(tri[0], tri[1]),
                normalize_edge(tri[1], tri[2]),
                normalize_edge(tri[2], tri[0]),
            ] {
                edge_to_triangles.entry(edge).or_default().push(tri_idx);
            }
        }

        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); triangles.len()];
        for sharing in edge_to_triangles.values() {
            for &a in sharing {
                for &b in sharing {
                    if a != b && !neighbors[a].contains(&b) {
                        neighbors[a].push(b);
                    }
                }
            }
        }

        Ok(Self {
            edge_to_triangles,
            neighbors,
        })
    }

    /// Triangles adjacent (edge-sharing) to the given triangle.
    #[must_use]
    pub fn neighbors(&self, triangle: usize) -> &[usize] {
        self.neighbors.get(triangle).map_or(&[], Vec::as_slice)
    }

    /// Number of edges shared by exactly one triangle.
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_to_triangles
            .values()
            .filter(|tris| tris.len() == 1)
            .count()
    }

    /// Every edge shared by at most two triangles.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.edge_to_triangles.values().all(|tris| tris.len() <= 2)
    }

    /// Every edge shared by at least two triangles (no open boundary).
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.edge_to_triangles.values().all(|tris| tris.len() >= 2)
    }

    /// Partition all triangles into edge-connected components.
    ///
    /// Each component is a sorted list of triangle indices.
    #[must_use]
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let count = self.neighbors.len();
        let mut visited = vec![false; count];
        let mut components = Vec::new();

        for start in 0..count {
            if visited[start] {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![start];
            visited[start] = true;
            while let Some(tri) = stack.pop() {
                component.push(tri);
                for &next in self.neighbors(tri) {
                    if !visited[next] {
                        visited[next] = true;
                        stack.push(next);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }

        components
    }
}

/// Normalize an edge so the smaller index comes first.
#[inline]
fn normalize_edge(v0: u32, v1: u32) -> (u32, u32) {
    if v0 < v1 {
        (v0, v1)
    } else {
        (v1, v0)
    }
}
