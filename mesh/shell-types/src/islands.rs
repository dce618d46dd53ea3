//! Small-island removal.
//!
//! Isosurface sampling can leave behind tiny disconnected shells: floating
//! specks outside the main body, or inverted cavity shells inside it. This
//! pass deletes edge-connected components below a triangle-count threshold.

use crate::adjacency::FaceAdjacency;
use crate::error::SolidResult;
use crate::solid::Solid;

/// Options for [`Solid::remove_small_islands`].
#[derive(Debug, Clone, Copy)]
pub struct IslandRemovalOptions {
    /// Components with at most this many triangles are candidates.
    pub max_triangles: usize,
    /// Remove interior cavity shells (negative enclosed volume).
    pub remove_internal: bool,
    /// Remove exterior shards (non-negative enclosed volume).
    pub remove_external: bool,
}

impl Default for IslandRemovalOptions {
    fn default() -> Self {
        Self {
            max_triangles: 8,
            remove_internal: true,
            remove_external: true,
        }
    }
}

impl Solid {
    /// Remove connected components with at most `max_triangles` triangles.
    ///
    /// Components are classified by the sign of their enclosed volume:
    /// negative (inward-facing winding) marks an interior cavity shell,
    /// non-negative an exterior shard. The flags in `options` select which
    /// class is removed. When the whole solid is at or below the threshold
    /// the pass is a no-op; a result is never deleted outright.
    ///
    /// Returns the number of triangles removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the index buffer is corrupt. Callers running
    /// this as a cosmetic cleanup treat that as a degraded result, not a
    /// failure of the surrounding operation.
    pub fn remove_small_islands(&mut self, options: &IslandRemovalOptions) -> SolidResult<usize> {
        if self.is_empty() || self.triangle_count() <= options.max_triangles {
            return Ok(0);
        }

        let adjacency = FaceAdjacency::from_solid(self)?;
        let components = adjacency.connected_components();
        if components.len() <= 1 {
            return Ok(0);
        }

        let mut keep = vec![true; self.triangle_count()];
        let mut removed = 0_usize;
        for component in &components {
            if component.len() > options.max_triangles {
                continue;
            }
            let internal = self.component_volume(component) < 0.0;
            let remove = if internal {
                options.remove_internal
            } else {
                options.remove_external
            };
            if remove {
                for &tri in component {
                    keep[tri] = false;
                }
                removed += component.len();
            }
        }

        if removed > 0 {
            self.retain_triangles(&keep);
        }
        Ok(removed)
    }

    /// Signed volume enclosed by a set of triangles (divergence theorem).
    fn component_volume(&self, triangles: &[usize]) -> f64 {
        let mut volume = 0.0;
        for &tri in triangles {
            if let Some([a, b, c]) = self.triangle_positions(tri) {
                volume += a.coords.dot(&b.coords.cross(&c.coords));
            }
        }
        volume / 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{cuboid, cylinder};
    use nalgebra::Vector3;

    /// Merge a cuboid's triangles into `target`, optionally flipping
    /// winding to simulate an interior cavity shell.
    fn merge_cuboid(target: &mut Solid, offset: Vector3<f64>, size: f64, flip: bool) {
        let donor = cuboid("island", Vector3::new(size, size, size));
        for tri in 0..donor.triangle_count() {
            let Some([a, b, c]) = donor.triangle_positions(tri) else {
                continue;
            };
            let name = donor.triangle_face_name(tri).unwrap_or("island").to_string();
            let (a, b, c) = (a + offset, b + offset, c + offset);
            if flip {
                target.insert_triangle(&name, [a, c, b]);
            } else {
                target.insert_triangle(&name, [a, b, c]);
            }
        }
    }

    #[test]
    fn external_island_is_removed() {
        let mut solid = cylinder("body", 1.0, 4.0, 16);
        let body_triangles = solid.triangle_count();
        merge_cuboid(&mut solid, Vector3::new(10.0, 0.0, 0.0), 0.2, false);

        let removed = solid
            .remove_small_islands(&IslandRemovalOptions {
                max_triangles: 12,
                remove_internal: false,
                remove_external: true,
            })
            .unwrap();

        assert_eq!(removed, 12);
        assert_eq!(solid.triangle_count(), body_triangles);
    }

    #[test]
    fn internal_cavity_is_removed_only_when_requested() {
        let mut solid = cylinder("body", 1.0, 4.0, 16);
        merge_cuboid(&mut solid, Vector3::new(0.0, 2.0, 0.0), 0.2, true);
        let with_cavity = solid.triangle_count();

        let removed = solid
            .remove_small_islands(&IslandRemovalOptions {
                max_triangles: 12,
                remove_internal: false,
                remove_external: true,
            })
            .unwrap();
        assert_eq!(removed, 0);
        assert_eq!(solid.triangle_count(), with_cavity);

        let removed = solid
            .remove_small_islands(&IslandRemovalOptions {
                max_triangles: 12,
                remove_internal: true,
                remove_external: false,
            })
            .unwrap();
        assert_eq!(removed, 12);
    }

    #[test]
    fn whole_solid_below_threshold_is_kept() {
        let mut solid = cuboid("tiny", Vector3::new(1.0, 1.0, 1.0));
        let removed = solid
            .remove_small_islands(&IslandRemovalOptions {
                max_triangles: 100,
                remove_internal: true,
                remove_external: true,
            })
            .unwrap();
        assert_eq!(removed, 0);
        assert_eq!(solid.triangle_count(), 12);
    }

    #[test]
    fn single_component_above_threshold_is_kept() {
        let mut solid = cylinder("body", 1.0, 4.0, 16);
        let before = solid.triangle_count();
        let removed = solid
            .remove_small_islands(&IslandRemovalOptions::default())
            .unwrap();
        assert_eq!(removed, 0);
        assert_eq!(solid.triangle_count(), before);
    }

    #[test]
    fn cavity_volume_is_negative() {
        let mut solid = Solid::new("cavity");
        merge_cuboid(&mut solid, Vector3::zeros(), 1.0, true);
        let all: Vec<usize> = (0..solid.triangle_count()).collect();
        assert!(solid.component_volume(&all) < 0.0);
    }

    #[test]
    fn cuboid_volume_is_positive() {
        let solid = cuboid("box", Vector3::new(2.0, 3.0, 4.0));
        let all: Vec<usize> = (0..solid.triangle_count()).collect();
        let volume = solid.component_volume(&all);
        assert!((volume - 24.0).abs() < 1e-9, "volume was {volume}");
    }

    #[test]
    fn far_cuboid_merge_does_not_weld() {
        let mut solid = cuboid("a", Vector3::new(1.0, 1.0, 1.0));
        merge_cuboid(&mut solid, Vector3::new(5.0, 0.0, 0.0), 1.0, false);
        let adjacency = FaceAdjacency::from_solid(&solid).unwrap();
        assert_eq!(adjacency.connected_components().len(), 2);
    }
}
