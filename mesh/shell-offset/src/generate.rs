//! Offset-shell generation pipeline.
//!
//! One call runs end-to-end on the calling thread: snapshot the source,
//! sample its signed distance over expanded bounds, extract the offset
//! level set, reconstruct face identity, and assemble a new labeled
//! solid. Every scratch structure (surface snapshot, BVH, sample grid,
//! raw mesh) is owned by this call's frame and dropped on every exit
//! path.

use shell_levelset::extract_level_set;
use shell_sdf::{SignedDistance, SourceSurface};
use shell_types::{Aabb, IslandRemovalOptions, Solid};
use tracing::{debug, info, warn};

use crate::error::{OffsetError, OffsetResult};
use crate::reconstruct::{reconstruct_faces, FALLBACK_LABEL};

/// Tuned: sampling edge length is at least `|distance| / 2`.
const EDGE_DISTANCE_DIVISOR: f64 = 2.0;

/// Tuned: sampling edge length is at least a 1/120th of the bounding
/// diagonal, bounding triangle count on large models.
const EDGE_DIAGONAL_DIVISOR: f64 = 120.0;

/// Tuned: absolute floor on the sampling edge length.
const MIN_EDGE_LENGTH: f64 = 1e-3;

/// Sampling bounds carry this many cells of padding beyond the offset.
const BOUNDS_PADDING_CELLS: f64 = 2.0;

/// Tuned: island cleanup keeps components above `max(8, 1%)` triangles.
const ISLAND_MIN_TRIANGLES: usize = 8;
const ISLAND_FRACTION: f64 = 0.01;

/// Options for [`generate`].
#[derive(Debug, Clone, Default)]
pub struct OffsetOptions {
    /// Name for the result; defaults to `{source}_offset_{|distance|}`.
    pub new_solid_name: Option<String>,
    /// Feature-history id of the requesting operation. Informational:
    /// recorded in the trace, unused by the algorithm.
    pub feature_id: Option<String>,
}

impl OffsetOptions {
    fn resolved_name(&self, source: &Solid, distance: f64) -> String {
        self.new_solid_name.clone().unwrap_or_else(|| {
            format!("{}_offset_{}", source.name(), distance.abs())
        })
    }
}

/// Audit counters for one offset operation.
///
/// Degraded-but-successful paths (fallback labels, swallowed cleanup
/// failures, defensive oracle misses) are counted here so they stay
/// observable without failing the operation.
#[derive(Debug, Clone, Default)]
pub struct OffsetStats {
    /// Triangles produced by level-set extraction.
    pub raw_triangles: usize,
    /// Triangles in the assembled result (before island cleanup).
    pub output_triangles: usize,
    /// Distinct composite face labels in the result.
    pub face_labels: usize,
    /// Triangles that resolved no source face and fell back to `"OFFSET"`.
    pub fallback_triangles: usize,
    /// Oracle queries that found no nearest point (defensive path).
    pub oracle_misses: u64,
    /// Triangles removed as small islands.
    pub islands_removed: usize,
    /// Whether island cleanup failed and was skipped.
    pub island_cleanup_failed: bool,
}

/// Generate an offset shell of `source` at the given signed distance.
///
/// Positive distances grow the solid outward, negative distances shrink
/// it inward. The result is a new solid whose faces reconstruct the
/// source's face names, possibly fused (`a+b`) along offset creases,
/// with surface metadata and aux edges carried over.
///
/// A zero or non-finite distance, or an empty source, is a valid no-op
/// and returns a renamed clone of the source.
///
/// # Errors
///
/// - [`OffsetError::NotManifoldizable`] when the source fails the
///   capability check (the only pre-pipeline error).
/// - [`OffsetError::EmptyResult`] when the extraction produces no
///   surface, which happens when an inward offset consumes the solid.
///
/// # Example
///
/// ```
/// use shell_offset::{generate, OffsetOptions};
/// use shell_types::primitives::cuboid;
/// use nalgebra::Vector3;
///
/// let cube = cuboid("cube", Vector3::new(2.0, 2.0, 2.0));
/// let grown = generate(&cube, 0.25, &OffsetOptions::default()).unwrap();
/// assert!(!grown.is_empty());
/// ```
pub fn generate(source: &Solid, distance: f64, options: &OffsetOptions) -> OffsetResult<Solid> {
    generate_with_stats(source, distance, options).map(|(solid, _)| solid)
}

/// Like [`generate`], additionally returning the operation's audit
/// counters.
pub fn generate_with_stats(
    source: &Solid,
    distance: f64,
    options: &OffsetOptions,
) -> OffsetResult<(Solid, OffsetStats)> {
    if !source.is_manifoldizable() {
        return Err(OffsetError::NotManifoldizable);
    }

    let name = options.resolved_name(source, distance);

    if distance == 0.0 || !distance.is_finite() || source.is_empty() {
        debug!(
            source = source.name(),
            distance, "degenerate offset request; returning a clone"
        );
        let mut clone = source.clone();
        clone.set_name(name);
        let stats = OffsetStats {
            raw_triangles: 0,
            output_triangles: clone.triangle_count(),
            face_labels: clone.face_count(),
            ..OffsetStats::default()
        };
        return Ok((clone, stats));
    }

    info!(
        source = source.name(),
        distance,
        feature = options.feature_id.as_deref().unwrap_or(""),
        "generating offset shell"
    );

    let surface = SourceSurface::from_solid(source)?;
    let Some(source_bounds) = source.bounding_box() else {
        // Unreachable for a non-empty solid; treat like the no-op path.
        let mut clone = source.clone();
        clone.set_name(name);
        return Ok((clone, OffsetStats::default()));
    };

    let edge_length = sampling_edge_length(distance, &source_bounds);
    let bounds = offset_bounds(&source_bounds, distance, edge_length);
    debug!(edge_length, ?bounds, "sampling policy resolved");

    // Positive-inside oracle: growing outward by `d` means extracting
    // the `-d` level set.
    let oracle = SignedDistance::new(&surface, distance);
    let raw = extract_level_set(|p| oracle.eval(p), &bounds, edge_length, -distance)?;
    if raw.is_empty() {
        return Err(OffsetError::EmptyResult);
    }
    debug!(triangles = raw.triangle_count(), "level set extracted");

    let buckets = reconstruct_faces(&surface, &raw);

    let mut stats = OffsetStats {
        raw_triangles: raw.triangle_count(),
        fallback_triangles: buckets.get(FALLBACK_LABEL).map_or(0, Vec::len),
        face_labels: buckets.len(),
        oracle_misses: oracle.miss_count(),
        ..OffsetStats::default()
    };

    // Sampling is done; release the scratch state before assembly.
    drop(raw);
    drop(oracle);
    drop(surface);

    // Assemble in sorted label order so face ids come out deterministic.
    let mut result = Solid::new(name);
    let mut labels: Vec<&String> = buckets.keys().collect();
    labels.sort();
    for label in labels {
        for corners in &buckets[label] {
            result.insert_triangle(label, *corners);
        }
    }
    stats.output_triangles = result.triangle_count();

    // Carry over non-geometric source state.
    result.set_surface_info_map(source.surface_info().clone());
    result.set_aux_edges(source.aux_edges().to_vec());

    // Best-effort cosmetic cleanup: never fails the offset.
    let threshold = island_threshold(result.triangle_count());
    match result.remove_small_islands(&IslandRemovalOptions {
        max_triangles: threshold,
        remove_internal: true,
        remove_external: true,
    }) {
        Ok(removed) => stats.islands_removed = removed,
        Err(error) => {
            warn!(%error, "island cleanup failed; keeping uncleaned result");
            stats.island_cleanup_failed = true;
        }
    }

    info!(
        result = result.name(),
        triangles = result.triangle_count(),
        faces = result.face_count(),
        islands_removed = stats.islands_removed,
        "offset shell complete"
    );

    Ok((result, stats))
}

/// Sampling edge length: `max(|distance| / 2, diagonal / 120, 1e-3)`.
///
/// Ties resolution to both the requested offset and the model scale: a
/// small offset on a small part samples finely, a large offset or a large
/// part coarsens to keep triangle counts bounded.
fn sampling_edge_length(distance: f64, source_bounds: &Aabb) -> f64 {
    (distance.abs() / EDGE_DISTANCE_DIVISOR)
        .max(source_bounds.diagonal() / EDGE_DIAGONAL_DIVISOR)
        .max(MIN_EDGE_LENGTH)
}

/// Sampling bounds: the source box grown by `distance + padding`.
///
/// The growth is signed: inward offsets shrink the box, since the result
/// surface lies at least `|distance|` inside the source. Any axis that
/// would collapse below one sampling cell is re-centered to exactly one
/// cell instead.
fn offset_bounds(source_bounds: &Aabb, distance: f64, edge_length: f64) -> Aabb {
    let growth = distance + BOUNDS_PADDING_CELLS * edge_length;
    let mut bounds = source_bounds.grown(growth);

    for axis in 0..3 {
        if bounds.max[axis] - bounds.min[axis] < edge_length {
            let center = (source_bounds.min[axis] + source_bounds.max[axis]) / 2.0;
            bounds.min[axis] = center - edge_length / 2.0;
            bounds.max[axis] = center + edge_length / 2.0;
        }
    }
    bounds
}

/// Island cleanup threshold: `max(8, round(1% of triangle count))`.
fn island_threshold(total_triangles: usize) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let fraction = (total_triangles as f64 * ISLAND_FRACTION).round() as usize;
    fraction.max(ISLAND_MIN_TRIANGLES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};
    use shell_types::primitives::cuboid;

    fn unit_bounds() -> Aabb {
        Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn edge_length_tracks_offset_distance() {
        let bounds = unit_bounds();
        assert_relative_eq!(sampling_edge_length(1.0, &bounds), 0.5);
        assert_relative_eq!(sampling_edge_length(-0.8, &bounds), 0.4);
    }

    #[test]
    fn edge_length_tracks_model_scale() {
        let big = Aabb::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(120.0, 0.0, 0.0),
        );
        assert_relative_eq!(sampling_edge_length(0.1, &big), 1.0);
    }

    #[test]
    fn edge_length_has_a_floor() {
        let tiny = Aabb::new(Point3::origin(), Point3::new(1e-4, 1e-4, 1e-4));
        assert_relative_eq!(sampling_edge_length(1e-6, &tiny), MIN_EDGE_LENGTH);
    }

    #[test]
    fn outward_bounds_expand() {
        let bounds = offset_bounds(&unit_bounds(), 0.5, 0.25);
        // 0.5 offset + 2 cells of 0.25 padding.
        assert_relative_eq!(bounds.min.x, -2.0);
        assert_relative_eq!(bounds.max.y, 2.0);
    }

    #[test]
    fn inward_bounds_shrink() {
        let bounds = offset_bounds(&unit_bounds(), -0.5, 0.1);
        assert_relative_eq!(bounds.min.x, -0.7);
        assert_relative_eq!(bounds.max.z, 0.7);
    }

    #[test]
    fn collapsing_axis_is_recentred() {
        let flat = Aabb::new(
            Point3::new(-1.0, -0.1, -1.0),
            Point3::new(1.0, 0.1, 1.0),
        );
        let bounds = offset_bounds(&flat, -0.5, 0.1);
        // The y axis would invert; it gets one cell centered on the source.
        assert_relative_eq!(bounds.max.y - bounds.min.y, 0.1);
        assert_relative_eq!(bounds.min.y + bounds.max.y, 0.0);
        // Other axes shrink normally.
        assert_relative_eq!(bounds.min.x, -0.7);
    }

    #[test]
    fn island_threshold_floors_at_eight() {
        assert_eq!(island_threshold(100), 8);
        assert_eq!(island_threshold(799), 8);
        assert_eq!(island_threshold(2000), 20);
    }

    #[test]
    fn default_name_derives_from_source_and_distance() {
        let cube = cuboid("cube", Vector3::new(2.0, 2.0, 2.0));
        let options = OffsetOptions::default();
        assert_eq!(options.resolved_name(&cube, -0.5), "cube_offset_0.5");

        let named = OffsetOptions {
            new_solid_name: Some("shellA".to_string()),
            ..OffsetOptions::default()
        };
        assert_eq!(named.resolved_name(&cube, -0.5), "shellA");
    }

    #[test]
    fn non_manifold_source_is_rejected() {
        let mut sheet = Solid::new("sheet");
        sheet.insert_triangle(
            "f",
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
        );
        let result = generate(&sheet, 0.5, &OffsetOptions::default());
        assert!(matches!(result, Err(OffsetError::NotManifoldizable)));
    }

    #[test]
    fn empty_source_is_a_noop() {
        let empty = Solid::new("empty");
        let result = generate(&empty, 1.0, &OffsetOptions::default()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.name(), "empty_offset_1");
    }

    #[test]
    fn inward_offset_consuming_the_solid_reports_empty() {
        let cube = cuboid("cube", Vector3::new(1.0, 1.0, 1.0));
        let result = generate(&cube, -2.0, &OffsetOptions::default());
        assert!(matches!(result, Err(OffsetError::EmptyResult)));
    }
}
