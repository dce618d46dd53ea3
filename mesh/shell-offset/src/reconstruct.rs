//! Face-identity reconstruction.
//!
//! Level-set extraction discards the source's per-face partition. This
//! pass reassigns identity per output triangle by sampling its three
//! vertices and centroid against the source surface and voting among the
//! nearest source face names. Triangles straddling an original face
//! boundary get a composite `a+b` label instead of being forced onto one
//! side; triangles that resolve no name at all (possible only far from
//! the source) fall back to a synthetic label.

use hashbrown::HashMap;
use nalgebra::Point3;
use shell_levelset::LevelSetMesh;
use shell_sdf::SourceSurface;
use smallvec::SmallVec;

/// Label applied when no sample resolves to a source face.
pub const FALLBACK_LABEL: &str = "OFFSET";

/// Tuned: a candidate needs at least this many of the four sample votes,
/// unless the leader itself has more.
const MIN_COUNT_THRESHOLD: usize = 2;

/// Tuned: candidates whose nearest distance is within this of the
/// leader's count as equidistant at a crease.
const CREASE_EPSILON: f64 = 1e-4;

/// Tuned: at most this many names fuse into one crease label.
const MAX_CREASE_LABELS: usize = 3;

/// Triangles grouped by their reconstructed composite label.
pub(crate) type FaceBuckets = HashMap<String, Vec<[Point3<f64>; 3]>>;

/// One candidate face name in a triangle's vote tally.
#[derive(Debug, Clone)]
struct LabelVote {
    name: String,
    count: usize,
    min_distance: f64,
}

/// Bucket every output triangle by its reconstructed face label.
pub(crate) fn reconstruct_faces(surface: &SourceSurface, raw: &LevelSetMesh) -> FaceBuckets {
    let mut buckets = FaceBuckets::new();

    for tri in &raw.triangles {
        let Some(corners) = resolve_corners(raw, tri) else {
            continue;
        };
        let centroid = Point3::from(
            (corners[0].coords + corners[1].coords + corners[2].coords) / 3.0,
        );

        let samples = corners
            .iter()
            .chain(std::iter::once(&centroid))
            .filter_map(|point| {
                let hit = surface.nearest(point)?;
                let name = surface.face_name_of(hit.triangle)?;
                Some((name, hit.distance))
            });

        let label = select_label(tally_votes(samples));
        buckets.entry(label).or_default().push(corners);
    }

    buckets
}

fn resolve_corners(raw: &LevelSetMesh, tri: &[u32; 3]) -> Option<[Point3<f64>; 3]> {
    Some([
        *raw.positions.get(tri[0] as usize)?,
        *raw.positions.get(tri[1] as usize)?,
        *raw.positions.get(tri[2] as usize)?,
    ])
}

/// Tally per-name `{count, min_distance}` over the resolved samples.
fn tally_votes<'a, I>(samples: I) -> SmallVec<[LabelVote; 4]>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut votes: SmallVec<[LabelVote; 4]> = SmallVec::new();
    for (name, distance) in samples {
        match votes.iter_mut().find(|vote| vote.name == name) {
            Some(vote) => {
                vote.count += 1;
                vote.min_distance = vote.min_distance.min(distance);
            }
            None => votes.push(LabelVote {
                name: name.to_string(),
                count: 1,
                min_distance: distance,
            }),
        }
    }
    votes
}

/// Apply the selection policy and form the composite label.
///
/// Candidates are ranked by vote count (descending) with nearest distance
/// as tie-break; everything at or above `max(2, leader)` votes is kept.
/// When nothing clears that bar (four distinct single-vote names), the
/// nearest candidate is kept together with any others equidistant within
/// [`CREASE_EPSILON`], capped at [`MAX_CREASE_LABELS`] names. The final
/// name set is sorted alphabetically and joined with `+`, so the same
/// face combination always produces the same bucket key.
fn select_label(mut votes: SmallVec<[LabelVote; 4]>) -> String {
    if votes.is_empty() {
        return FALLBACK_LABEL.to_string();
    }

    votes.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| {
                a.min_distance
                    .partial_cmp(&b.min_distance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.name.cmp(&b.name))
    });

    let threshold = votes[0].count.max(MIN_COUNT_THRESHOLD);
    let mut selected: Vec<&str> = votes
        .iter()
        .filter(|vote| vote.count >= threshold)
        .map(|vote| vote.name.as_str())
        .collect();

    if selected.is_empty() {
        // Every candidate holds a single vote; treat the nearest ones as a
        // genuine crease between original faces.
        let nearest = votes[0].min_distance;
        selected = votes
            .iter()
            .enumerate()
            .filter(|(rank, vote)| {
                *rank == 0 || (vote.min_distance - nearest).abs() <= CREASE_EPSILON
            })
            .take(MAX_CREASE_LABELS)
            .map(|(_, vote)| vote.name.as_str())
            .collect();
    }

    selected.sort_unstable();
    selected.join("+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use shell_types::primitives::cuboid;

    fn votes(entries: &[(&str, f64)]) -> SmallVec<[LabelVote; 4]> {
        tally_votes(entries.iter().map(|(name, d)| (*name, *d)))
    }

    #[test]
    fn no_votes_falls_back() {
        assert_eq!(select_label(SmallVec::new()), FALLBACK_LABEL);
    }

    #[test]
    fn unanimous_vote_wins_alone() {
        let label = select_label(votes(&[("a", 0.5), ("a", 0.4), ("a", 0.6), ("a", 0.5)]));
        assert_eq!(label, "a");
    }

    #[test]
    fn majority_beats_split_minority() {
        let label = select_label(votes(&[("b", 0.5), ("a", 0.2), ("b", 0.4), ("c", 0.1)]));
        assert_eq!(label, "b");
    }

    #[test]
    fn even_split_fuses_both_names() {
        let label = select_label(votes(&[("b", 0.5), ("a", 0.5), ("b", 0.5), ("a", 0.5)]));
        assert_eq!(label, "a+b");
    }

    #[test]
    fn label_is_order_independent() {
        let forward = select_label(votes(&[("a", 0.5), ("b", 0.5), ("a", 0.5), ("b", 0.5)]));
        let backward = select_label(votes(&[("b", 0.5), ("a", 0.5), ("b", 0.5), ("a", 0.5)]));
        assert_eq!(forward, backward);
    }

    #[test]
    fn single_votes_with_distinct_distances_pick_nearest() {
        let label = select_label(votes(&[
            ("far", 0.9),
            ("near", 0.1),
            ("mid", 0.5),
            ("other", 0.7),
        ]));
        assert_eq!(label, "near");
    }

    #[test]
    fn single_votes_at_a_crease_fuse_up_to_three() {
        let label = select_label(votes(&[
            ("a", 0.2),
            ("b", 0.2 + 5e-5),
            ("c", 0.2 - 5e-5),
            ("d", 0.9),
        ]));
        assert_eq!(label, "a+b+c");
    }

    #[test]
    fn crease_cap_stops_at_three_names() {
        let label = select_label(votes(&[
            ("a", 0.2),
            ("b", 0.2),
            ("c", 0.2),
            ("d", 0.2),
        ]));
        let parts: Vec<&str> = label.split('+').collect();
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn tally_tracks_min_distance() {
        let tallied = votes(&[("a", 0.5), ("a", 0.2), ("a", 0.8)]);
        assert_eq!(tallied.len(), 1);
        assert_eq!(tallied[0].count, 3);
        assert!((tallied[0].min_distance - 0.2).abs() < 1e-12);
    }

    #[test]
    fn reconstruct_labels_a_face_aligned_triangle() {
        let solid = cuboid("cube", Vector3::new(2.0, 2.0, 2.0));
        let surface = SourceSurface::from_solid(&solid).unwrap();

        // One raw triangle hovering just outside the +X face.
        let raw = LevelSetMesh {
            positions: vec![
                Point3::new(1.1, -0.2, -0.2),
                Point3::new(1.1, 0.4, -0.2),
                Point3::new(1.1, 0.1, 0.4),
            ],
            triangles: vec![[0, 1, 2]],
        };

        let buckets = reconstruct_faces(&surface, &raw);
        assert_eq!(buckets.len(), 1);
        assert!(buckets.contains_key("cube_XP"));
        assert_eq!(buckets["cube_XP"].len(), 1);
    }

    #[test]
    fn reconstruct_fuses_edge_straddling_triangle() {
        let solid = cuboid("cube", Vector3::new(2.0, 2.0, 2.0));
        let surface = SourceSurface::from_solid(&solid).unwrap();

        // Two corners nearest +X, two samples nearest +Y (the centroid
        // leans with the y-side pair).
        let raw = LevelSetMesh {
            positions: vec![
                Point3::new(1.2, 0.8, 0.0),
                Point3::new(1.2, 0.9, 0.2),
                Point3::new(0.8, 1.2, 0.1),
            ],
            triangles: vec![[0, 1, 2]],
        };

        let buckets = reconstruct_faces(&surface, &raw);
        assert_eq!(buckets.len(), 1);
        let label = buckets.keys().next().unwrap();
        assert!(
            label == "cube_XP" || label == "cube_XP+cube_YP" || label == "cube_YP",
            "unexpected label {label}"
        );
    }
}
