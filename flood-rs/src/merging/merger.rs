use itertools::Itertools;
use log::{debug, warn};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::geometry::convex_hull::convex_hull_from_points;
use crate::geometry::primitives::Outline;
use crate::merging::sampling::{bounding_circle_outline, circle_outline, inflated_samples};
use crate::merging::{BufferCircle, DisjointSet};
use crate::util::{MergeConfig, assertions};

/// Pair of circles close enough to belong to the same group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeCandidate {
    pub i: usize,
    pub j: usize,
    /// Center-to-center distance in meters
    pub distance: f64,
}

/// How the outline of a group was constructed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineKind {
    /// Regular polygon approximating a single circle
    Circle,
    /// Convex hull of the inflated boundary samples of all members
    Hull,
}

/// Connected group of buffer circles together with its merged footprint.
#[derive(Clone, Debug)]
pub struct MergedGroup {
    /// Indices of the member circles, ascending
    pub members: Vec<usize>,
    pub outline: Outline,
    /// Mean height of the members, raised by the configured clearance
    pub height: f64,
    pub kind: OutlineKind,
}

#[derive(Clone, Debug)]
pub struct MergeResult {
    /// Groups, ordered by their smallest member
    pub groups: Vec<MergedGroup>,
    pub n_circles: usize,
    pub n_edges: usize,
}

impl MergeResult {
    /// Index of the group containing circle `idx`
    pub fn group_of(&self, idx: usize) -> Option<usize> {
        self.groups.iter().position(|g| g.members.contains(&idx))
    }

    pub fn partition(&self) -> Vec<Vec<usize>> {
        self.groups.iter().map(|g| g.members.clone()).collect()
    }
}

/// Groups overlapping (or nearly overlapping) buffer circles and outlines every group.
///
/// Stateless apart from its configuration: every call recomputes everything from the given circles.
#[derive(Clone, Copy, Debug, Default)]
pub struct FloodBufferMerger {
    pub config: MergeConfig,
}

impl FloodBufferMerger {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    /// Clusters the circles transitively and outlines each cluster.
    pub fn merge(&self, circles: &[BufferCircle]) -> MergeResult {
        let edges = self.edge_candidates(circles);

        let mut disjoint_set = DisjointSet::new(circles.len());
        for edge in edges.iter() {
            disjoint_set.union(edge.i, edge.j);
        }
        let groups = disjoint_set.groups();

        debug_assert!(assertions::groups_partition(&groups, circles.len()));
        debug_assert!(assertions::edges_within_groups(&groups, &edges));

        debug!(
            "[MERGE] {} circles, {} edges, {} groups ({} merged)",
            circles.len(),
            edges.len(),
            groups.len(),
            groups.iter().filter(|g| g.len() > 1).count()
        );

        MergeResult {
            groups: groups
                .into_iter()
                .map(|members| self.outline_group(circles, members))
                .collect(),
            n_circles: circles.len(),
            n_edges: edges.len(),
        }
    }

    /// Outlines every circle on its own, without any merging.
    pub fn point_buffers(&self, circles: &[BufferCircle]) -> MergeResult {
        MergeResult {
            groups: (0..circles.len())
                .map(|i| self.outline_group(circles, vec![i]))
                .collect(),
            n_circles: circles.len(),
            n_edges: 0,
        }
    }

    /// All pairs of circles whose centers lie within `max_distance + r_i + r_j` of each other,
    /// sorted by distance.
    pub fn edge_candidates(&self, circles: &[BufferCircle]) -> Vec<EdgeCandidate> {
        let mut edges = (0..circles.len())
            .tuple_combinations()
            .filter_map(|(i, j)| {
                let (c_i, c_j) = (&circles[i], &circles[j]);
                let distance = c_i.distance(c_j);
                let threshold = self.config.max_distance + c_i.radius + c_j.radius;
                (distance <= threshold).then_some(EdgeCandidate { i, j, distance })
            })
            .collect_vec();

        //grouping does not depend on this order, it only makes the edge list deterministic
        edges.sort_by_key(|e| (OrderedFloat(e.distance), e.i, e.j));
        edges
    }

    fn outline_group(&self, circles: &[BufferCircle], members: Vec<usize>) -> MergedGroup {
        let height = members.iter().map(|&m| circles[m].height()).sum::<f64>()
            / members.len() as f64
            + self.config.height_clearance;

        let (vertices, kind) = match members.as_slice() {
            [single] => (
                circle_outline(&circles[*single], self.config.singleton_segments),
                OutlineKind::Circle,
            ),
            _ => {
                let samples = inflated_samples(circles, &members, &self.config);
                let hull = convex_hull_from_points(samples);
                if hull.len() >= 3 {
                    debug_assert!(assertions::ring_is_convex(&hull));
                    (hull, OutlineKind::Hull)
                } else {
                    warn!(
                        "[MERGE] group {:?} yields a degenerate hull ({} vertices), falling back to its bounding circle",
                        members,
                        hull.len()
                    );
                    (
                        bounding_circle_outline(circles, &members, self.config.singleton_segments),
                        OutlineKind::Circle,
                    )
                }
            }
        };

        MergedGroup {
            members,
            outline: Outline::new(vertices),
            height,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::geo_traits::Shape;
    use crate::geometry::geodesy::Cartographic;
    use crate::geometry::primitives::Point;
    use float_cmp::approx_eq;
    use rand::prelude::SmallRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use test_case::test_case;

    const ORIGIN: Cartographic = Cartographic {
        lon: 102.684693,
        lat: 24.987954,
        height: 1900.0,
    };

    fn circle_at(east: f64, north: f64, radius: f64) -> BufferCircle {
        let Point(lon, lat) = ORIGIN.offset(east, north);
        BufferCircle::try_new(Cartographic::new(lon, lat, ORIGIN.height), radius).unwrap()
    }

    fn init_logger() {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    fn group_sizes(result: &MergeResult) -> Vec<usize> {
        result.groups.iter().map(|g| g.members.len()).sorted().collect()
    }

    #[test]
    fn close_pair_merges_and_far_circle_stays_isolated() {
        init_logger();
        let circles = vec![
            circle_at(0.0, 0.0, 8.0),
            circle_at(10.0, 0.0, 10.0),
            circle_at(0.0, 200.0, 5.0),
        ];
        let result = FloodBufferMerger::default().merge(&circles);

        assert_eq!(result.groups.len(), 2);
        assert_eq!(group_sizes(&result), vec![1, 2]);
        assert_eq!(result.partition(), vec![vec![0, 1], vec![2]]);
        assert_eq!(result.group_of(1), Some(0));
        assert_eq!(result.group_of(2), Some(1));
        assert_eq!(result.group_of(3), None);
        assert_eq!(result.n_edges, 1);
        assert_eq!(result.groups[0].kind, OutlineKind::Hull);
        assert_eq!(result.groups[1].kind, OutlineKind::Circle);
    }

    #[test]
    fn chain_only_merges_satisfying_pairs() {
        let circles = vec![
            circle_at(0.0, 0.0, 5.0),
            circle_at(30.0, 0.0, 5.0),
            circle_at(90.0, 0.0, 5.0),
        ];
        let result = FloodBufferMerger::default().merge(&circles);
        assert_eq!(result.partition(), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn chain_merges_transitively() {
        //A-B and B-C pass the threshold (35), A-C (60) does not
        let circles = vec![
            circle_at(0.0, 0.0, 5.0),
            circle_at(30.0, 0.0, 5.0),
            circle_at(60.0, 0.0, 5.0),
        ];
        let merger = FloodBufferMerger::default();
        assert_eq!(merger.edge_candidates(&circles).len(), 2);
        assert_eq!(merger.merge(&circles).partition(), vec![vec![0, 1, 2]]);
    }

    #[test_case(128; "default resolution")]
    #[test_case(12; "coarse resolution")]
    fn isolated_circle_yields_regular_polygon(n_segments: usize) {
        let config = MergeConfig {
            singleton_segments: n_segments,
            ..MergeConfig::default()
        };
        let circle = circle_at(0.0, 0.0, 15.0);
        let result = FloodBufferMerger::new(config).merge(&[circle]);

        let group = &result.groups[0];
        assert_eq!(group.kind, OutlineKind::Circle);
        assert_eq!(group.members, vec![0]);
        assert_eq!(group.outline.n_vertices(), n_segments);
        for p in group.outline.vertices.iter() {
            let d = circle.center.distance(&Cartographic::new(p.0, p.1, circle.height()));
            assert!(approx_eq!(f64, d, 15.0, epsilon = 1e-3));
        }
        assert!(approx_eq!(f64, group.height, 1900.5, epsilon = 1e-9));
    }

    #[test]
    fn merged_outline_is_convex_and_covers_member_centers() {
        let circles = vec![
            circle_at(0.0, 0.0, 10.0),
            circle_at(25.0, 5.0, 8.0),
            circle_at(10.0, 30.0, 12.0),
            circle_at(-15.0, 20.0, 6.0),
        ];
        let result = FloodBufferMerger::default().merge(&circles);
        assert_eq!(result.groups.len(), 1);

        let outline = &result.groups[0].outline;
        assert!(assertions::ring_is_convex(&outline.vertices));
        assert!(outline.area() > 0.0);
        for c in circles.iter() {
            let center = c.center.lonlat();
            assert!(outline.edge_iter().all(|(a, b)| {
                crate::geometry::convex_hull::cross(a, b, center) > 0.0
            }));
        }
    }

    #[test]
    fn too_few_member_samples_fall_back_to_bounding_circle() {
        init_logger();
        let config = MergeConfig {
            member_segments: 1,
            singleton_segments: 16,
            ..MergeConfig::default()
        };
        let circles = vec![circle_at(0.0, 0.0, 10.0), circle_at(10.0, 0.0, 10.0)];
        let result = FloodBufferMerger::new(config).merge(&circles);

        assert_eq!(result.groups.len(), 1);
        let group = &result.groups[0];
        assert_eq!(group.kind, OutlineKind::Circle);
        assert_eq!(group.members, vec![0, 1]);
        assert_eq!(group.outline.n_vertices(), 16);
        for c in circles.iter() {
            let center = c.center.lonlat();
            assert!(group.outline.edge_iter().all(|(a, b)| {
                crate::geometry::convex_hull::cross(a, b, center) > 0.0
            }));
        }
    }

    #[test]
    fn group_height_is_mean_plus_clearance() {
        let mut circles = vec![circle_at(0.0, 0.0, 10.0), circle_at(12.0, 0.0, 10.0)];
        circles[0].center.height = 10.0;
        circles[1].center.height = 20.0;
        let config = MergeConfig {
            height_clearance: 2.0,
            ..MergeConfig::default()
        };
        let result = FloodBufferMerger::new(config).merge(&circles);
        assert!(approx_eq!(f64, result.groups[0].height, 17.0, epsilon = 1e-9));
    }

    #[test]
    fn point_buffers_never_merge() {
        let circles = vec![circle_at(0.0, 0.0, 10.0), circle_at(5.0, 0.0, 10.0)];
        let result = FloodBufferMerger::default().point_buffers(&circles);
        assert_eq!(result.partition(), vec![vec![0], vec![1]]);
        assert!(result.groups.iter().all(|g| g.kind == OutlineKind::Circle));
    }

    #[test]
    fn empty_input() {
        let result = FloodBufferMerger::default().merge(&[]);
        assert!(result.groups.is_empty());
        assert_eq!(result.n_edges, 0);
    }

    #[test]
    fn random_sets_partition_and_respect_edges() {
        let mut rng = SmallRng::seed_from_u64(0);
        let merger = FloodBufferMerger::default();
        for _ in 0..20 {
            let circles = (0..40)
                .map(|_| {
                    circle_at(
                        rng.random_range(-300.0..300.0),
                        rng.random_range(-300.0..300.0),
                        rng.random_range(2.0..20.0),
                    )
                })
                .collect_vec();
            let result = merger.merge(&circles);
            let partition = result.partition();
            assert!(assertions::groups_partition(&partition, circles.len()));
            assert!(assertions::edges_within_groups(
                &partition,
                &merger.edge_candidates(&circles)
            ));
            for g in result.groups.iter().filter(|g| g.kind == OutlineKind::Hull) {
                assert!(assertions::ring_is_convex(&g.outline.vertices));
            }
        }
    }

    #[test]
    fn partition_is_independent_of_input_order() {
        let mut rng = SmallRng::seed_from_u64(1);
        let merger = FloodBufferMerger::default();
        let circles = (0..30)
            .map(|_| {
                circle_at(
                    rng.random_range(-200.0..200.0),
                    rng.random_range(-200.0..200.0),
                    rng.random_range(2.0..15.0),
                )
            })
            .collect_vec();

        let original = merger.merge(&circles);
        //rerunning on the same input is idempotent
        assert_eq!(original.partition(), merger.merge(&circles).partition());

        let mut permutation = (0..circles.len()).collect_vec();
        permutation.shuffle(&mut rng);
        let shuffled = permutation.iter().map(|&i| circles[i]).collect_vec();
        let result = merger.merge(&shuffled);

        //map the shuffled groups back to the original indices
        let mut remapped = result
            .partition()
            .into_iter()
            .map(|g| g.into_iter().map(|i| permutation[i]).sorted().collect_vec())
            .collect_vec();
        remapped.sort();
        let mut expected = original.partition();
        expected.sort();
        assert_eq!(remapped, expected);
    }
}
