use crate::geometry::convex_hull::cross;
use crate::geometry::primitives::Point;
use crate::merging::EdgeCandidate;
use itertools::Itertools;
//Various checks to verify correctness of the state of the system
//Used in debug_assertion!() blocks

/// Every index in `0..n` is in exactly one group
pub fn groups_partition(groups: &[Vec<usize>], n: usize) -> bool {
    let mut seen = vec![false; n];
    for &idx in groups.iter().flatten() {
        if idx >= n || seen[idx] {
            return false;
        }
        seen[idx] = true;
    }
    seen.into_iter().all(|s| s)
}

/// Both ends of every edge belong to the same group
pub fn edges_within_groups(groups: &[Vec<usize>], edges: &[EdgeCandidate]) -> bool {
    let group_of = groups
        .iter()
        .enumerate()
        .flat_map(|(g, members)| members.iter().map(move |&m| (m, g)))
        .collect::<std::collections::HashMap<_, _>>();

    edges
        .iter()
        .all(|e| group_of.get(&e.i).is_some() && group_of.get(&e.i) == group_of.get(&e.j))
}

/// No three consecutive vertices of the (cyclic) ring make a right turn
pub fn ring_is_convex(ring: &[Point]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    //tolerance relative to the extent of the ring
    let extent = ring
        .iter()
        .tuple_combinations()
        .map(|(a, b)| a.sq_distance(b))
        .fold(0.0, f64::max);
    let eps = extent * 1e-12;

    ring.iter()
        .circular_tuple_windows()
        .all(|(a, b, c)| cross(*a, *b, *c) >= -eps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_detects_missing_and_duplicate_indices() {
        assert!(groups_partition(&[vec![0, 2], vec![1]], 3));
        assert!(!groups_partition(&[vec![0, 2]], 3));
        assert!(!groups_partition(&[vec![0, 1], vec![1, 2]], 3));
        assert!(!groups_partition(&[vec![0, 1, 3]], 3));
    }

    #[test]
    fn reflex_vertex_is_not_convex() {
        let convex = vec![Point(0.0, 0.0), Point(2.0, 0.0), Point(2.0, 2.0), Point(0.0, 2.0)];
        let dented = vec![
            Point(0.0, 0.0),
            Point(2.0, 0.0),
            Point(1.0, 0.5),
            Point(2.0, 2.0),
            Point(0.0, 2.0),
        ];
        assert!(ring_is_convex(&convex));
        assert!(!ring_is_convex(&dented));
    }
}
