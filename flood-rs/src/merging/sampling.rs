use std::f64::consts::PI;

use itertools::Itertools;

use crate::geometry::primitives::{Circle, Point};
use crate::merging::BufferCircle;
use crate::util::MergeConfig;

/// Regular `n_segments`-gon approximating the boundary of `circle`, as (lon, lat) points.
pub fn circle_outline(circle: &BufferCircle, n_segments: usize) -> Vec<Point> {
    sample_angles(n_segments)
        .map(|angle| circle.boundary_point(angle, 1.0))
        .collect()
}

/// Boundary samples of all `members`, each bulging towards the other members nearby.
///
/// At every sampled angle the radius of a member is scaled by `1 + blend * blend_gain`,
/// where `blend` is the strongest `max(0, 1 - d / (max_distance + r_i + r_j))` among the other
/// members lying within the blend window around that angle.
/// Samples with non-finite coordinates are dropped.
pub fn inflated_samples(
    circles: &[BufferCircle],
    members: &[usize],
    config: &MergeConfig,
) -> Vec<Point> {
    let window = config.blend_window_deg.to_radians();

    members
        .iter()
        .flat_map(|&i| {
            let c_i = &circles[i];
            //(bearing, blend factor) of every other member
            let neighbours = members
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| {
                    let c_j = &circles[j];
                    let threshold = config.max_distance + c_i.radius + c_j.radius;
                    let blend = f64::max(0.0, 1.0 - c_i.distance(c_j) / threshold);
                    (c_i.bearing_to(c_j), blend)
                })
                .collect_vec();

            sample_angles(config.member_segments).map(move |angle| {
                let blend = neighbours
                    .iter()
                    .filter(|(bearing, _)| angular_difference(angle, *bearing) < window)
                    .map(|(_, blend)| *blend)
                    .fold(0.0, f64::max);
                c_i.boundary_point(angle, 1.0 + blend * config.blend_gain)
            })
        })
        .filter(|p| p.is_finite())
        .collect()
}

/// Approximation of the bounding circle of all `members`, used when their samples cannot form a hull.
pub fn bounding_circle_outline(
    circles: &[BufferCircle],
    members: &[usize],
    n_segments: usize,
) -> Vec<Point> {
    let reference = circles[members[0]].center;
    let local_circles = members
        .iter()
        .map(|&m| {
            let c = &circles[m];
            Circle::new(reference.local_offset_to(&c.center), c.radius)
        })
        .collect_vec();

    match Circle::bounding_circle(&local_circles) {
        Some(bounding) => bounding
            .boundary(n_segments)
            .into_iter()
            .map(|Point(east, north)| reference.offset(east, north))
            .collect(),
        None => vec![],
    }
}

/// `n` evenly spaced angles in `[0, 2π)`
fn sample_angles(n: usize) -> impl Iterator<Item = f64> + Clone {
    (0..n).map(move |k| 2.0 * PI * k as f64 / n as f64)
}

/// Smallest absolute difference between two angles, in `[0, π]`
fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(2.0 * PI);
    diff.min(2.0 * PI - diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::geodesy::Cartographic;
    use float_cmp::approx_eq;
    use test_case::test_case;

    fn circle_at(east: f64, north: f64, radius: f64) -> BufferCircle {
        let origin = Cartographic::new(102.684693, 24.987954, 1900.0);
        let Point(lon, lat) = origin.offset(east, north);
        BufferCircle::try_new(Cartographic::new(lon, lat, origin.height), radius).unwrap()
    }

    #[test_case(0.0, 0.0, 0.0)]
    #[test_case(0.1, 2.0 * PI - 0.1, 0.2)]
    #[test_case(PI, 0.0, PI)]
    #[test_case(-PI / 2.0, PI / 2.0, PI)]
    #[test_case(3.0 * PI, 0.5, PI - 0.5)]
    fn angular_differences(a: f64, b: f64, expected: f64) {
        assert!(approx_eq!(f64, angular_difference(a, b), expected, epsilon = 1e-12));
    }

    #[test]
    fn circle_outline_has_requested_resolution() {
        let c = circle_at(0.0, 0.0, 12.0);
        let outline = circle_outline(&c, 128);
        assert_eq!(outline.len(), 128);
        for Point(lon, lat) in outline {
            let p = Cartographic::new(lon, lat, c.height());
            assert!(approx_eq!(f64, c.center.distance(&p), 12.0, epsilon = 1e-3));
        }
    }

    #[test]
    fn samples_bulge_towards_neighbour_only() {
        let circles = vec![circle_at(0.0, 0.0, 10.0), circle_at(20.0, 0.0, 10.0)];
        let config = MergeConfig::default();
        let samples = inflated_samples(&circles, &[0, 1], &config);
        assert_eq!(samples.len(), 2 * config.member_segments);

        let a = &circles[0];
        let dist = |p: &Point| a.center.distance(&Cartographic::new(p.0, p.1, a.height()));
        //first sample of member 0 points east, straight at member 1
        let blend = 1.0 - 20.0 / (25.0 + 20.0);
        assert!(approx_eq!(f64, dist(&samples[0]), 10.0 * (1.0 + blend * 0.5), epsilon = 1e-3));
        //opposite direction is not inflated
        let west = config.member_segments / 2;
        assert!(approx_eq!(f64, dist(&samples[west]), 10.0, epsilon = 1e-3));
    }

    #[test]
    fn bounding_outline_encloses_members() {
        let circles = vec![circle_at(0.0, 0.0, 5.0), circle_at(30.0, 0.0, 5.0)];
        let outline = bounding_circle_outline(&circles, &[0, 1], 64);
        assert_eq!(outline.len(), 64);
        let center = circle_at(15.0, 0.0, 1.0).center;
        for Point(lon, lat) in outline {
            let d = center.distance(&Cartographic::new(lon, lat, center.height));
            assert!(approx_eq!(f64, d, 20.0, epsilon = 1e-2));
        }
    }
}
