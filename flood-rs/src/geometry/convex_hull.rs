use crate::geometry::primitives::Point;
use itertools::Itertools;
use ordered_float::OrderedFloat;

/// Convex hull of a set of points, computed with a Graham scan.
///
/// Returns the hull vertices in counterclockwise order, starting at the lowest (then leftmost) point.
/// Collinear points on the hull boundary are dropped.
/// Fewer than 3 vertices are returned when the points are all coincident or collinear.
pub fn convex_hull_from_points(points: Vec<Point>) -> Vec<Point> {
    //https://en.wikipedia.org/wiki/Graham_scan
    let mut points = points
        .into_iter()
        .filter(|p| p.is_finite())
        .unique()
        .collect_vec();

    let Some(pivot_idx) = points
        .iter()
        .position_min_by_key(|p| (OrderedFloat(p.1), OrderedFloat(p.0)))
    else {
        return vec![];
    };
    let pivot = points.swap_remove(pivot_idx);

    //sort the remaining points by polar angle around the pivot, ties by distance to the pivot
    points.sort_by(|a, b| {
        polar_angle(pivot, *a)
            .cmp(&polar_angle(pivot, *b))
            .then_with(|| OrderedFloat(pivot.sq_distance(a)).cmp(&OrderedFloat(pivot.sq_distance(b))))
    });

    points
        .into_iter()
        .fold(vec![pivot], |hull, p| grow_convex_hull(hull, p))
}

fn grow_convex_hull(mut h: Vec<Point>, next: Point) -> Vec<Point> {
    //pop all points from the hull which do not make a strict left turn with the new point
    while h.len() >= 2 && cross(h[h.len() - 2], h[h.len() - 1], next) <= 0.0 {
        h.pop();
    }
    h.push(next);
    h
}

fn polar_angle(pivot: Point, p: Point) -> OrderedFloat<f64> {
    OrderedFloat((p.1 - pivot.1).atan2(p.0 - pivot.0))
}

/// Z-component of the cross product of `ab` and `ac`.
/// Positive for a left (counterclockwise) turn, negative for a right turn, zero if collinear.
pub fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}
