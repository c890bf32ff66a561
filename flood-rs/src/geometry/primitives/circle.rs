use std::f64::consts::PI;

use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::{Point, Rect};

/// Geometric primitive representing a circle in a planar (local meter) frame
#[derive(Clone, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        debug_assert!(
            radius.is_finite() && radius >= 0.0,
            "invalid circle radius: {radius}"
        );
        debug_assert!(center.is_finite(), "invalid circle center: {center:?}");

        Self { center, radius }
    }

    /// Returns a circle that fully contains all `circles`.
    /// Not necessarily the smallest one, the result depends on the iteration order.
    pub fn bounding_circle<'a>(circles: impl IntoIterator<Item = &'a Circle>) -> Option<Circle> {
        let mut circles = circles.into_iter();
        let mut bounding_circle = circles.next()?.clone();

        for circle in circles {
            let d = bounding_circle.center.distance(&circle.center);
            if circle.radius >= d + bounding_circle.radius {
                // circle swallows the current bounding circle
                bounding_circle = circle.clone();
            } else if bounding_circle.radius < d + circle.radius {
                // expand along the line through both centers
                let (ux, uy) = (
                    (circle.center.0 - bounding_circle.center.0) / d,
                    (circle.center.1 - bounding_circle.center.1) / d,
                );
                let start = Point(
                    bounding_circle.center.0 - ux * bounding_circle.radius,
                    bounding_circle.center.1 - uy * bounding_circle.radius,
                );
                let end = Point(
                    circle.center.0 + ux * circle.radius,
                    circle.center.1 + uy * circle.radius,
                );
                let new_center = Point((start.0 + end.0) / 2.0, (start.1 + end.1) / 2.0);
                bounding_circle = Circle::new(new_center, start.distance(&end) / 2.0);
            }
        }
        Some(bounding_circle)
    }

    /// Point on the boundary at `angle` radians, measured counterclockwise from the positive x-axis.
    pub fn boundary_point(&self, angle: f64) -> Point {
        Point(
            self.center.0 + self.radius * angle.cos(),
            self.center.1 + self.radius * angle.sin(),
        )
    }

    /// Regular `n_segments`-gon inscribed in the circle, counterclockwise, starting at angle 0.
    pub fn boundary(&self, n_segments: usize) -> Vec<Point> {
        (0..n_segments)
            .map(|i| self.boundary_point(2.0 * PI * i as f64 / n_segments as f64))
            .collect()
    }
}

impl Shape for Circle {
    fn centroid(&self) -> Point {
        self.center
    }

    fn area(&self) -> f64 {
        self.radius * self.radius * PI
    }

    fn bbox(&self) -> Rect {
        let (r, x, y) = (self.radius, self.center.0, self.center.1);
        Rect {
            x_min: x - r,
            y_min: y - r,
            x_max: x + r,
            y_max: y + r,
        }
    }
}
