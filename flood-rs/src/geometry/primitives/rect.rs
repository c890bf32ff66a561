use crate::geometry::primitives::Point;
use anyhow::{Result, ensure};

///Axis-aligned rectangle
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    pub fn try_new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self> {
        ensure!(
            x_min <= x_max && y_min <= y_max,
            "invalid rectangle, x_min: {x_min}, x_max: {x_max}, y_min: {y_min}, y_max: {y_max}"
        );
        Ok(Rect {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Smallest rectangle containing all `points`, `None` if there are none.
    pub fn bounding(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let init = Rect {
            x_min: first.0,
            y_min: first.1,
            x_max: first.0,
            y_max: first.1,
        };
        Some(points.fold(init, |r, p| Rect {
            x_min: r.x_min.min(p.0),
            y_min: r.y_min.min(p.1),
            x_max: r.x_max.max(p.0),
            y_max: r.y_max.max(p.1),
        }))
    }

    /// Grows (or shrinks) the rectangle around its centroid by `factor`.
    pub fn scale(mut self, factor: f64) -> Self {
        let dx = (self.x_max - self.x_min) * (factor - 1.0) / 2.0;
        let dy = (self.y_max - self.y_min) * (factor - 1.0) / 2.0;
        self.x_min -= dx;
        self.y_min -= dy;
        self.x_max += dx;
        self.y_max += dy;
        self
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn centroid(&self) -> Point {
        Point(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_rect_of_points() {
        let r = Rect::bounding([Point(1.0, 2.0), Point(-1.0, 5.0), Point(3.0, 0.0)]).unwrap();
        assert_eq!(r, Rect::try_new(-1.0, 0.0, 3.0, 5.0).unwrap());
        assert!(Rect::bounding(std::iter::empty()).is_none());
    }

    #[test]
    fn scale_keeps_centroid() {
        let r = Rect::try_new(0.0, 0.0, 10.0, 4.0).unwrap().scale(1.5);
        assert_eq!(r.centroid(), Point(5.0, 2.0));
        assert_eq!(r.width(), 15.0);
        assert_eq!(r.height(), 6.0);
    }

    #[test]
    fn inverted_rect_is_rejected() {
        assert!(Rect::try_new(1.0, 0.0, 0.0, 1.0).is_err());
    }
}
