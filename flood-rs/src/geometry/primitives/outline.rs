use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::{Point, Rect};

/// Ring of vertices describing the merged footprint of a group of buffer circles.
///
/// Vertices are ordered counterclockwise and the ring is open: the first vertex is not repeated at the end.
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    pub vertices: Vec<Point>,
}

impl Outline {
    /// Creates a new outline, reversing the vertices if they were ordered clockwise.
    pub fn new(mut vertices: Vec<Point>) -> Self {
        debug_assert!(vertices.len() >= 3, "outline needs at least 3 vertices");
        if Outline::calculate_signed_area(&vertices) < 0.0 {
            vertices.reverse();
        }
        Outline { vertices }
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_iter(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Vertices as a closed ring (first vertex repeated at the end), as required by GeoJSON.
    pub fn closed_ring(&self) -> Vec<[f64; 2]> {
        self.vertices
            .iter()
            .chain(self.vertices.first())
            .map(|&p| p.into())
            .collect()
    }

    //https://en.wikipedia.org/wiki/Shoelace_formula
    //counterclockwise = positive area, clockwise = negative area
    pub fn calculate_signed_area(points: &[Point]) -> f64 {
        let n = points.len();
        let sigma: f64 = (0..n)
            .map(|i| {
                let j = (i + 1) % n;
                points[i].0 * points[j].1 - points[j].0 * points[i].1
            })
            .sum();
        sigma / 2.0
    }
}

impl Shape for Outline {
    fn centroid(&self) -> Point {
        //based on: https://en.wikipedia.org/wiki/Centroid#Of_a_polygon
        let area = Outline::calculate_signed_area(&self.vertices);
        if area == 0.0 {
            let n = self.vertices.len() as f64;
            let (sx, sy) = self
                .vertices
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.0, sy + p.1));
            return Point(sx / n, sy / n);
        }
        let (cx, cy) = self.edge_iter().fold((0.0, 0.0), |(cx, cy), (p1, p2)| {
            let cross = p1.0 * p2.1 - p2.0 * p1.1;
            (cx + (p1.0 + p2.0) * cross, cy + (p1.1 + p2.1) * cross)
        });
        Point(cx / (6.0 * area), cy / (6.0 * area))
    }

    fn area(&self) -> f64 {
        Outline::calculate_signed_area(&self.vertices).abs()
    }

    fn bbox(&self) -> Rect {
        Rect::bounding(self.vertices.iter().copied()).expect("outline without vertices")
    }
}

#[cfg(feature = "geo-types")]
impl From<&Outline> for geo_types::Polygon<f64> {
    fn from(outline: &Outline) -> Self {
        let exterior: geo_types::LineString<f64> = outline
            .vertices
            .iter()
            .map(|p| geo_types::Coord { x: p.0, y: p.1 })
            .collect();
        geo_types::Polygon::new(exterior, vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn unit_square_cw() -> Vec<Point> {
        vec![
            Point(0.0, 0.0),
            Point(0.0, 1.0),
            Point(1.0, 1.0),
            Point(1.0, 0.0),
        ]
    }

    #[test]
    fn clockwise_input_is_reversed() {
        let outline = Outline::new(unit_square_cw());
        assert!(Outline::calculate_signed_area(&outline.vertices) > 0.0);
        assert!(approx_eq!(f64, outline.area(), 1.0));
    }

    #[test]
    fn centroid_of_square() {
        let outline = Outline::new(unit_square_cw());
        let c = outline.centroid();
        assert!(approx_eq!(f64, c.0, 0.5) && approx_eq!(f64, c.1, 0.5));
    }

    #[test]
    fn closed_ring_repeats_first_vertex() {
        let outline = Outline::new(unit_square_cw());
        let ring = outline.closed_ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[cfg(feature = "geo-types")]
    #[test]
    fn converts_into_closed_polygon() {
        let outline = Outline::new(unit_square_cw());
        let polygon = geo_types::Polygon::from(&outline);
        assert_eq!(polygon.exterior().0.len(), 5);
        assert!(polygon.interiors().is_empty());
    }
}
