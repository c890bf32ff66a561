pub mod convex_hull;

pub mod geo_traits;
pub mod geodesy;
pub mod primitives;
