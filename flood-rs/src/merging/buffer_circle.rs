use anyhow::{Result, ensure};

use crate::geometry::geodesy::Cartographic;
use crate::geometry::primitives::Point;

/// Buffer disk around a sensor point, representing an estimate of the flooded extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferCircle {
    /// Position of the sensor point, its height doubles as the height of the circle
    pub center: Cartographic,
    /// Radius in meters
    pub radius: f64,
}

impl BufferCircle {
    pub fn try_new(center: Cartographic, radius: f64) -> Result<Self> {
        let Cartographic { lon, lat, height } = center;
        ensure!(
            lon.is_finite() && (-180.0..=180.0).contains(&lon),
            "invalid longitude: {lon}"
        );
        ensure!(
            lat.is_finite() && lat.abs() < 90.0,
            "invalid latitude: {lat}"
        );
        ensure!(height.is_finite(), "invalid height: {height}");
        ensure!(
            radius.is_finite() && radius > 0.0,
            "invalid buffer radius: {radius}"
        );
        Ok(Self { center, radius })
    }

    pub fn height(&self) -> f64 {
        self.center.height
    }

    /// Center-to-center distance in meters
    pub fn distance(&self, other: &BufferCircle) -> f64 {
        self.center.distance(&other.center)
    }

    /// Direction (radians, counterclockwise from east) in which `other` lies, seen from `self`.
    pub fn bearing_to(&self, other: &BufferCircle) -> f64 {
        let Point(east, north) = self.center.local_offset_to(&other.center);
        north.atan2(east)
    }

    /// (lon, lat) of the boundary point at `angle` radians (counterclockwise from east),
    /// with the radius scaled by `scale`.
    pub fn boundary_point(&self, angle: f64, scale: f64) -> Point {
        let r = self.radius * scale;
        self.center.offset(r * angle.cos(), r * angle.sin())
    }
}
