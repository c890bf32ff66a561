use serde::{Deserialize, Serialize};

use crate::geometry::primitives::Point;

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Earth-centered, earth-fixed cartesian coordinates in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Ecef {
    pub fn distance(&self, other: &Ecef) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }
}

/// Geodetic position: longitude and latitude in degrees, height above the ellipsoid in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cartographic {
    pub lon: f64,
    pub lat: f64,
    pub height: f64,
}

impl Cartographic {
    pub fn new(lon: f64, lat: f64, height: f64) -> Self {
        Self { lon, lat, height }
    }

    pub fn to_ecef(&self) -> Ecef {
        let (lat, lon) = (self.lat.to_radians(), self.lon.to_radians());
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();

        let n = prime_vertical_radius(sin_lat);
        Ecef {
            x: (n + self.height) * cos_lat * cos_lon,
            y: (n + self.height) * cos_lat * sin_lon,
            z: (n * (1.0 - WGS84_E2) + self.height) * sin_lat,
        }
    }

    /// Straight-line (chord) distance in meters between both positions.
    pub fn distance(&self, other: &Cartographic) -> f64 {
        self.to_ecef().distance(&other.to_ecef())
    }

    /// Horizontal part of the position, as (lon, lat) degrees.
    pub fn lonlat(&self) -> Point {
        Point(self.lon, self.lat)
    }

    /// (lon, lat) of the point `east` and `north` meters away in the local tangent plane.
    pub fn offset(&self, east: f64, north: f64) -> Point {
        let (m_lon, m_lat) = meters_per_degree(self.lat, self.height);
        Point(self.lon + east / m_lon, self.lat + north / m_lat)
    }

    /// (east, north) meters of `other` in the local tangent plane of `self`.
    pub fn local_offset_to(&self, other: &Cartographic) -> Point {
        let (m_lon, m_lat) = meters_per_degree(self.lat, self.height);
        Point((other.lon - self.lon) * m_lon, (other.lat - self.lat) * m_lat)
    }
}

/// Meters spanned by one degree of (longitude, latitude) at latitude `lat` (degrees) and `height` (meters).
pub fn meters_per_degree(lat: f64, height: f64) -> (f64, f64) {
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let n = prime_vertical_radius(sin_lat);
    let m = n * (1.0 - WGS84_E2) / (1.0 - WGS84_E2 * sin_lat * sin_lat);
    let rad = std::f64::consts::PI / 180.0;
    ((n + height) * cos_lat * rad, (m + height) * rad)
}

fn prime_vertical_radius(sin_lat: f64) -> f64 {
    WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt()
}
