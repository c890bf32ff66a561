use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use svg::node::element::path::Data;
use svg::node::element::{Circle, Path};

use crate::geometry::geodesy::meters_per_degree;
use crate::geometry::primitives::{Point, Rect};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Copy)]
#[serde(default)]
pub struct SvgDrawOptions {
    ///The theme to use for the svg
    pub theme: SvgMapTheme,
    ///Draw a dot at the center of every buffer circle
    pub sensors: bool,
    ///Draw the original buffer circles underneath the merged outlines
    pub buffer_circles: bool,
    ///Draw a legend of the depth grades
    pub legend: bool,
}

impl Default for SvgDrawOptions {
    fn default() -> Self {
        Self {
            theme: SvgMapTheme::default(),
            sensors: true,
            buffer_circles: false,
            legend: true,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Copy)]
pub struct SvgMapTheme {
    pub stroke_width_multiplier: f32,
    pub background_fill: Color,
    pub hull_fill: Color,
    pub circle_fill: Color,
    ///Stroke of the (optional) buffer circles
    pub buffer_stroke: Color,
    pub fill_opacity: f32,
    ///Color of sensors without a known depth
    pub sensor_fill: Color,
}

impl Default for SvgMapTheme {
    fn default() -> Self {
        SvgMapTheme::WATER
    }
}

impl SvgMapTheme {
    pub const WATER: SvgMapTheme = SvgMapTheme {
        stroke_width_multiplier: 2.0,
        background_fill: Color(0xF4, 0xF1, 0xEA),
        hull_fill: Color(0x3A, 0x7B, 0xD5),
        circle_fill: Color(0x7F, 0xB3, 0xEB),
        buffer_stroke: Color(0x1F, 0x3F, 0x7A),
        fill_opacity: 0.5,
        sensor_fill: Color(0x2D, 0x2D, 0x2D),
    };

    pub const GRAY: SvgMapTheme = SvgMapTheme {
        stroke_width_multiplier: 2.5,
        background_fill: Color(0xFF, 0xFF, 0xFF),
        hull_fill: Color(0x7A, 0x7A, 0x7A),
        circle_fill: Color(0xD3, 0xD3, 0xD3),
        buffer_stroke: Color(0x2D, 0x2D, 0x2D),
        fill_opacity: 0.6,
        sensor_fill: Color(0x00, 0x00, 0x00),
    };
}

pub fn change_brightness(color: Color, fraction: f32) -> Color {
    let Color(r, g, b) = color;

    let r = (r as f32 * fraction) as u8;
    let g = (g as f32 * fraction) as u8;
    let b = (b as f32 * fraction) as u8;
    Color(r, g, b)
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Color(pub u8, pub u8, pub u8);

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            bail!("invalid color: {s}, expected #RRGGBB");
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).with_context(|| format!("invalid color: {s}"))
        };
        Ok(Color(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Equirectangular projection of (lon, lat) onto a local frame in meters, with north pointing up (negative y).
#[derive(Clone, Copy, Debug)]
pub struct MapFrame {
    pub origin: Point,
    m_per_deg_lon: f64,
    m_per_deg_lat: f64,
}

impl MapFrame {
    /// Frame centered on the given (lon, lat) bounding box
    pub fn centered_on(bbox: &Rect) -> Self {
        let origin = bbox.centroid();
        let (m_per_deg_lon, m_per_deg_lat) = meters_per_degree(origin.y(), 0.0);
        Self {
            origin,
            m_per_deg_lon,
            m_per_deg_lat,
        }
    }

    pub fn project(&self, Point(lon, lat): Point) -> Point {
        Point(
            (lon - self.origin.x()) * self.m_per_deg_lon,
            -(lat - self.origin.y()) * self.m_per_deg_lat,
        )
    }
}

pub fn ring_data(ring: impl IntoIterator<Item = Point>) -> Data {
    let mut data = Data::new();
    for (i, Point(x, y)) in ring.into_iter().enumerate() {
        let p = (x as f32, y as f32);
        data = match i {
            0 => data.move_to(p),
            _ => data.line_to(p),
        };
    }
    data.close()
}

pub fn data_to_path(data: Data, params: &[(&str, &str)]) -> Path {
    let mut path = Path::new();
    for param in params {
        path = path.set(param.0, param.1)
    }
    path.set("d", data)
}

pub fn point(Point(x, y): Point, fill: Option<&str>, rad: Option<f32>) -> Circle {
    Circle::new()
        .set("cx", x as f32)
        .set("cy", y as f32)
        .set("r", rad.unwrap_or(0.5))
        .set("fill", fill.unwrap_or("black"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use test_case::test_case;

    #[test]
    fn partial_draw_options_keep_defaults() {
        let options: SvgDrawOptions = serde_json::from_str(r#"{ "buffer_circles": true }"#).unwrap();
        assert!(options.buffer_circles);
        assert!(options.sensors);
        assert!(options.legend);
        assert_eq!(options.theme, SvgMapTheme::WATER);
    }

    #[test_case("#FF8000", Color(0xFF, 0x80, 0x00))]
    #[test_case("3a7bd5", Color(0x3A, 0x7B, 0xD5))]
    fn color_parsing(s: &str, expected: Color) {
        assert_eq!(s.parse::<Color>().unwrap(), expected);
    }

    #[test_case("#FFF"; "too short")]
    #[test_case("#GG0000"; "not hex")]
    #[test_case("#ÿÿÿ"; "non ascii")]
    fn invalid_colors(s: &str) {
        assert!(s.parse::<Color>().is_err());
    }

    #[test]
    fn color_serde_uses_hex_strings() {
        let json = serde_json::to_string(&Color(0x1F, 0x3F, 0x7A)).unwrap();
        assert_eq!(json, "\"#1F3F7A\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color(0x1F, 0x3F, 0x7A));
    }

    #[test]
    fn draw_options_fill_in_defaults() {
        let options: SvgDrawOptions = serde_json::from_str(r#"{"legend": true}"#).unwrap();
        assert_eq!(options.theme, SvgMapTheme::WATER);
        assert!(!options.sensors);
    }

    #[test]
    fn map_frame_points_north_up() {
        let bbox = Rect::try_new(102.0, 24.0, 103.0, 25.0).unwrap();
        let frame = MapFrame::centered_on(&bbox);
        let Point(x, y) = frame.project(bbox.centroid());
        assert!(approx_eq!(f64, x, 0.0) && approx_eq!(f64, y, 0.0));

        let Point(x, y) = frame.project(Point(102.5, 24.6));
        assert!(approx_eq!(f64, x, 0.0));
        //north of the origin ends up above it
        assert!(y < -10_000.0);

        let Point(x, _) = frame.project(Point(102.6, 24.5));
        assert!(x > 10_000.0);
    }
}
