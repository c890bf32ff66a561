use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::io::svg::svg_util::Color;

/// Grade of the water depth at a sensor point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthGrade {
    /// Below 1 meter
    Shallow,
    /// Between 1 and 2 meters (inclusive)
    Moderate,
    /// Above 2 meters
    Deep,
}

impl DepthGrade {
    pub const ALL: [DepthGrade; 3] = [DepthGrade::Shallow, DepthGrade::Moderate, DepthGrade::Deep];

    /// `None` for non-finite depths
    pub fn from_depth(depth: f64) -> Option<Self> {
        match depth {
            d if !d.is_finite() => None,
            d if d < 1.0 => Some(DepthGrade::Shallow),
            d if d <= 2.0 => Some(DepthGrade::Moderate),
            _ => Some(DepthGrade::Deep),
        }
    }

    /// Legend label
    pub fn label(&self) -> &'static str {
        match self {
            DepthGrade::Shallow => "< 1 m",
            DepthGrade::Moderate => "1 - 2 m",
            DepthGrade::Deep => "> 2 m",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            DepthGrade::Shallow => Color(0x00, 0x80, 0x00), // GREEN
            DepthGrade::Moderate => Color(0x00, 0x00, 0xFF), // BLUE
            DepthGrade::Deep => Color(0xFF, 0x00, 0x00),     // RED
        }
    }
}

impl Display for DepthGrade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
