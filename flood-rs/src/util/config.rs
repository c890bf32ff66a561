use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

///Configuration of the [`FloodBufferMerger`](crate::merging::FloodBufferMerger)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct MergeConfig {
    ///Distance (meters) allowed between the boundaries of two circles for them to still be connected
    pub max_distance: f64,
    ///Vertical offset (meters) added to the mean height of a group
    pub height_clearance: f64,
    ///Number of boundary samples of an isolated circle
    pub singleton_segments: usize,
    ///Number of boundary samples per member of a merged group
    pub member_segments: usize,
    ///Half-width (degrees) of the angular window in which a neighbour inflates the local radius
    pub blend_window_deg: f64,
    ///Maximum relative radius increase towards a neighbour
    pub blend_gain: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_distance: 25.0,
            height_clearance: 0.5,
            singleton_segments: 128,
            member_segments: 64,
            blend_window_deg: 60.0,
            blend_gain: 0.5,
        }
    }
}

impl MergeConfig {
    ///Groups with too few member samples for a hull fall back to their bounding circle, so a single one suffices
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.singleton_segments >= 3,
            "at least 3 singleton segments required, got {}",
            self.singleton_segments
        );
        ensure!(
            self.member_segments >= 1,
            "at least 1 member segment required"
        );
        for (name, value) in [
            ("max_distance", self.max_distance),
            ("blend_window_deg", self.blend_window_deg),
            ("blend_gain", self.blend_gain),
        ] {
            ensure!(
                value.is_finite() && value >= 0.0,
                "invalid {name}: {value}"
            );
        }
        ensure!(
            self.height_clearance.is_finite(),
            "invalid height_clearance: {}",
            self.height_clearance
        );
        Ok(())
    }
}
