use serde::{Deserialize, Serialize};

use flood_rs::io::import::{ImportConfig, RadiusModel};
use flood_rs::io::svg::svg_util::SvgDrawOptions;
use flood_rs::util::MergeConfig;

/// Configuration of a flood buffer merging run
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct FbmConfig {
    /// Proximity threshold, outline resolution and inflation of the merged groups
    #[serde(default)]
    pub merge_config: MergeConfig,
    /// Radius of the buffer circle around every sensor point
    #[serde(default)]
    pub radius_model: RadiusModel,
    #[serde(default)]
    pub import_config: ImportConfig,
    /// Number of natural breaks classes of the flood volume
    #[serde(default = "default_n_classes")]
    pub n_classes: usize,
    /// Optional SVG drawing options
    #[serde(default)]
    pub svg_draw_options: SvgDrawOptions,
}

fn default_n_classes() -> usize {
    3
}

impl Default for FbmConfig {
    fn default() -> Self {
        Self {
            merge_config: MergeConfig::default(),
            radius_model: RadiusModel::default(),
            import_config: ImportConfig::default(),
            n_classes: default_n_classes(),
            svg_draw_options: SvgDrawOptions::default(),
        }
    }
}
