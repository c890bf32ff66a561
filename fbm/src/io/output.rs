use serde::{Deserialize, Serialize};

use flood_rs::io::enrich::EnrichStats;
use flood_rs::io::export::ExtMergeResult;

use crate::config::FbmConfig;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FbmOutput {
    pub input_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_file: Option<String>,
    pub config: FbmConfig,
    /// Features that did not yield a buffer circle
    pub n_skipped: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrich_stats: Option<EnrichStats>,
    /// Flood volume ranges of the natural breaks classes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flood_classes: Option<Vec<String>>,
    pub run_time_ms: u64,
    #[serde(flatten)]
    pub result: ExtMergeResult,
}
