use anyhow::{Context, Result};
use log::{info, warn};

use flood_rs::io::enrich::{EnrichStats, apply_flood_classes, enrich_features};
use flood_rs::io::ext_repr::ExtFeatureCollection;
use flood_rs::io::import::{ImportedCircles, Importer};
use flood_rs::io::report::SwmmReport;
use flood_rs::merging::{FloodBufferMerger, MergeResult};

use crate::config::FbmConfig;

/// Everything a run produces before it is written to disk
#[derive(Clone, Debug)]
pub struct FloodRun {
    /// Input features, enriched with the report's results if one was given
    pub features: ExtFeatureCollection,
    pub imported: ImportedCircles,
    pub result: MergeResult,
    pub enrich_stats: Option<EnrichStats>,
    /// Natural breaks of the flood volumes, if they could be determined
    pub flood_breaks: Option<Vec<f64>>,
}

/// Enriches the features with the report (if any), imports their buffer circles and merges them.
///
/// With `merge` disabled every circle is outlined on its own.
pub fn run(
    mut features: ExtFeatureCollection,
    report: Option<&SwmmReport>,
    config: &FbmConfig,
    merge: bool,
) -> Result<FloodRun> {
    config
        .merge_config
        .validate()
        .context("invalid merge config")?;

    let (enrich_stats, flood_breaks) = match report {
        Some(report) => {
            let stats = enrich_features(&mut features, report);
            let breaks = match apply_flood_classes(&mut features, config.n_classes) {
                Ok(breaks) => Some(breaks),
                Err(e) => {
                    warn!("[RUN] flood volumes not classified: {e}");
                    None
                }
            };
            (Some(stats), breaks)
        }
        None => (None, None),
    };

    let importer = Importer::new(config.radius_model, config.import_config);
    let imported = importer.import_circles(&features)?;

    let merger = FloodBufferMerger::new(config.merge_config);
    let result = match merge {
        true => merger.merge(&imported.circles),
        false => merger.point_buffers(&imported.circles),
    };

    info!(
        "[RUN] {} buffer circles outlined by {} groups ({} edges)",
        result.n_circles,
        result.groups.len(),
        result.n_edges
    );

    Ok(FloodRun {
        features,
        imported,
        result,
        enrich_stats,
        flood_breaks,
    })
}
