use std::collections::HashMap;

use anyhow::Result;
use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};

use crate::classify::{classify, jenks_breaks};
use crate::io::ext_repr::ExtFeatureCollection;
use crate::io::report::SwmmReport;
use crate::io::{
    AVG_DEPTH_KEY, CLASS_KEY, FLOOD_VOLUME_KEY, MAX_DEPTH_KEY, NODE_ID_KEY, OUT_DEPTH_KEY,
    WELL_DEPTH_KEY,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichStats {
    /// Features matched with a row of the node depth summary
    pub n_depth_matches: usize,
    /// Features matched with a row of the node flooding summary
    pub n_flood_matches: usize,
    /// Features for which `OUT_DEPTH` was derived
    pub n_out_depths: usize,
}

/// Copies the simulated depths and flood volumes onto the features with a matching node id.
///
/// Sets `AVG_DEPTH`, `MAX_DEPTH` (the reported maximum) and `FLOOD_VOLUME`,
/// then derives `OUT_DEPTH = MAX_DEPTH - WELLDEEP` wherever both are numeric.
pub fn enrich_features(fc: &mut ExtFeatureCollection, report: &SwmmReport) -> EnrichStats {
    let depths = report
        .node_depths
        .iter()
        .map(|d| (d.node_id.as_str(), d))
        .collect::<HashMap<_, _>>();
    let floodings = report
        .node_flooding
        .iter()
        .map(|f| (f.node_id.as_str(), f))
        .collect::<HashMap<_, _>>();

    let mut stats = EnrichStats::default();
    for feature in fc.features.iter_mut() {
        if let Some(node_id) = feature.property_str(NODE_ID_KEY) {
            if let Some(depth) = depths.get(node_id.as_str()) {
                feature.set_property(AVG_DEPTH_KEY, depth.avg_depth);
                feature.set_property(MAX_DEPTH_KEY, depth.reported_max_depth);
                stats.n_depth_matches += 1;
            }
            if let Some(flooding) = floodings.get(node_id.as_str()) {
                feature.set_property(FLOOD_VOLUME_KEY, flooding.total_volume);
                stats.n_flood_matches += 1;
            }
        }

        let max_depth = feature.property_f64(MAX_DEPTH_KEY);
        let well_depth = feature.property_f64(WELL_DEPTH_KEY);
        if let (Some(max_depth), Some(well_depth)) = (max_depth, well_depth) {
            feature.set_property(OUT_DEPTH_KEY, max_depth - well_depth);
            stats.n_out_depths += 1;
        }
    }

    info!(
        "[ENRICH] {} of {} features matched a node depth, {} a flooded node",
        stats.n_depth_matches,
        fc.features.len(),
        stats.n_flood_matches
    );
    stats
}

/// Classifies the `FLOOD_VOLUME` of every feature into natural breaks classes, stored as `class`.
///
/// Returns the breaks.
pub fn apply_flood_classes(fc: &mut ExtFeatureCollection, n_classes: usize) -> Result<Vec<f64>> {
    let volumes = fc
        .features
        .iter()
        .filter_map(|f| f.property_f64(FLOOD_VOLUME_KEY))
        .filter(|v| v.is_finite())
        .collect_vec();

    let breaks = jenks_breaks(&volumes, n_classes)?;
    for feature in fc.features.iter_mut() {
        let class = feature
            .property_f64(FLOOD_VOLUME_KEY)
            .and_then(|v| classify(v, &breaks));
        if let Some(class) = class {
            feature.set_property(CLASS_KEY, class);
        }
    }

    info!("[ENRICH] flood volume classes: {}", format_breaks(&breaks).join(", "));
    Ok(breaks)
}

/// Breaks as class ranges, e.g. `["0.001-0.004", "0.004-0.300"]`
pub fn format_breaks(breaks: &[f64]) -> Vec<String> {
    breaks
        .iter()
        .tuple_windows()
        .map(|(lower, upper)| format!("{lower:.3}-{upper:.3}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::report::{NodeDepth, NodeFlooding};
    use float_cmp::approx_eq;

    fn collection() -> ExtFeatureCollection {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [102.6846, 24.9879] },
                  "properties": { "EXP_NO": "YS001", "HIGH": 1893.5, "WELLDEEP": 1.5 } },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [102.6850, 24.9880] },
                  "properties": { "EXP_NO": "YS002", "HIGH": 1890.1, "WELLDEEP": "2.0" } },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [102.6860, 24.9890] },
                  "properties": { "EXP_NO": 3, "HIGH": 1889.0 } },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [102.6870, 24.9900] },
                  "properties": { "HIGH": 1888.0 } }
            ]
        }"#;
        serde_json::from_str(json).unwrap()
    }

    fn report() -> SwmmReport {
        let depth = |id: &str, avg: f64, max: f64| NodeDepth {
            node_id: id.to_string(),
            node_type: "JUNCTION".to_string(),
            avg_depth: avg,
            max_depth: max,
            reported_max_depth: max,
        };
        let flooding = |id: &str, volume: f64| NodeFlooding {
            node_id: id.to_string(),
            hours_flooded: 0.5,
            max_rate: 0.01,
            total_volume: volume,
        };
        SwmmReport {
            node_depths: vec![depth("YS001", 0.2, 0.85), depth("YS002", 1.1, 2.3), depth("3", 0.1, 0.4)],
            node_flooding: vec![flooding("YS002", 0.217), flooding("3", 0.002)],
        }
    }

    #[test]
    fn features_are_matched_by_node_id() {
        let mut fc = collection();
        let stats = enrich_features(&mut fc, &report());
        assert_eq!(
            stats,
            EnrichStats {
                n_depth_matches: 3,
                n_flood_matches: 2,
                n_out_depths: 2,
            }
        );

        let f = &fc.features;
        assert_eq!(f[0].property_f64(AVG_DEPTH_KEY), Some(0.2));
        assert_eq!(f[0].property_f64(FLOOD_VOLUME_KEY), None);
        assert!(approx_eq!(f64, f[0].property_f64(OUT_DEPTH_KEY).unwrap(), -0.65, epsilon = 1e-12));
        assert!(approx_eq!(f64, f[1].property_f64(OUT_DEPTH_KEY).unwrap(), 0.3, epsilon = 1e-12));
        //numeric node ids are matched by their textual form
        assert_eq!(f[2].property_f64(FLOOD_VOLUME_KEY), Some(0.002));
        assert_eq!(f[2].property_f64(OUT_DEPTH_KEY), None);
        assert!(f[3].property(MAX_DEPTH_KEY).is_none());
    }

    #[test]
    fn flood_classes_cover_flooded_features() {
        let mut fc = collection();
        let volumes = [0.004, 0.3, 1.945, 0.001];
        for (f, v) in fc.features.iter_mut().zip(volumes) {
            f.set_property(FLOOD_VOLUME_KEY, v);
        }
        let breaks = apply_flood_classes(&mut fc, 3).unwrap();
        assert_eq!(breaks.len(), 4);
        assert_eq!(breaks[0], 0.001);
        assert_eq!(breaks[3], 1.945);

        let classes = fc
            .features
            .iter()
            .map(|f| f.property_f64(CLASS_KEY))
            .collect_vec();
        assert!(classes.iter().all(|c| c.is_some()));
        assert_eq!(classes[2], Some(3.0));
        assert_eq!(classes[3], Some(1.0));
    }

    #[test]
    fn too_few_volumes_for_classes() {
        let mut fc = collection();
        fc.features[0].set_property(FLOOD_VOLUME_KEY, 0.2);
        assert!(apply_flood_classes(&mut fc, 3).is_err());
        assert!(fc.features[0].property(CLASS_KEY).is_none());
    }

    #[test]
    fn breaks_are_formatted_as_ranges() {
        assert_eq!(
            format_breaks(&[0.001, 0.004, 0.3, 1.945]),
            vec!["0.001-0.004", "0.004-0.300", "0.300-1.945"]
        );
    }
}
