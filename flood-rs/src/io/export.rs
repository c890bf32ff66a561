use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::io::ext_repr::{ExtFeature, ExtFeatureCollection, ExtGeometry};
use crate::merging::{MergeResult, MergedGroup, OutlineKind};

/// External (serializable) representation of a [`MergeResult`]
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtMergeResult {
    pub n_circles: usize,
    pub n_edges: usize,
    pub groups: Vec<ExtMergedGroup>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtMergedGroup {
    /// Indices of the member circles
    pub members: Vec<usize>,
    /// Indices of the features the members originate from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<usize>,
    pub height: f64,
    pub kind: OutlineKind,
    /// Closed counterclockwise ring of (lon, lat) vertices
    pub ring: Vec<[f64; 2]>,
}

/// `feature_indices[i]` maps circle `i` back to the feature it was imported from, it may be empty.
pub fn export_merge_result(result: &MergeResult, feature_indices: &[usize]) -> ExtMergeResult {
    ExtMergeResult {
        n_circles: result.n_circles,
        n_edges: result.n_edges,
        groups: result
            .groups
            .iter()
            .map(|g| export_group(g, feature_indices))
            .collect(),
    }
}

fn export_group(group: &MergedGroup, feature_indices: &[usize]) -> ExtMergedGroup {
    ExtMergedGroup {
        members: group.members.clone(),
        features: group
            .members
            .iter()
            .filter_map(|&m| feature_indices.get(m).copied())
            .collect(),
        height: group.height,
        kind: group.kind,
        ring: group.outline.closed_ring(),
    }
}

/// GeoJSON polygon per group, with the members, height and outline kind as properties.
pub fn to_feature_collection(result: &ExtMergeResult) -> ExtFeatureCollection {
    let features = result
        .groups
        .iter()
        .map(|g| {
            let ring = g.ring.iter().map(|&[lon, lat]| vec![lon, lat]).collect();
            let mut properties = Map::new();
            properties.insert("members".to_string(), Value::from(g.members.clone()));
            if !g.features.is_empty() {
                properties.insert("features".to_string(), Value::from(g.features.clone()));
            }
            properties.insert("height".to_string(), Value::from(g.height));
            properties.insert(
                "kind".to_string(),
                Value::from(match g.kind {
                    OutlineKind::Circle => "circle",
                    OutlineKind::Hull => "hull",
                }),
            );
            ExtFeature::new(
                ExtGeometry::Polygon {
                    coordinates: vec![ring],
                },
                properties,
            )
        })
        .collect();
    ExtFeatureCollection::new(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::geodesy::Cartographic;
    use crate::geometry::primitives::Point;
    use crate::merging::{BufferCircle, FloodBufferMerger};

    const ORIGIN: Cartographic = Cartographic {
        lon: 102.684693,
        lat: 24.987954,
        height: 1900.0,
    };

    fn circle_at(east: f64, north: f64, radius: f64) -> BufferCircle {
        let Point(lon, lat) = ORIGIN.offset(east, north);
        BufferCircle::try_new(Cartographic::new(lon, lat, ORIGIN.height), radius).unwrap()
    }

    fn merged() -> MergeResult {
        let circles = [
            circle_at(0.0, 0.0, 8.0),
            circle_at(10.0, 0.0, 10.0),
            circle_at(200.0, 0.0, 5.0),
        ];
        FloodBufferMerger::default().merge(&circles)
    }

    #[test]
    fn groups_refer_back_to_features() {
        let ext = export_merge_result(&merged(), &[4, 7, 9]);
        assert_eq!(ext.n_circles, 3);
        assert_eq!(ext.groups.len(), 2);
        assert_eq!(ext.groups[0].members, vec![0, 1]);
        assert_eq!(ext.groups[0].features, vec![4, 7]);
        assert_eq!(ext.groups[1].features, vec![9]);
        assert_eq!(ext.groups[0].kind, OutlineKind::Hull);
        assert_eq!(ext.groups[1].kind, OutlineKind::Circle);
    }

    #[test]
    fn polygons_have_closed_rings() {
        let fc = to_feature_collection(&export_merge_result(&merged(), &[]));
        assert_eq!(fc.features.len(), 2);
        for feature in &fc.features {
            let Some(ExtGeometry::Polygon { coordinates }) = &feature.geometry else {
                panic!("expected a polygon");
            };
            let ring = &coordinates[0];
            assert!(ring.len() >= 4);
            assert_eq!(ring.first(), ring.last());
            assert!(feature.property("features").is_none());
        }
        assert_eq!(fc.features[0].property_str("kind").as_deref(), Some("hull"));
        assert_eq!(fc.features[1].property_str("kind").as_deref(), Some("circle"));
        assert_eq!(fc.features[1].property_f64("height"), Some(1900.5));
    }

    #[test]
    fn ext_merge_result_serializes_kind_in_snake_case() {
        let ext = export_merge_result(&merged(), &[]);
        let json = serde_json::to_value(&ext).unwrap();
        assert_eq!(json["groups"][0]["kind"], "hull");
        assert!(json["groups"][0].get("features").is_none());
        assert_eq!(json["groups"][0]["members"], serde_json::json!([0, 1]));
    }
}
