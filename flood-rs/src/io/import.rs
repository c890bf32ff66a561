use std::f64::consts::PI;

use anyhow::{Context, Result, bail, ensure};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::geometry::geodesy::Cartographic;
use crate::io::ext_repr::{ExtFeature, ExtFeatureCollection, ExtGeometry};
use crate::io::{AVG_DEPTH_KEY, FLOOD_VOLUME_KEY, HEIGHT_KEY};
use crate::merging::BufferCircle;

/// Determines the radius of the buffer circle around a sensor point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum RadiusModel {
    /// Same radius (meters) for every sensor point
    Fixed { radius: f64 },
    /// Flood volume spread as a disk of uniform depth (meters).
    /// Sensor points without a positive flood volume get no circle.
    PondedVolume {
        ponding_depth: f64,
        min_radius: f64,
        max_radius: f64,
    },
}

impl Default for RadiusModel {
    fn default() -> Self {
        RadiusModel::PondedVolume {
            ponding_depth: 0.3,
            min_radius: 5.0,
            max_radius: 50.0,
        }
    }
}

impl RadiusModel {
    /// Radius in meters for a total flood volume in 10^6 liters
    pub fn radius(&self, flood_volume: Option<f64>) -> Option<f64> {
        match *self {
            RadiusModel::Fixed { radius } => Some(radius),
            RadiusModel::PondedVolume {
                ponding_depth,
                min_radius,
                max_radius,
            } => {
                let volume = flood_volume.filter(|v| v.is_finite() && *v > 0.0)?;
                //10^6 liters = 1000 m³
                let area = volume * 1000.0 / ponding_depth;
                Some((area / PI).sqrt().clamp(min_radius, max_radius))
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            RadiusModel::Fixed { radius } => {
                ensure!(radius.is_finite() && radius > 0.0, "invalid fixed radius: {radius}")
            }
            RadiusModel::PondedVolume {
                ponding_depth,
                min_radius,
                max_radius,
            } => {
                ensure!(
                    ponding_depth.is_finite() && ponding_depth > 0.0,
                    "invalid ponding depth: {ponding_depth}"
                );
                ensure!(
                    min_radius > 0.0 && min_radius <= max_radius && max_radius.is_finite(),
                    "invalid radius range: [{min_radius}, {max_radius}]"
                );
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Height (meters) used for sensor points without a valid `HIGH` property, these are skipped if `None`
    pub default_height: Option<f64>,
}

/// Buffer circles imported from a feature collection
#[derive(Clone, Debug, Default)]
pub struct ImportedCircles {
    pub circles: Vec<BufferCircle>,
    /// Index of the feature each circle originates from
    pub feature_indices: Vec<usize>,
    /// `AVG_DEPTH` of the feature each circle originates from
    pub depths: Vec<Option<f64>>,
    pub n_skipped: usize,
}

/// Converts sensor point features into buffer circles
#[derive(Clone, Copy, Debug, Default)]
pub struct Importer {
    pub radius_model: RadiusModel,
    pub config: ImportConfig,
}

impl Importer {
    pub fn new(radius_model: RadiusModel, config: ImportConfig) -> Self {
        Self {
            radius_model,
            config,
        }
    }

    pub fn import_circles(&self, fc: &ExtFeatureCollection) -> Result<ImportedCircles> {
        self.radius_model.validate()?;
        if let Some(crs_name) = fc.crs.as_ref().and_then(|crs| crs.name()) {
            ensure!(
                is_wgs84(crs_name),
                "unsupported coordinate reference system: {crs_name}, expected WGS84 longitude/latitude"
            );
        }

        let mut imported = ImportedCircles::default();
        for (idx, feature) in fc.features.iter().enumerate() {
            match self.import_feature(feature) {
                Ok(circle) => {
                    imported.circles.push(circle);
                    imported.feature_indices.push(idx);
                    imported.depths.push(feature.property_f64(AVG_DEPTH_KEY));
                }
                Err(e) => {
                    debug!("[IMPORT] skipping feature {idx}: {e:#}");
                    imported.n_skipped += 1;
                }
            }
        }

        if imported.n_skipped > 0 {
            warn!(
                "[IMPORT] skipped {} of {} features",
                imported.n_skipped,
                fc.features.len()
            );
        }
        info!("[IMPORT] imported {} buffer circles", imported.circles.len());
        Ok(imported)
    }

    pub fn import_feature(&self, feature: &ExtFeature) -> Result<BufferCircle> {
        let (lon, lat) = match &feature.geometry {
            Some(ExtGeometry::Point { coordinates }) => match coordinates.as_slice() {
                [lon, lat, ..] => (*lon, *lat),
                _ => bail!("point with {} coordinates", coordinates.len()),
            },
            Some(_) => bail!("not a point geometry"),
            None => bail!("no geometry"),
        };

        let height = feature
            .property_f64(HEIGHT_KEY)
            .filter(|h| h.is_finite())
            .or(self.config.default_height)
            .with_context(|| format!("no valid {HEIGHT_KEY} property"))?;

        let radius = self
            .radius_model
            .radius(feature.property_f64(FLOOD_VOLUME_KEY))
            .with_context(|| format!("no positive {FLOOD_VOLUME_KEY} property"))?;

        BufferCircle::try_new(Cartographic::new(lon, lat, height), radius)
    }
}

fn is_wgs84(crs_name: &str) -> bool {
    let name = crs_name.to_ascii_uppercase();
    name.ends_with("CRS84") || name.ends_with(":4326") || name == "WGS84"
}
