/// Enrichment of GeoJSON features with simulation results
pub mod enrich;
/// Conversion of merge results into their external representations
pub mod export;
/// External representation (GeoJSON) of the sensor points and merged outlines
pub mod ext_repr;
/// Conversion of GeoJSON features into buffer circles
pub mod import;
/// Parsing of SWMM report (`.rpt`) files
pub mod report;
/// SVG rendering of merge results
pub mod svg;

/// Feature property holding the node identifier
pub const NODE_ID_KEY: &str = "EXP_NO";
/// Feature property holding the ground height (meters)
pub const HEIGHT_KEY: &str = "HIGH";
/// Feature property holding the well depth (meters)
pub const WELL_DEPTH_KEY: &str = "WELLDEEP";
/// Feature property holding the average water depth (meters)
pub const AVG_DEPTH_KEY: &str = "AVG_DEPTH";
/// Feature property holding the maximum water depth (meters)
pub const MAX_DEPTH_KEY: &str = "MAX_DEPTH";
/// Feature property holding the water level above the well (meters)
pub const OUT_DEPTH_KEY: &str = "OUT_DEPTH";
/// Feature property holding the total flood volume (10^6 liters)
pub const FLOOD_VOLUME_KEY: &str = "FLOOD_VOLUME";
/// Feature property holding the natural breaks class of the flood volume
pub const CLASS_KEY: &str = "class";
