use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GeoJSON position: `[lon, lat]` or `[lon, lat, height]`
pub type ExtPosition = Vec<f64>;

/// External (serializable) representation of a GeoJSON feature collection
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtFeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Legacy (2008) GeoJSON coordinate reference system member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<ExtCrs>,
    pub features: Vec<ExtFeature>,
}

impl ExtFeatureCollection {
    pub fn new(features: Vec<ExtFeature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            name: None,
            crs: None,
            features,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtCrs {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl ExtCrs {
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtFeature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Option<ExtGeometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl ExtFeature {
    pub fn new(geometry: ExtGeometry, properties: Map<String, Value>) -> Self {
        Self {
            kind: "Feature".to_string(),
            id: None,
            geometry: Some(geometry),
            properties: Some(properties),
        }
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(key)
    }

    /// Numeric property, numbers stored as strings are accepted as well
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        match self.property(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Textual property, numbers are converted to their string representation
    pub fn property_str(&self, key: &str) -> Option<String> {
        match self.property(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn set_property(&mut self, key: &str, value: impl Into<Value>) {
        self.properties
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ExtGeometry {
    Point { coordinates: ExtPosition },
    MultiPoint { coordinates: Vec<ExtPosition> },
    LineString { coordinates: Vec<ExtPosition> },
    MultiLineString { coordinates: Vec<Vec<ExtPosition>> },
    Polygon { coordinates: Vec<Vec<ExtPosition>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<ExtPosition>>> },
}
