//! Kilometer point features
//!
//! Response model of the feature service and the `FeatureSource` trait the
//! search controller fetches through.

pub mod arcgis;

use crate::constants::text::UNKNOWN;
use crate::error::Result;
use crate::geo::Coordinates;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Parsed body of a feature query, returned as-is
///
/// `features` may be missing entirely; callers treat that as zero results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<Feature>>,

    /// Error object the service sends with a 200 status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ServiceError>,
}

/// ArcGIS error payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A single kilometer point
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub attributes: Option<Attributes>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

/// Feature attributes
///
/// Only the fields shown to the user are named; everything else the service
/// returns is kept in `other`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attributes {
    /// Road name
    #[serde(default)]
    pub nombre: Option<Value>,
    /// Kilometer point number
    #[serde(default)]
    pub numero: Option<Value>,
    /// Direction of the kilometer count
    #[serde(default)]
    pub sentidopkd: Option<Value>,
    /// Data source
    #[serde(default)]
    pub fuented: Option<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Point geometry, either ArcGIS `{x, y}` or GeoJSON-style `{coordinates: [lon, lat]}`
///
/// Empty points come back as `"NaN"` strings; any non-numeric axis parses as
/// missing so the rest of the collection survives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default, deserialize_with = "lenient_number")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub y: Option<f64>,
    #[serde(default, deserialize_with = "lenient_numbers")]
    pub coordinates: Option<Vec<f64>>,
}

fn finite(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(finite))
}

/// Non-numeric entries become NaN so positions are kept
fn lenient_numbers<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .map(|v| finite(v).unwrap_or(f64::NAN))
                .collect(),
        ),
        _ => None,
    })
}

impl FeatureCollection {
    /// Features in service order (empty when the key was missing)
    pub fn features(&self) -> &[Feature] {
        self.features.as_deref().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.features().len()
    }

    pub fn is_empty(&self) -> bool {
        self.features().is_empty()
    }
}

impl Geometry {
    /// Latitude and longitude, each axis preferring `y`/`x` over `coordinates`
    pub fn coordinates(&self) -> Option<Coordinates> {
        let from_array = |i: usize| {
            self.coordinates
                .as_ref()
                .and_then(|c| c.get(i).copied())
                .filter(|n| n.is_finite())
        };
        let lat = self.y.filter(|n| n.is_finite()).or_else(|| from_array(1))?;
        let lon = self.x.filter(|n| n.is_finite()).or_else(|| from_array(0))?;
        Some(Coordinates::new(lat, lon))
    }
}

impl Feature {
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.geometry.as_ref().and_then(Geometry::coordinates)
    }

    fn attribute(&self, pick: impl Fn(&Attributes) -> Option<&Value>) -> String {
        attribute_text(self.attributes.as_ref().and_then(pick))
    }

    pub fn nombre(&self) -> String {
        self.attribute(|a| a.nombre.as_ref())
    }

    pub fn numero(&self) -> String {
        self.attribute(|a| a.numero.as_ref())
    }

    pub fn sentido(&self) -> String {
        self.attribute(|a| a.sentidopkd.as_ref())
    }

    pub fn fuente(&self) -> String {
        self.attribute(|a| a.fuented.as_ref())
    }
}

/// Display text of an attribute value; missing and null become the unknown placeholder
fn attribute_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNKNOWN.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Trait for feature query backends
pub trait FeatureSource: Send + Sync {
    /// Fetch the kilometer points matching a road name and optional PK
    fn fetch_features(
        &self,
        carretera: &str,
        pk: &str,
    ) -> impl std::future::Future<Output = Result<FeatureCollection>> + Send;
}
