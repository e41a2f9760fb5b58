//! Reverse geocoding module
//!
//! Resolves kilometer point coordinates to a "municipality / province" label.
//! `ReverseGeocoder` makes a single attempt; `retry::resolve_location` wraps
//! it in the bounded retry loop used by the renderer.

pub mod nominatim;
pub mod retry;

use crate::constants::text::UNKNOWN;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Address details from a reverse geocode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub hamlet: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl Address {
    /// First present of city, town, village, hamlet
    pub fn settlement(&self) -> &str {
        [&self.city, &self.town, &self.village, &self.hamlet]
            .into_iter()
            .find_map(present)
            .unwrap_or(UNKNOWN)
    }

    pub fn province_name(&self) -> &str {
        present(&self.province).unwrap_or(UNKNOWN)
    }

    /// "<settlement> / <province>"
    pub fn label(&self) -> String {
        format!("{} / {}", self.settlement(), self.province_name())
    }
}

/// Trait for reverse geocoding backends
pub trait ReverseGeocoder: Send + Sync {
    /// One reverse geocoding attempt
    ///
    /// A response without address details yields an empty `Address`.
    fn reverse(
        &self,
        coords: Coordinates,
    ) -> impl std::future::Future<Output = Result<Address>> + Send;
}
