//! Nominatim reverse geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API. The usage policy requires an identifying
//! User-Agent on every request.

use crate::config::Config;
use crate::constants::api::{REVERSE_ZOOM, USER_AGENT};
use crate::error::{Error, Result};
use crate::geo::{Address, Coordinates, ReverseGeocoder};
use serde::Deserialize;
use std::time::Duration;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
    zoom: u8,
}

/// Nominatim reverse response
///
/// Nominatim answers `{"error": "Unable to geocode"}` with a 200 when it
/// finds nothing, so `address` is optional.
#[derive(Debug, Deserialize)]
struct ReverseResult {
    #[serde(default)]
    address: Option<Address>,
}

impl NominatimBackend {
    /// Create a backend from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.services.user_agent)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.services.nominatim_url.trim_end_matches('/').to_string(),
            zoom: config.geocoder.zoom,
        })
    }

    /// Create a backend against a specific base URL with default settings
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            zoom: REVERSE_ZOOM,
        })
    }
}

impl ReverseGeocoder for NominatimBackend {
    async fn reverse(&self, coords: Coordinates) -> Result<Address> {
        let url = format!("{}/reverse", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lon", coords.lon.to_string()),
                ("format", "json".to_string()),
                ("zoom", self.zoom.to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let result: ReverseResult = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        Ok(result.address.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_reverse_sends_expected_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("lat", "40.4"))
            .and(query_param("lon", "-3.7"))
            .and(query_param("format", "json"))
            .and(query_param("zoom", "10"))
            .and(query_param("addressdetails", "1"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "display_name": "Madrid, Comunidad de Madrid, España",
                "address": { "city": "Madrid", "province": "Madrid", "country": "España" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = NominatimBackend::with_base_url(server.uri()).unwrap();
        let address = backend.reverse(Coordinates::new(40.4, -3.7)).await.unwrap();
        assert_eq!(address.label(), "Madrid / Madrid");
    }

    #[tokio::test]
    async fn test_reverse_without_address() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "error": "Unable to geocode" })),
            )
            .mount(&server)
            .await;

        let backend = NominatimBackend::with_base_url(server.uri()).unwrap();
        let address = backend.reverse(Coordinates::new(0.0, 0.0)).await.unwrap();
        assert_eq!(address, Address::default());
    }

    #[tokio::test]
    async fn test_reverse_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let backend = NominatimBackend::with_base_url(server.uri()).unwrap();
        let err = backend.reverse(Coordinates::new(40.4, -3.7)).await.unwrap_err();
        assert!(matches!(err, Error::Geocoding(_)));
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_reverse_malformed_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let backend = NominatimBackend::with_base_url(server.uri()).unwrap();
        assert!(backend.reverse(Coordinates::new(40.4, -3.7)).await.is_err());
    }

    #[test]
    fn test_backend_from_config() {
        let mut config = Config::default();
        config.services.nominatim_url = "https://nominatim.example.test/".to_string();
        config.geocoder.zoom = 12;

        let backend = NominatimBackend::new(&config).unwrap();
        assert_eq!(backend.base_url, "https://nominatim.example.test");
        assert_eq!(backend.zoom, 12);
    }
}
