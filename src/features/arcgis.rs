//! ArcGIS feature service backend
//!
//! Queries the `Puntos_kilometricos_Espana` layer. Every request asks for all
//! fields plus geometry in WGS84, sorted by marker number.

use crate::config::Config;
use crate::constants::api::{ORDER_BY, OUT_SR, USER_AGENT};
use crate::error::{Error, Result};
use crate::features::{FeatureCollection, FeatureSource};
use crate::query::build_filter;
use std::time::Duration;
use tracing::{debug, warn};

/// ArcGIS feature query client
#[derive(Debug, Clone)]
pub struct ArcGisClient {
    client: reqwest::Client,
    base_url: String,
}

impl ArcGisClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.services.user_agent)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.services.feature_url.clone(),
        })
    }

    /// Create a client against a specific endpoint with default settings
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Full query URL for a filter expression
    pub fn query_url(&self, filter: &str) -> String {
        let params = [
            ("where", filter),
            ("outFields", "*"),
            ("returnGeometry", "true"),
            ("outSR", OUT_SR),
            ("f", "json"),
            ("orderByFields", ORDER_BY),
        ];

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.base_url, query)
    }
}

impl FeatureSource for ArcGisClient {
    async fn fetch_features(&self, carretera: &str, pk: &str) -> Result<FeatureCollection> {
        let url = self.query_url(&build_filter(carretera, pk));
        debug!(%url, "querying feature service");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::HttpStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        let collection: FeatureCollection = serde_json::from_str(&body)?;

        if let Some(err) = &collection.error {
            warn!(
                code = ?err.code,
                message = err.message.as_deref().unwrap_or(""),
                "feature service returned an error payload"
            );
        }

        debug!(count = collection.len(), "feature query finished");
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::api::FEATURE_SERVICE_URL;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ArcGisClient {
        ArcGisClient::with_base_url(format!("{}/query", server.uri())).unwrap()
    }

    #[test]
    fn test_query_url_encoding() {
        let client = ArcGisClient::with_base_url("https://example.test/query").unwrap();
        let url = client.query_url("LOWER(nombre) LIKE '%a-1%'");

        assert_eq!(
            url,
            "https://example.test/query?where=LOWER%28nombre%29%20LIKE%20%27%25a-1%25%27\
             &outFields=%2A&returnGeometry=true&outSR=4326&f=json&orderByFields=numero%20ASC"
        );
    }

    #[test]
    fn test_default_config_points_at_service() {
        let client = ArcGisClient::new(&Config::default()).unwrap();
        assert!(client.query_url("1=1").starts_with(FEATURE_SERVICE_URL));
    }

    #[tokio::test]
    async fn test_fetch_sends_fixed_parameters() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "features": [
                {
                    "attributes": { "nombre": "A-1", "numero": "5", "sentidopkd": "creciente" },
                    "geometry": { "x": -3.7, "y": 40.4 }
                }
            ]
        });

        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("where", "LOWER(nombre) LIKE '%a-1%' AND LOWER(numero) LIKE '5'"))
            .and(query_param("outFields", "*"))
            .and(query_param("returnGeometry", "true"))
            .and(query_param("outSR", "4326"))
            .and(query_param("f", "json"))
            .and(query_param("orderByFields", "numero ASC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let collection = test_client(&server).fetch_features("A-1", "5").await.unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.features()[0].numero(), "5");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = test_client(&server).fetch_features("A-1", "").await.unwrap_err();
        assert!(matches!(err, Error::HttpStatus(503)));
        assert_eq!(err.to_string(), "Error en la petición: 503");
    }

    #[tokio::test]
    async fn test_missing_features_passes_through() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": { "code": 400, "message": "Unable to complete operation." }
            })))
            .mount(&server)
            .await;

        let collection = test_client(&server).fetch_features("A-1", "").await.unwrap();
        assert!(collection.is_empty());
        assert!(collection.error.is_some());
    }

    #[tokio::test]
    async fn test_empty_point_does_not_fail_fetch() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"features":[
                    {"attributes":{"nombre":"A-1","numero":"5"},"geometry":{"x":-3.7,"y":40.4}},
                    {"attributes":{"nombre":"A-1","numero":"6"},"geometry":{"x":"NaN","y":"NaN"}}
                ]}"#,
            ))
            .mount(&server)
            .await;

        let collection = test_client(&server).fetch_features("A-1", "").await.unwrap();
        assert_eq!(collection.len(), 2);
        assert!(collection.features()[1].coordinates().is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = test_client(&server).fetch_features("A-1", "").await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
