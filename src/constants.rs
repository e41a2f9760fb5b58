//! Centralized constants for the pk-search crate
//!
//! Endpoints, request parameters and the user-facing strings shared by the
//! renderer, the controller and the formatters.

/// External API endpoints
pub mod api {
    /// ArcGIS feature layer with the kilometer points of the Spanish road network
    pub const FEATURE_SERVICE_URL: &str = "https://services1.arcgis.com/nCKYwcSONQTkPA4K/ArcGIS/rest/services/Puntos_kilometricos_Espana/FeatureServer/0/query";

    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Client identification required by the Nominatim usage policy
    pub const USER_AGENT: &str = concat!(
        "pk-search/",
        env!("CARGO_PKG_VERSION"),
        " (road kilometer point lookup)"
    );

    /// Spatial reference for returned geometries (WGS84)
    pub const OUT_SR: &str = "4326";

    /// Sort order requested from the feature service
    pub const ORDER_BY: &str = "numero ASC";

    /// Nominatim zoom level (10 = city)
    pub const REVERSE_ZOOM: u8 = 10;
}

/// Strings shown to the user
pub mod text {
    /// Stand-in for any value that is missing or could not be resolved
    pub const UNKNOWN: &str = "—";

    /// Location label shown while the reverse geocode is in flight
    pub const LOADING_LABEL: &str = "Cargando municipio/provincia...";

    pub const STATUS_SEARCHING: &str = "Buscando...";

    pub const STATUS_NO_RESULTS: &str = "No se encontraron resultados.";

    /// Map link used when an item has no coordinates
    pub const NO_LINK: &str = "#";

    /// Status shown while the hyphenated road name is being retried
    pub fn status_retrying(road: &str) -> String {
        format!("Sin resultados. Reintentando con guion: {}...", road)
    }

    pub fn status_error(detail: &str) -> String {
        format!("Error: {}", detail)
    }

    /// Count label above the results list
    pub fn result_count(n: usize) -> String {
        format!("{} resultado(s)", n)
    }
}
