//! Error types for pk-search

use thiserror::Error;

/// Main error type for pk-search operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Error en la petición: {0}")]
    HttpStatus(u16),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Geocoding error: {0}")]
    Geocoding(String),
}

/// Result type alias for pk-search operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_message() {
        let err = Error::HttpStatus(500);
        assert_eq!(err.to_string(), "Error en la petición: 500");
    }

    #[test]
    fn test_json_error_conversion() {
        let src = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = src.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
