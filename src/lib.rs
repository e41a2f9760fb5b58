//! pk-search: kilometer point lookup for the Spanish road network
//!
//! Queries the public ArcGIS feature service of kilometer points (PK) by road
//! name and optional PK number, lists the matches, and fills in the
//! municipality and province of each one through Nominatim reverse geocoding.
//!
//! ## Features
//!
//! - Case-insensitive road/PK filter with a one-shot hyphen fallback (`A1` -> `A-1`)
//! - Reverse geocoding per result with a fixed-delay retry
//! - Location labels that arrive independently and never leak into a newer search
//! - Text, JSON and HTML output + interactive CLI
//!
//! ## Quick Start
//!
//! ```no_run
//! use pk_search::query::SearchInput;
//! use pk_search::search::LiveController;
//! use pk_search::Config;
//!
//! # async fn demo() -> pk_search::Result<()> {
//! let config = Config::default();
//! let mut form = LiveController::connect(&config)?;
//!
//! form.submit(SearchInput::new("A1", "12")).await;
//! form.wait_for_labels().await;
//!
//! for item in form.items() {
//!     println!("{} PK {} {}", item.nombre, item.numero, item.label.text());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod features;
pub mod format;
pub mod geo;
pub mod query;
pub mod render;
pub mod search;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use geo::Coordinates;
pub use query::SearchInput;
pub use render::{LocationLabel, ResultItem};
pub use search::{SearchController, SubmitOutcome};
