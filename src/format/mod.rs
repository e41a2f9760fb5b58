//! Output formatters
//!
//! Provides trait-based output formatting for a finished search.

pub mod html;
pub mod json;
pub mod text;

use crate::error::Result;
use crate::features::FeatureSource;
use crate::geo::ReverseGeocoder;
use crate::render::ResultItem;
use crate::search::SearchController;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Everything the form shows after a search
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub carretera: String,
    pub pk: String,
    pub status: String,
    pub count: String,
    pub items: Vec<ResultItem>,
}

impl SearchReport {
    /// Capture the controller's current view
    pub fn capture<F, G>(controller: &SearchController<F, G>) -> Self
    where
        F: FeatureSource,
        G: ReverseGeocoder + 'static,
    {
        let input = controller.input();
        Self {
            carretera: input.carretera.clone(),
            pk: input.pk.clone(),
            status: controller.status(),
            count: controller.count().to_string(),
            items: controller.items(),
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a search report
    fn format(&self, report: &SearchReport) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "html" => Some(Box::new(html::HtmlFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    vec![
        FormatInfo {
            name: "text".to_string(),
            description: "Human-readable list".to_string(),
        },
        FormatInfo {
            name: "json".to_string(),
            description: "Full JSON report".to_string(),
        },
        FormatInfo {
            name: "html".to_string(),
            description: "Standalone HTML page".to_string(),
        },
    ]
}
