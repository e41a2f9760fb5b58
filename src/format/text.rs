//! Human-readable text output formatter

use crate::error::Result;
use crate::format::{OutputFormatter, SearchReport};
use crate::render::ResultItem;

/// Text formatter - outputs one line per kilometer point
pub struct TextFormatter;

/// One result as a single line
pub fn item_line(item: &ResultItem) -> String {
    format!(
        "[{}] {}  PK {}  sentido: {}  {}  {}",
        item.index + 1,
        item.nombre,
        item.numero,
        item.sentido,
        item.label.text(),
        item.map_link
    )
}

/// Follow-up line when an item's location arrives
pub fn label_line(index: usize, label: &str) -> String {
    format!("[{}] municipio/provincia: {}", index + 1, label)
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable list"
    }

    fn format(&self, report: &SearchReport) -> Result<String> {
        let mut output = String::new();

        if !report.status.is_empty() {
            output.push_str(&format!("{}\n", report.status));
        }
        if !report.count.is_empty() {
            output.push_str(&format!("{}\n", report.count));
        }
        for item in &report.items {
            output.push_str(&item_line(item));
            output.push('\n');
        }

        Ok(output)
    }
}
