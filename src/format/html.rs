//! HTML output formatter
//!
//! Lays the report out like the search page: status line, result count and
//! the list of items.

use crate::error::Result;
use crate::format::{OutputFormatter, SearchReport};
use crate::render::html::escape_html;

/// HTML formatter - outputs a standalone page
pub struct HtmlFormatter;

impl OutputFormatter for HtmlFormatter {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Standalone HTML page"
    }

    fn format(&self, report: &SearchReport) -> Result<String> {
        let items = report
            .items
            .iter()
            .map(|item| item.to_html())
            .collect::<Vec<_>>()
            .join("\n");

        let hidden = if report.items.is_empty() { " hidden" } else { "" };

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>PK {carretera}</title>
</head>
<body>
<p id="status">{status}</p>
<section id="results"{hidden}>
<p id="count">{count}</p>
<div id="list">
{items}
</div>
</section>
</body>
</html>
"#,
            carretera = escape_html(&report.carretera),
            status = escape_html(&report.status),
            count = escape_html(&report.count),
        ))
    }
}
