//! HTML markup for result items
//!
//! Every value that comes from the user or the feature service goes through
//! [`escape_html`] before it reaches the markup.

use crate::render::ResultItem;

/// Escape `& < > " '` as HTML entities
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl ResultItem {
    /// Markup for one result
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="item" data-index="{index}">
  <div class="mb-2">
    <strong class="text-primary">{nombre}</strong> —
    PK: <span class="badge bg-info text-dark">{numero}</span>
  </div>
  <div class="meta mb-1">
    <span class="municipio fw-bold text-success">{label}</span> —
    <span>Sentido: </span><span class="sentido text-danger">{sentido}</span> —
    <small><a class="link-primary fw-bold" href="{href}" target="_blank">ver en Google Maps</a></small>
  </div>
</div>"#,
            index = self.index,
            nombre = escape_html(&self.nombre),
            numero = escape_html(&self.numero),
            label = escape_html(self.label.text()),
            sentido = escape_html(&self.sentido),
            href = escape_html(&self.map_link),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::LocationLabel;

    fn item(nombre: &str) -> ResultItem {
        ResultItem {
            index: 0,
            nombre: nombre.to_string(),
            numero: "5".to_string(),
            sentido: "creciente".to_string(),
            fuente: "—".to_string(),
            coordinates: None,
            map_link: "https://www.google.com/maps?q=40.4,-3.7".to_string(),
            label: LocationLabel::Loading,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("A-1 Madrid–Burgos"), "A-1 Madrid–Burgos");
    }

    #[test]
    fn test_escape_ampersand_first() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_item_markup() {
        let html = item("A-1").to_html();
        assert!(html.contains(r#"<strong class="text-primary">A-1</strong>"#));
        assert!(html.contains(r#"<span class="badge bg-info text-dark">5</span>"#));
        assert!(html.contains("Cargando municipio/provincia..."));
        assert!(html.contains(r#"<span class="sentido text-danger">creciente</span>"#));
        assert!(html.contains(r#"href="https://www.google.com/maps?q=40.4,-3.7""#));
    }

    #[test]
    fn test_item_markup_escapes_attributes() {
        let mut hostile = item(r#"<script>alert("x")</script>"#);
        hostile.sentido = "O'Donnell & co".to_string();
        hostile.label = LocationLabel::Resolved("<b>Villa</b> / \"P\"".to_string());

        let html = hostile.to_html();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"));
        assert!(html.contains("O&#39;Donnell &amp; co"));
        assert!(html.contains("&lt;b&gt;Villa&lt;/b&gt; / &quot;P&quot;"));
    }
}
