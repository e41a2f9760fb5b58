//! Filter expressions for the kilometer point feature service
//!
//! The service takes a SQL-like `where` clause. Values are lowercased and
//! have their single quotes doubled before being embedded; nothing else is
//! escaped, so a crafted road name can still change the clause.

pub mod fallback;

pub use fallback::fallback_road_name;

/// A single form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    /// Road name (required)
    pub carretera: String,
    /// Kilometer point number (optional, may be empty)
    pub pk: String,
}

impl SearchInput {
    pub fn new(carretera: impl Into<String>, pk: impl Into<String>) -> Self {
        Self {
            carretera: carretera.into(),
            pk: pk.into(),
        }
    }

    /// True when the road name is blank after trimming
    pub fn is_blank(&self) -> bool {
        self.carretera.trim().is_empty()
    }
}

/// Trim, lowercase and double single quotes
fn normalize(value: &str) -> String {
    value.trim().to_lowercase().replace('\'', "''")
}

/// Build the `where` clause for a road name and optional PK
///
/// The road name is matched with a case-insensitive "contains"; the PK, when
/// present, with a case-insensitive `LIKE` on the marker number.
pub fn build_filter(carretera: &str, pk: &str) -> String {
    let mut filter = format!("LOWER(nombre) LIKE '%{}%'", normalize(carretera));

    if !pk.trim().is_empty() {
        filter.push_str(&format!(" AND LOWER(numero) LIKE '{}'", normalize(pk)));
    }

    filter
}
