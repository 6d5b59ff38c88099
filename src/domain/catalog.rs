use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::error::DomainError;
use super::identifier::{MacType, GENERIC_PRODUCT_NAME, UNKNOWN_IDENTIFIER};

/// Embedded identifier table shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../../data/mac_models.toml");

static BUILTIN: Lazy<ModelCatalog> = Lazy::new(|| {
    ModelCatalog::from_toml_str(BUILTIN_CATALOG).unwrap_or_else(|e| {
        error!(error = %e, "Embedded model catalog is invalid, using sentinel entries only");
        ModelCatalog::sentinels()
    })
});

/// One row of the model catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Model identifier as reported by `hw.model` (e.g., "MacBookPro16,1").
    pub identifier: String,
    /// Diagonal of the built-in display in inches, 0 when there is none.
    pub display_size_inches: f32,
    /// Marketing name (e.g., "MacBook Pro (16-inch, 2019)").
    pub product_name: String,
}

impl ModelRecord {
    pub fn new(
        identifier: impl Into<String>,
        display_size_inches: f32,
        product_name: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            display_size_inches,
            product_name: product_name.into(),
        }
    }

    /// Record used when an identifier is missing from the catalog.
    pub fn generic(identifier: impl Into<String>) -> Self {
        Self::new(identifier, 0.0, GENERIC_PRODUCT_NAME)
    }

    /// Whether the product name is the generic "Mac" placeholder.
    pub fn is_generic(&self) -> bool {
        self.product_name == GENERIC_PRODUCT_NAME
    }

    pub fn mac_type(&self) -> MacType {
        MacType::classify(&self.identifier, &self.product_name)
    }
}

#[derive(Deserialize)]
struct CatalogDocument {
    models: HashMap<String, CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    display_size_inches: f32,
    product_name: String,
}

/// Read-only mapping from model identifier to [`ModelRecord`].
///
/// Lookups are exact: no case folding, trimming or prefix matching.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    records: HashMap<String, ModelRecord>,
}

impl ModelCatalog {
    /// The catalog compiled into the crate.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Parse a catalog from a TOML document with a `[models]` table.
    pub fn from_toml_str(content: &str) -> Result<Self, DomainError> {
        let doc: CatalogDocument =
            toml::from_str(content).map_err(|e| DomainError::Catalog(e.to_string()))?;

        let records = doc.models.into_iter().map(|(identifier, entry)| {
            ModelRecord::new(identifier, entry.display_size_inches, entry.product_name)
        });
        Ok(Self::from_records(records))
    }

    /// Build a catalog from records. Later duplicates replace earlier ones.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ModelRecord>,
    {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.identifier.clone(), r))
                .collect(),
        }
    }

    /// Catalog holding only the "Unknown" and "Mac" catch-all rows.
    pub fn sentinels() -> Self {
        Self::from_records([
            ModelRecord::new(UNKNOWN_IDENTIFIER, 0.0, "Mac (UNKNOWN)"),
            ModelRecord::generic(GENERIC_PRODUCT_NAME),
        ])
    }

    /// Find a record by exact identifier.
    pub fn lookup(&self, identifier: &str) -> Option<&ModelRecord> {
        self.records.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All identifiers, sorted for stable output.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let parsed = ModelCatalog::from_toml_str(BUILTIN_CATALOG).unwrap();
        assert!(parsed.len() > 100);
        assert_eq!(ModelCatalog::builtin().len(), parsed.len());
    }

    #[test]
    fn test_builtin_sentinels() {
        let catalog = ModelCatalog::builtin();

        let unknown = catalog.lookup("Unknown").unwrap();
        assert_eq!(unknown.display_size_inches, 0.0);
        assert_eq!(unknown.product_name, "Mac (UNKNOWN)");

        let mac = catalog.lookup("Mac").unwrap();
        assert_eq!(mac.display_size_inches, 0.0);
        assert!(mac.is_generic());
    }

    #[test]
    fn test_builtin_known_models() {
        let catalog = ModelCatalog::builtin();

        let imac = catalog.lookup("iMac18,2").unwrap();
        assert_eq!(imac.display_size_inches, 21.5);
        assert_eq!(imac.product_name, "iMac (Retina 4K, 2017)");

        assert_eq!(imac.mac_type(), MacType::Desktop);

        let mac_pro = catalog.lookup("MacPro7,1").unwrap();
        assert_eq!(mac_pro.product_name, "Mac Pro (2019)");
        assert!(!mac_pro.is_generic());

        let air = catalog.lookup("Mac14,2").unwrap();
        assert_eq!(air.mac_type(), MacType::Laptop);
    }

    #[test]
    fn test_lookup_is_exact() {
        let catalog = ModelCatalog::builtin();
        assert!(catalog.lookup("imac18,2").is_none());
        assert!(catalog.lookup(" iMac18,2").is_none());
        assert!(catalog.lookup("iMac18").is_none());
    }

    #[test]
    fn test_escaped_quotes_survive() {
        let catalog = ModelCatalog::builtin();
        let record = catalog.lookup("iMac4,1").unwrap();
        assert_eq!(record.product_name, "iMac 17-Inch \"Core Duo\" 1.83");
    }

    #[test]
    fn test_invalid_document_is_rejected() {
        let err = ModelCatalog::from_toml_str("[models]\n\"X1,1\" = { product_name = 3 }\n");
        assert!(matches!(err, Err(DomainError::Catalog(_))));
    }

    #[test]
    fn test_sentinel_only_catalog() {
        let catalog = ModelCatalog::sentinels();
        assert_eq!(catalog.identifiers(), vec!["Mac", "Unknown"]);
        assert!(catalog.lookup("iMac18,2").is_none());
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_identifiers_sorted() {
        let catalog = ModelCatalog::from_records([
            ModelRecord::generic("b"),
            ModelRecord::generic("a"),
        ]);
        assert_eq!(catalog.identifiers(), vec!["a", "b"]);
    }
}
