//! Schema catalog files
//!
//! A catalog lists message contracts known at startup. Schemas are kept in
//! file order so a contract can refer to any contract declared above it.
//!
//! ```toml
//! [[schema]]
//! name = "Contracts.Address"
//! fields = [{ name = "city", kind = "text" }]
//!
//! [[schema]]
//! name = "Contracts.OrderPlaced"
//! fields = [
//!     { name = "order_id", kind = "string" },
//!     { name = "quantity", kind = "int" },
//!     { name = "shipping", kind = "record:Contracts.Address" },
//! ]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use dynmsg_schema::Schema;

use super::ConfigResult;

/// Ordered list of schemas loaded from a TOML catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    #[serde(default, rename = "schema")]
    pub schemas: Vec<Schema>,
}

impl SchemaCatalog {
    pub fn new(schemas: Vec<Schema>) -> Self {
        Self { schemas }
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a catalog file
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::debug!(
            "Loaded {} schemas from catalog {:?}",
            catalog.schemas.len(),
            path
        );
        Ok(catalog)
    }

    /// Write the catalog as TOML
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Find a schema by name
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynmsg_schema::FieldType;

    const CATALOG: &str = r#"
        [[schema]]
        name = "Contracts.Address"
        fields = [{ name = "city", kind = "text" }]

        [[schema]]
        name = "Contracts.OrderPlaced"
        fields = [
            { name = "order_id", kind = "string" },
            { name = "quantity", kind = "int" },
            { name = "shipping", kind = "record:Contracts.Address" },
        ]

        [[schema]]
        name = "Contracts.Heartbeat"
    "#;

    #[test]
    fn test_parse_catalog_keeps_order() {
        let catalog = SchemaCatalog::from_toml_str(CATALOG).unwrap();
        let names: Vec<_> = catalog.schemas.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Contracts.Address",
                "Contracts.OrderPlaced",
                "Contracts.Heartbeat"
            ]
        );

        let order = catalog.get("Contracts.OrderPlaced").unwrap();
        assert_eq!(
            order.field("shipping").map(|f| &f.kind),
            Some(&FieldType::record("Contracts.Address"))
        );
        assert!(catalog.get("Contracts.Heartbeat").unwrap().fields.is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = SchemaCatalog::from_toml_str("").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_catalog_round_trip() {
        let catalog = SchemaCatalog::from_toml_str(CATALOG).unwrap();
        let text = catalog.to_toml_string().unwrap();
        assert_eq!(SchemaCatalog::from_toml_str(&text).unwrap(), catalog);
    }

    #[test]
    fn test_malformed_catalog() {
        let err = SchemaCatalog::from_toml_str("[[schema]]\nfields = 3").unwrap_err();
        assert!(matches!(err, crate::config::ConfigError::ParseError(_)));
    }
}
