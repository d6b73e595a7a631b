//! Gateway composition root
//!
//! [`Gateway`] owns the process-wide [`TypeRegistry`] together with the core
//! configuration. Components that need message types are handed the gateway
//! (or a clone of its registry `Arc`) instead of reaching for a global.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use dynmsg_engine::{
    MessageContract, Record, RecordError, RecordType, SynthesisError, TypeRegistry,
};

use crate::config::{ConfigError, CoreConfig, SchemaCatalog};
use crate::json::{self, JsonError};

/// Error type for gateway operations
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Json(#[from] JsonError),

    /// No record type has been synthesized under this name
    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),
}

/// A record reference that cannot resolve where it appears in a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// Schema holding the reference
    pub schema: String,
    /// Referenced record type name
    pub target: String,
    /// The target is declared further down the catalog
    pub declared_later: bool,
}

/// Outcome of synthesizing a schema catalog
#[derive(Debug, Default)]
pub struct CatalogReport {
    /// Names synthesized (or already present), in catalog order
    pub synthesized: Vec<String>,
    /// Schemas that failed, with the reason
    pub failures: Vec<(String, SynthesisError)>,
    /// References found before synthesis that point at nothing registered
    /// or declared above
    pub unresolved: Vec<UnresolvedReference>,
}

impl CatalogReport {
    /// Check if every schema in the catalog was synthesized
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Composition root holding the type registry and configuration
pub struct Gateway {
    registry: Arc<TypeRegistry>,
    config: RwLock<CoreConfig>,
}

impl Gateway {
    /// Create a gateway with a fresh, empty registry
    pub fn new(config: CoreConfig) -> Self {
        Self::with_registry(config, Arc::new(TypeRegistry::new()))
    }

    /// Create a gateway around an existing registry
    pub fn with_registry(config: CoreConfig, registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            config: RwLock::new(config),
        }
    }

    /// Start a gateway from the config directory
    ///
    /// Loads (or creates) `configs/core.toml` and synthesizes the configured
    /// catalog. Catalog entries that fail are logged and skipped.
    pub fn from_config_dir() -> Result<Self, GatewayError> {
        let config = CoreConfig::load()?;
        let catalog_file = config.catalog_file()?;
        let gateway = Self::new(config);

        if let Some(path) = catalog_file {
            let catalog = SchemaCatalog::load_from(&path)?;
            gateway.load_catalog(&catalog);
        }

        Ok(gateway)
    }

    /// The type registry
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> CoreConfig {
        self.config.read().clone()
    }

    /// Re-read `configs/core.toml`
    ///
    /// Already synthesized types are unaffected.
    pub fn reload_config(&self) -> Result<(), ConfigError> {
        self.config.write().reload()
    }

    /// Synthesize every schema of a catalog, in order
    pub fn load_catalog(&self, catalog: &SchemaCatalog) -> CatalogReport {
        let mut report = CatalogReport {
            unresolved: self.unresolved_references(catalog),
            ..CatalogReport::default()
        };

        for (schema, result) in catalog
            .schemas
            .iter()
            .zip(self.registry.synthesize_all(&catalog.schemas))
        {
            match result {
                Ok(record_type) => {
                    debug!(
                        "Catalog type {} ready ({} fields)",
                        record_type.name(),
                        record_type.len()
                    );
                    report.synthesized.push(schema.name.clone());
                }
                Err(e) => {
                    error!("Failed to synthesize {}: {}", schema.name, e);
                    report.failures.push((schema.name.clone(), e));
                }
            }
        }

        if report.is_ok() {
            info!("Loaded {} message types", report.synthesized.len());
        } else {
            warn!(
                "Loaded {} message types, {} failed",
                report.synthesized.len(),
                report.failures.len()
            );
        }

        report
    }

    /// Find record references that synthesis will not be able to resolve
    ///
    /// A reference resolves when its target is already registered or is
    /// declared above the referring schema.
    pub fn unresolved_references(&self, catalog: &SchemaCatalog) -> Vec<UnresolvedReference> {
        let mut unresolved: Vec<UnresolvedReference> = Vec::new();

        for (index, schema) in catalog.schemas.iter().enumerate() {
            let above = &catalog.schemas[..index];
            let below = &catalog.schemas[index + 1..];

            for target in schema.dependencies() {
                if self.registry.contains(target) || above.iter().any(|s| s.name == target) {
                    continue;
                }
                if unresolved
                    .iter()
                    .any(|u| u.schema == schema.name && u.target == target)
                {
                    continue;
                }

                let declared_later = below.iter().any(|s| s.name == target);
                if declared_later {
                    warn!(
                        "{} refers to {}, which is declared later in the catalog",
                        schema.name, target
                    );
                } else {
                    warn!("{} refers to unknown record type {}", schema.name, target);
                }

                unresolved.push(UnresolvedReference {
                    schema: schema.name.clone(),
                    target: target.to_string(),
                    declared_later,
                });
            }
        }

        unresolved
    }

    /// Look up a message type by name
    pub fn message_type(&self, name: &str) -> Option<Arc<RecordType>> {
        self.registry.lookup(name)
    }

    /// Create a zero-valued message of a known type
    pub fn new_message(&self, name: &str) -> Result<Record, GatewayError> {
        self.message_type(name)
            .map(|record_type| record_type.new_instance())
            .ok_or_else(|| GatewayError::UnknownMessageType(name.to_string()))
    }

    /// Build a message of a known type from a JSON body
    pub fn decode_message(
        &self,
        name: &str,
        body: &serde_json::Value,
    ) -> Result<Record, GatewayError> {
        let record_type = self
            .message_type(name)
            .ok_or_else(|| GatewayError::UnknownMessageType(name.to_string()))?;
        Ok(json::from_json(&record_type, body)?)
    }

    /// Register a typed contract, returning its record type
    pub fn register<C: MessageContract>(&self) -> Result<Arc<RecordType>, GatewayError> {
        Ok(C::record_type(&self.registry)?)
    }

    /// Create a zero-valued typed message
    pub fn create<C: MessageContract>(&self) -> Result<C, GatewayError> {
        Ok(C::create(&self.registry)?)
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("registry", &self.registry)
            .field("config", &*self.config.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynmsg_schema::Schema;

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::new(vec![
            Schema::builder("Address").text("city").build(),
            Schema::builder("Order")
                .text("id")
                .record("shipping", "Address")
                .build(),
            Schema::builder("Audit").field("at", "datetime").build(),
        ])
    }

    #[test]
    fn test_load_catalog_reports_failures() {
        let gateway = Gateway::new(CoreConfig::default());
        let report = gateway.load_catalog(&catalog());

        assert!(!report.is_ok());
        assert_eq!(report.synthesized, vec!["Address", "Order"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "Audit");
        assert!(report.unresolved.is_empty());
        assert!(gateway.message_type("Audit").is_none());
    }

    #[test]
    fn test_unresolved_references() {
        let gateway = Gateway::new(CoreConfig::default());
        let catalog = SchemaCatalog::new(vec![
            Schema::builder("Order")
                .record("shipping", "Address")
                .record("billing", "Address")
                .build(),
            Schema::builder("Address").text("city").build(),
            Schema::builder("Refund").record("order", "Order").build(),
            Schema::builder("Audit").record("actor", "User").build(),
        ]);

        let report = gateway.load_catalog(&catalog);
        assert_eq!(
            report.unresolved,
            vec![
                UnresolvedReference {
                    schema: "Order".to_string(),
                    target: "Address".to_string(),
                    declared_later: true,
                },
                UnresolvedReference {
                    schema: "Audit".to_string(),
                    target: "User".to_string(),
                    declared_later: false,
                },
            ]
        );
        // Refund's target failed itself, which shows up as a failure instead
        let failed: Vec<_> = report.failures.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(failed, vec!["Order", "Refund", "Audit"]);

        // Once Address exists, a second pass only misses User
        let again = gateway.unresolved_references(&catalog);
        assert_eq!(again.len(), 1);
        assert_eq!(again[0].target, "User");
    }

    #[test]
    fn test_new_message() {
        let gateway = Gateway::new(CoreConfig::default());
        gateway.load_catalog(&catalog());

        let mut order = gateway.new_message("Order").unwrap();
        order.set("id", "A-1").unwrap();
        assert_eq!(order.type_name(), "Order");

        assert!(matches!(
            gateway.new_message("Missing"),
            Err(GatewayError::UnknownMessageType(name)) if name == "Missing"
        ));
    }

    #[test]
    fn test_decode_message() {
        let gateway = Gateway::new(CoreConfig::default());
        gateway.load_catalog(&catalog());

        let body = serde_json::json!({ "id": "A-2", "shipping": { "city": "Porto" } });
        let order = gateway.decode_message("Order", &body).unwrap();
        assert_eq!(order.get_as::<String>("id").unwrap(), "A-2");

        assert!(matches!(
            gateway.decode_message("Order", &serde_json::json!({ "id": 3 })),
            Err(GatewayError::Json(_))
        ));
    }

    #[test]
    fn test_shared_registry() {
        let registry = Arc::new(TypeRegistry::new());
        let a = Gateway::with_registry(CoreConfig::default(), Arc::clone(&registry));
        let b = Gateway::with_registry(CoreConfig::default(), Arc::clone(&registry));

        a.load_catalog(&catalog());
        let from_a = a.message_type("Order").unwrap();
        let from_b = b.message_type("Order").unwrap();
        assert!(RecordType::same(&from_a, &from_b));
    }
}
