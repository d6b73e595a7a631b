//! dynmsg Core
//!
//! Composition root for the dynamic message-type system: configuration,
//! logging setup, the [`Gateway`] and JSON mapping for records.
//!
//! # Re-exports
//!
//! This crate re-exports the lower crates for convenience:
//! - [`schema`] - schema descriptions and field kinds
//! - [`engine`] - type synthesis, records and the registry
//!
//! The `MessageContract` derive macro and trait share a name, so a single
//! `use dynmsg_core::MessageContract;` brings both into scope.
//!
//! # Example
//!
//! ```
//! use dynmsg_core::{schema::Schema, CoreConfig, Gateway};
//!
//! let gateway = Gateway::new(CoreConfig::default());
//! gateway
//!     .registry()
//!     .synthesize(&Schema::builder("Ping").integer("seq").build())
//!     .unwrap();
//!
//! let mut ping = gateway.new_message("Ping").unwrap();
//! ping.set("seq", 7).unwrap();
//! assert_eq!(dynmsg_core::json::to_json(&ping), serde_json::json!({ "seq": 7 }));
//! ```

pub use dynmsg_engine as engine;
pub use dynmsg_schema as schema;

pub mod config;
pub mod gateway;
pub mod json;
pub mod logging;

pub use config::{ConfigError, ConfigResult, CoreConfig, SchemaCatalog};
pub use gateway::{CatalogReport, Gateway, GatewayError, UnresolvedReference};
pub use json::JsonError;

pub use dynmsg_engine::{
    FieldKind, MessageContract, Record, RecordError, RecordType, SynthesisError, TypeRegistry,
    Value,
};

// Re-export macros
pub use dynmsg_macros::MessageContract;
