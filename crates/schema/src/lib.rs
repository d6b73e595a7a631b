//! dynmsg schema - Message Contract Definitions
//!
//! This crate contains the input model for runtime type synthesis: a
//! [`Schema`] is a type name plus an ordered list of [`FieldDescriptor`]s.
//! Schemas usually come from configuration or discovery at runtime, so
//! everything here is plain data that can be deserialized from TOML/JSON.
//!
//! # Modules
//!
//! - [`field`] - Field descriptors and declared field types
//! - [`schema`] - Schema definition, builder and validation
//!
//! # Example
//!
//! ```
//! use dynmsg_schema::{FieldType, Schema};
//!
//! let schema = Schema::builder("OrderPlaced")
//!     .text("order_id")
//!     .integer("quantity")
//!     .float("price")
//!     .build();
//!
//! assert_eq!(schema.fields.len(), 3);
//! assert_eq!(schema.field("quantity").map(|f| &f.kind), Some(&FieldType::Integer));
//! assert!(schema.validate().is_ok());
//! ```

pub mod field;
mod hash;
pub mod schema;

pub use field::{FieldDescriptor, FieldType};
pub use schema::{is_valid_identifier, Schema, SchemaBuilder, SchemaViolation};
