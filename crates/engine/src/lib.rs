//! dynmsg Engine - Runtime Record Type Synthesis
//!
//! This crate turns [`Schema`](dynmsg_schema::Schema)s that are only known at
//! runtime into reusable record types with named, type-checked fields.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       TypeRegistry                          │
//! │   synthesize(schema) → Arc<RecordType>   (cached by name)   │
//! │   lookup(name)       → Option<Arc<RecordType>>              │
//! └─────────────────────────────┬───────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        RecordType                           │
//! │   fields: [FieldDef { name, kind, slot }]                   │
//! │   new_instance() → Record                                   │
//! │   get(record, field) / set(record, field, value)            │
//! └─────────────────────────────┬───────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Record                             │
//! │   Arc<RecordType> + Vec<Value> (one slot per field)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identity
//!
//! A registry hands out the same `Arc<RecordType>` for a name every time, so
//! "same contract" checks are a pointer comparison via [`RecordType::same`].
//! Records remember the handle that created them and are rejected by any
//! other handle with [`RecordError::ForeignInstance`].
//!
//! # Example
//!
//! ```
//! use dynmsg_engine::{TypeRegistry, Value};
//! use dynmsg_schema::Schema;
//!
//! let registry = TypeRegistry::new();
//! let person = registry
//!     .synthesize(&Schema::builder("Person").text("name").integer("age").build())
//!     .unwrap();
//!
//! let mut record = person.new_instance();
//! person.set(&mut record, "age", 42).unwrap();
//! assert_eq!(person.get(&record, "age").unwrap(), &Value::Integer(42));
//! ```

pub mod contract;
pub mod error;
pub mod record;
pub mod record_type;
pub mod registry;
pub mod value;

pub use contract::MessageContract;
pub use error::{RecordError, SynthesisError};
pub use record::Record;
pub use record_type::{FieldDef, FieldKind, RecordType};
pub use registry::TypeRegistry;
pub use value::{FromValue, Value};

// Re-export the schema crate for convenience
pub use dynmsg_schema as schema;
