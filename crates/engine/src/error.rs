//! Error types for record type synthesis and field access

use dynmsg_schema::SchemaViolation;

/// Error type for [`TypeRegistry::synthesize`](crate::TypeRegistry::synthesize)
///
/// A failed synthesis publishes nothing, so the same name can be retried with
/// a corrected schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    /// Bad type name, bad field name, or a field declared twice
    #[error("Invalid schema `{name}`: {reason}")]
    InvalidSchema {
        name: String,
        reason: SchemaViolation,
    },

    /// A field kind outside the supported set, or a reference to a record
    /// type that has not been synthesized yet
    #[error("Unsupported kind `{kind}` for field {schema}.{field}")]
    UnsupportedFieldKind {
        schema: String,
        field: String,
        kind: String,
    },
}

/// Error type for record field access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// Field name not declared by the record type
    #[error("Field not found: {record_type}.{field}")]
    UnknownField { record_type: String, field: String },

    /// The record was created by a different record type
    #[error("Record of type `{found}` used through record type `{expected}`")]
    ForeignInstance { expected: String, found: String },

    /// Value kind does not match the declared field kind
    #[error("Type mismatch for field `{field}`: expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },
}
