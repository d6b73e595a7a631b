//! Schema definitions
//!
//! A [`Schema`] names a message contract and lists its fields in layout
//! order. Schemas are input only: the engine resolves them into record types
//! and does not keep them around.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::field::{FieldDescriptor, FieldType};
use crate::hash::Fingerprinter;

/// Why a schema failed validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("type name is empty")]
    EmptyName,

    #[error("type name `{0}` is not a valid identifier")]
    InvalidName(String),

    #[error("field name `{0}` is not a valid identifier")]
    InvalidFieldName(String),

    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
}

/// A message contract definition: a type name plus ordered fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Type name, also the registry key
    pub name: String,

    /// Fields in declaration (layout) order
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Create a schema from a name and field list
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Start building a schema
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Find a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check the name and field invariants
    ///
    /// Kinds are not checked here; whether a kind is supported depends on
    /// which record types the engine already knows.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        if self.name.is_empty() {
            return Err(SchemaViolation::EmptyName);
        }
        if !is_valid_identifier(&self.name) {
            return Err(SchemaViolation::InvalidName(self.name.clone()));
        }

        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if field.name.contains('.') || !is_valid_identifier(&field.name) {
                return Err(SchemaViolation::InvalidFieldName(field.name.clone()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaViolation::DuplicateField(field.name.clone()));
            }
        }

        Ok(())
    }

    /// Structural fingerprint over the name and the ordered fields
    ///
    /// Two schemas with the same fingerprint declare the same type.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Fingerprinter::new().part(&self.name);
        for field in &self.fields {
            hasher = hasher.part(&field.name).part(&field.kind.canonical_name());
        }
        hasher.finish()
    }

    /// Names of record types this schema refers to
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(|f| match &f.kind {
            FieldType::Record(target) => Some(target.as_str()),
            _ => None,
        })
    }
}

/// Check whether `s` is a valid type identifier
///
/// Identifiers start with an ASCII letter or `_` and continue with ASCII
/// alphanumerics or `_`. A `.` may separate namespace segments, each of which
/// must itself be a valid identifier (`Contracts.OrderPlaced`).
pub fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_valid_segment)
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Fluent builder for [`Schema`]
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field of any kind
    pub fn field(mut self, name: impl Into<String>, kind: impl Into<FieldType>) -> Self {
        self.fields.push(FieldDescriptor::new(name, kind));
        self
    }

    pub fn integer(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::Integer)
    }

    pub fn float(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::Float)
    }

    pub fn text(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::Text)
    }

    pub fn boolean(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::Boolean)
    }

    pub fn bytes(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::Bytes)
    }

    /// Add a nested record field referring to `type_name`
    pub fn record(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.field(name, FieldType::Record(type_name.into()))
    }

    /// Build the schema (validation happens at synthesis)
    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_rules() {
        assert!(is_valid_identifier("OrderPlaced"));
        assert!(is_valid_identifier("_internal"));
        assert!(is_valid_identifier("Contracts.V2.OrderPlaced"));
        assert!(is_valid_identifier("a1"));

        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1Order"));
        assert!(!is_valid_identifier("Order Placed"));
        assert!(!is_valid_identifier(".Order"));
        assert!(!is_valid_identifier("Order."));
        assert!(!is_valid_identifier("Contracts..Order"));
        assert!(!is_valid_identifier("Order-Placed"));
    }

    #[test]
    fn test_validate_ok() {
        let schema = Schema::builder("Person").text("name").integer("age").build();
        assert_eq!(schema.validate(), Ok(()));
    }

    #[test]
    fn test_validate_empty_name() {
        let schema = Schema::new("", vec![]);
        assert_eq!(schema.validate(), Err(SchemaViolation::EmptyName));
    }

    #[test]
    fn test_validate_duplicate_field() {
        let schema = Schema::builder("Person").text("name").integer("name").build();
        assert_eq!(
            schema.validate(),
            Err(SchemaViolation::DuplicateField("name".to_string()))
        );
    }

    #[test]
    fn test_validate_field_name() {
        let schema = Schema::builder("Person").text("first.name").build();
        assert_eq!(
            schema.validate(),
            Err(SchemaViolation::InvalidFieldName("first.name".to_string()))
        );

        let schema = Schema::builder("Person").text("").build();
        assert!(matches!(
            schema.validate(),
            Err(SchemaViolation::InvalidFieldName(_))
        ));
    }

    #[test]
    fn test_fingerprint_tracks_fields() {
        let a = Schema::builder("Person").text("name").integer("age").build();
        let b = Schema::builder("Person").text("name").integer("age").build();
        let c = Schema::builder("Person").text("name").text("age").build();
        let d = Schema::builder("Person").integer("age").text("name").build();

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_ne!(a.fingerprint(), d.fingerprint());
    }

    #[test]
    fn test_dependencies() {
        let schema = Schema::builder("Order")
            .record("shipping", "Address")
            .integer("qty")
            .record("billing", "Address")
            .build();
        let deps: Vec<_> = schema.dependencies().collect();
        assert_eq!(deps, vec!["Address", "Address"]);
    }
}
