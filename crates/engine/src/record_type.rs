//! Record type handles
//!
//! A [`RecordType`] is the synthesized, immutable descriptor for one message
//! contract. It owns the field layout (one slot per declared field and a
//! name → slot index) and implements instance creation and checked field
//! access. Handles are shared as `Arc<RecordType>`; identity is pointer
//! identity, so two handles are "the same type" only if they are the same
//! allocation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dynmsg_schema::{FieldDescriptor, FieldType, Schema};

use crate::error::RecordError;
use crate::record::Record;
use crate::value::Value;

/// Resolved kind of a record field
#[derive(Clone)]
pub enum FieldKind {
    Integer,
    Float,
    Text,
    Boolean,
    Bytes,
    /// Nested record of exactly this type
    Record(Arc<RecordType>),
}

impl FieldKind {
    /// Zero value for a freshly created record
    pub fn zero_value(&self) -> Value {
        match self {
            Self::Integer => Value::Integer(0),
            Self::Float => Value::Float(0.0),
            Self::Text => Value::Text(String::new()),
            Self::Boolean => Value::Boolean(false),
            Self::Bytes => Value::Bytes(Vec::new()),
            Self::Record(_) => Value::Null,
        }
    }

    /// Check whether `value` may be stored in a field of this kind
    ///
    /// Nested records must come from the declared record type itself, not
    /// merely a type with the same name or fields.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Integer, Value::Integer(_))
            | (Self::Float, Value::Float(_))
            | (Self::Text, Value::Text(_))
            | (Self::Boolean, Value::Boolean(_))
            | (Self::Bytes, Value::Bytes(_))
            | (Self::Record(_), Value::Null) => true,
            (Self::Record(expected), Value::Record(record)) => {
                Arc::ptr_eq(expected, record.record_type())
            }
            _ => false,
        }
    }

    /// Check whether this kind is what `declared` asks for
    pub fn matches_declared(&self, declared: &FieldType) -> bool {
        match (self, declared) {
            (Self::Integer, FieldType::Integer)
            | (Self::Float, FieldType::Float)
            | (Self::Text, FieldType::Text)
            | (Self::Boolean, FieldType::Boolean)
            | (Self::Bytes, FieldType::Bytes) => true,
            (Self::Record(nested), FieldType::Record(name)) => nested.name() == name,
            _ => false,
        }
    }

    /// Declared form of this kind
    pub fn to_field_type(&self) -> FieldType {
        match self {
            Self::Integer => FieldType::Integer,
            Self::Float => FieldType::Float,
            Self::Text => FieldType::Text,
            Self::Boolean => FieldType::Boolean,
            Self::Bytes => FieldType::Bytes,
            Self::Record(nested) => FieldType::Record(nested.name().to_string()),
        }
    }
}

impl PartialEq for FieldKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Record(a), Self::Record(b)) => Arc::ptr_eq(a, b),
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Eq for FieldKind {}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("Integer"),
            Self::Float => f.write_str("Float"),
            Self::Text => f.write_str("Text"),
            Self::Boolean => f.write_str("Boolean"),
            Self::Bytes => f.write_str("Bytes"),
            // Name only: nested types can be deep
            Self::Record(nested) => f.debug_tuple("Record").field(&nested.name()).finish(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_field_type(), f)
    }
}

/// One resolved field of a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    name: String,
    kind: FieldKind,
    slot: usize,
}

impl FieldDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Storage slot index in a record
    pub fn slot(&self) -> usize {
        self.slot
    }
}

/// A synthesized record type
///
/// Created by [`TypeRegistry::synthesize`](crate::TypeRegistry::synthesize).
/// Immutable once built.
pub struct RecordType {
    name: String,
    fields: Vec<FieldDef>,
    index: HashMap<String, usize>,
    fingerprint: u64,
}

impl RecordType {
    /// Build a record type from already resolved fields
    ///
    /// Field names are assumed unique (the registry validates schemas first).
    pub(crate) fn from_resolved(
        name: String,
        resolved: Vec<(String, FieldKind)>,
        fingerprint: u64,
    ) -> Self {
        let mut fields = Vec::with_capacity(resolved.len());
        let mut index = HashMap::with_capacity(resolved.len());

        for (slot, (field_name, kind)) in resolved.into_iter().enumerate() {
            index.insert(field_name.clone(), slot);
            fields.push(FieldDef {
                name: field_name,
                kind,
                slot,
            });
        }

        Self {
            name,
            fields,
            index,
            fingerprint,
        }
    }

    /// Type name (the registry key)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in layout order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Find a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.slot_of(name).map(|slot| &self.fields[slot])
    }

    /// Slot index of a field
    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fingerprint of the schema this type was synthesized from
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Check whether two handles are the same type (pointer identity)
    #[inline]
    pub fn same(a: &Arc<RecordType>, b: &Arc<RecordType>) -> bool {
        Arc::ptr_eq(a, b)
    }

    /// Reconstruct the schema describing this type
    pub fn to_schema(&self) -> Schema {
        Schema::new(
            self.name.clone(),
            self.fields
                .iter()
                .map(|f| FieldDescriptor::new(f.name.clone(), f.kind.to_field_type()))
                .collect(),
        )
    }

    /// Create a new record with every field at its zero value
    pub fn new_instance(self: &Arc<Self>) -> Record {
        let slots = self.fields.iter().map(|f| f.kind.zero_value()).collect();
        Record::from_parts(Arc::clone(self), slots)
    }

    /// Check whether `record` was created by this handle
    #[inline]
    pub fn owns(&self, record: &Record) -> bool {
        std::ptr::eq(self, Arc::as_ptr(record.record_type()))
    }

    /// Read a field
    ///
    /// Ownership is checked before the field name, so a record of another
    /// type always fails with [`RecordError::ForeignInstance`].
    pub fn get<'r>(&self, record: &'r Record, field: &str) -> Result<&'r Value, RecordError> {
        self.check_owner(record)?;
        let slot = self.resolve(field)?;
        Ok(record.slot(slot))
    }

    /// Overwrite a field after checking the value's kind
    pub fn set(
        &self,
        record: &mut Record,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<(), RecordError> {
        self.check_owner(record)?;
        let slot = self.resolve(field)?;
        let value = value.into();

        let def = &self.fields[slot];
        if !def.kind.accepts(&value) {
            return Err(RecordError::TypeMismatch {
                field: def.name.clone(),
                expected: def.kind.to_string(),
                found: value.kind_name(),
            });
        }

        *record.slot_mut(slot) = value;
        Ok(())
    }

    fn check_owner(&self, record: &Record) -> Result<(), RecordError> {
        if self.owns(record) {
            Ok(())
        } else {
            Err(RecordError::ForeignInstance {
                expected: self.name.clone(),
                found: record.record_type().name().to_string(),
            })
        }
    }

    fn resolve(&self, field: &str) -> Result<usize, RecordError> {
        self.slot_of(field).ok_or_else(|| RecordError::UnknownField {
            record_type: self.name.clone(),
            field: field.to_string(),
        })
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("fingerprint", &format_args!("{:#018x}", self.fingerprint))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Arc<RecordType> {
        Arc::new(RecordType::from_resolved(
            "Person".to_string(),
            vec![
                ("name".to_string(), FieldKind::Text),
                ("age".to_string(), FieldKind::Integer),
                ("score".to_string(), FieldKind::Float),
                ("active".to_string(), FieldKind::Boolean),
                ("avatar".to_string(), FieldKind::Bytes),
            ],
            0,
        ))
    }

    #[test]
    fn test_layout_follows_declaration_order() {
        let rt = person();
        let slots: Vec<_> = rt.fields().iter().map(|f| (f.name(), f.slot())).collect();
        assert_eq!(
            slots,
            vec![("name", 0), ("age", 1), ("score", 2), ("active", 3), ("avatar", 4)]
        );
        assert_eq!(rt.slot_of("active"), Some(3));
        assert_eq!(rt.slot_of("missing"), None);
    }

    #[test]
    fn test_zero_values() {
        let rt = person();
        let record = rt.new_instance();
        assert_eq!(rt.get(&record, "name").unwrap(), &Value::Text(String::new()));
        assert_eq!(rt.get(&record, "age").unwrap(), &Value::Integer(0));
        assert_eq!(rt.get(&record, "score").unwrap(), &Value::Float(0.0));
        assert_eq!(rt.get(&record, "active").unwrap(), &Value::Boolean(false));
        assert_eq!(rt.get(&record, "avatar").unwrap(), &Value::Bytes(vec![]));
    }

    #[test]
    fn test_set_checks_kind() {
        let rt = person();
        let mut record = rt.new_instance();

        rt.set(&mut record, "age", 42).unwrap();
        assert_eq!(rt.get(&record, "age").unwrap(), &Value::Integer(42));

        let err = rt.set(&mut record, "age", "not a number").unwrap_err();
        assert_eq!(
            err,
            RecordError::TypeMismatch {
                field: "age".to_string(),
                expected: "integer".to_string(),
                found: "text".to_string(),
            }
        );
        // Failed set leaves the slot untouched
        assert_eq!(rt.get(&record, "age").unwrap(), &Value::Integer(42));

        assert!(rt.set(&mut record, "name", Value::Null).is_err());
    }

    #[test]
    fn test_structurally_equal_handles_are_distinct() {
        let a = person();
        let b = person();
        let record = a.new_instance();

        assert!(!RecordType::same(&a, &b));
        assert!(a.owns(&record));
        assert!(!b.owns(&record));
        assert!(matches!(
            b.get(&record, "name"),
            Err(RecordError::ForeignInstance { .. })
        ));
    }

    #[test]
    fn test_to_schema() {
        let schema = person().to_schema();
        assert_eq!(schema.name, "Person");
        assert_eq!(schema.fields.len(), 5);
        assert_eq!(schema.fields[1], FieldDescriptor::new("age", FieldType::Integer));
    }

    #[test]
    fn test_field_kind_equality_uses_identity() {
        let a = person();
        let b = person();
        assert_eq!(FieldKind::Record(a.clone()), FieldKind::Record(a.clone()));
        assert_ne!(FieldKind::Record(a), FieldKind::Record(b));
        assert_eq!(FieldKind::Text, FieldKind::Text);
        assert_ne!(FieldKind::Text, FieldKind::Bytes);
    }
}
