//! Record instances
//!
//! A [`Record`] is one mutable value of a [`RecordType`]: the owning handle
//! plus one [`Value`] slot per declared field. Records are plain owned data
//! with no internal synchronization; whoever holds one is responsible for it.

use std::fmt;
use std::sync::Arc;

use crate::error::RecordError;
use crate::record_type::RecordType;
use crate::value::{FromValue, Value};

/// An instance of a synthesized record type
#[derive(Clone)]
pub struct Record {
    record_type: Arc<RecordType>,
    slots: Vec<Value>,
}

impl Record {
    pub(crate) fn from_parts(record_type: Arc<RecordType>, slots: Vec<Value>) -> Self {
        debug_assert_eq!(record_type.len(), slots.len());
        Self { record_type, slots }
    }

    /// The handle that created this record
    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    /// Type name of this record
    pub fn type_name(&self) -> &str {
        self.record_type.name()
    }

    /// Read a field through the owning handle
    pub fn get(&self, field: &str) -> Result<&Value, RecordError> {
        self.record_type.get(self, field)
    }

    /// Write a field through the owning handle
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        let record_type = Arc::clone(&self.record_type);
        record_type.set(self, field, value)
    }

    /// Read a field converted to a Rust type
    ///
    /// # Example
    ///
    /// ```
    /// use dynmsg_engine::TypeRegistry;
    /// use dynmsg_schema::Schema;
    ///
    /// let registry = TypeRegistry::new();
    /// let person = registry
    ///     .synthesize(&Schema::builder("Person").integer("age").build())
    ///     .unwrap();
    ///
    /// let mut record = person.new_instance();
    /// record.set("age", 42).unwrap();
    /// assert_eq!(record.get_as::<i64>("age").unwrap(), 42);
    /// ```
    pub fn get_as<T: FromValue>(&self, field: &str) -> Result<T, RecordError> {
        let value = self.get(field)?;
        T::from_value(value).ok_or_else(|| RecordError::TypeMismatch {
            field: field.to_string(),
            expected: T::KIND.to_string(),
            found: value.kind_name(),
        })
    }

    /// Iterate `(field name, value)` pairs in layout order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.record_type
            .fields()
            .iter()
            .map(|f| (f.name(), &self.slots[f.slot()]))
    }

    #[inline]
    pub(crate) fn slot(&self, slot: usize) -> &Value {
        &self.slots[slot]
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, slot: usize) -> &mut Value {
        &mut self.slots[slot]
    }
}

impl PartialEq for Record {
    /// Records are equal when they share a handle and hold equal values
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.record_type, &other.record_type) && self.slots == other.slots
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.record_type.name());
        for (name, value) in self.iter() {
            s.field(name, value);
        }
        s.finish()
    }
}
