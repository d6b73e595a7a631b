//! Field values
//!
//! [`Value`] is the tagged slot type of a [`Record`]. Conversions into `Value`
//! go through `From`; conversions out go through [`FromValue`].

use crate::record::Record;

/// A field value stored in a record slot
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Bytes(Vec<u8>),
    /// Nested record
    Record(Box<Record>),
    /// Empty nested record reference
    Null,
}

impl Value {
    /// Name of the runtime kind, as used in error messages
    pub fn kind_name(&self) -> String {
        match self {
            Self::Integer(_) => "integer".to_string(),
            Self::Float(_) => "float".to_string(),
            Self::Text(_) => "text".to_string(),
            Self::Boolean(_) => "boolean".to_string(),
            Self::Bytes(_) => "bytes".to_string(),
            Self::Record(record) => format!("record:{}", record.record_type().name()),
            Self::Null => "null".to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Record(Box::new(v))
    }
}

impl From<Option<Record>> for Value {
    fn from(v: Option<Record>) -> Self {
        v.map_or(Self::Null, Self::from)
    }
}

/// Conversion out of a [`Value`]
pub trait FromValue: Sized {
    /// Kind name reported when the conversion fails
    const KIND: &'static str;

    /// Convert, returning `None` when the value has a different kind
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for i64 {
    const KIND: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromValue for f64 {
    const KIND: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for String {
    const KIND: &'static str = "text";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for bool {
    const KIND: &'static str = "boolean";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for Vec<u8> {
    const KIND: &'static str = "bytes";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bytes().map(<[u8]>::to_vec)
    }
}

impl FromValue for Option<Record> {
    const KIND: &'static str = "record";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => other.as_record().cloned().map(Some),
        }
    }
}

impl FromValue for Value {
    const KIND: &'static str = "value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::from(1i64).kind_name(), "integer");
        assert_eq!(Value::from(1.5f64).kind_name(), "float");
        assert_eq!(Value::from("x").kind_name(), "text");
        assert_eq!(Value::from(true).kind_name(), "boolean");
        assert_eq!(Value::from(vec![1u8, 2]).kind_name(), "bytes");
        assert_eq!(Value::Null.kind_name(), "null");
    }

    #[test]
    fn test_widening_conversions() {
        assert_eq!(Value::from(7i32), Value::Integer(7));
        assert_eq!(Value::from(7u32), Value::Integer(7));
        assert_eq!(Value::from(0.5f32), Value::Float(0.5));
        assert_eq!(Value::from(None::<Record>), Value::Null);
    }

    #[test]
    fn test_from_value_rejects_other_kinds() {
        assert_eq!(i64::from_value(&Value::Integer(3)), Some(3));
        assert_eq!(i64::from_value(&Value::Text("3".into())), None);
        assert_eq!(String::from_value(&Value::Integer(3)), None);
        assert_eq!(Option::<Record>::from_value(&Value::Null), Some(None));
        assert_eq!(Option::<Record>::from_value(&Value::Boolean(false)), None);
    }
}
