//! JSON mapping for records
//!
//! Serialization components outside this crate exchange message bodies as
//! JSON. This module maps records to `serde_json::Value` objects and back,
//! going through the record type's checked accessors.
//!
//! | Field kind | JSON |
//! |------------|------|
//! | integer | number (must fit `i64`) |
//! | float | number |
//! | text | string |
//! | boolean | `true` / `false` |
//! | bytes | array of numbers `0..=255` |
//! | record | object, or `null` |

use std::sync::Arc;

use serde_json::{Map, Number, Value as Json};

use dynmsg_engine::{FieldKind, Record, RecordError, RecordType, Value};

/// Error type for JSON mapping
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsonError {
    /// A record body must be a JSON object
    #[error("Expected JSON object for record type `{record_type}`, found {found}")]
    NotAnObject { record_type: String, found: String },

    /// JSON number does not fit the integer field
    #[error("Integer out of range for field `{field}`: {value}")]
    IntegerOutOfRange { field: String, value: String },

    /// Field access failed (unknown field, kind mismatch)
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Convert a record into a JSON object, fields in layout order
pub fn to_json(record: &Record) -> Json {
    let mut object = Map::with_capacity(record.record_type().len());
    for (name, value) in record.iter() {
        object.insert(name.to_string(), value_to_json(value));
    }
    Json::Object(object)
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Integer(v) => Json::from(*v),
        // NaN and infinities have no JSON form
        Value::Float(v) => Number::from_f64(*v).map_or(Json::Null, Json::Number),
        Value::Text(v) => Json::String(v.clone()),
        Value::Boolean(v) => Json::Bool(*v),
        Value::Bytes(v) => Json::Array(v.iter().map(|b| Json::from(*b)).collect()),
        Value::Record(nested) => to_json(nested),
        Value::Null => Json::Null,
    }
}

/// Build a record of `record_type` from a JSON object
///
/// Keys missing from the object keep their zero value; keys the record type
/// does not declare are rejected.
pub fn from_json(record_type: &Arc<RecordType>, json: &Json) -> Result<Record, JsonError> {
    let object = json.as_object().ok_or_else(|| JsonError::NotAnObject {
        record_type: record_type.name().to_string(),
        found: json_kind(json).to_string(),
    })?;

    let mut record = record_type.new_instance();
    for (key, raw) in object {
        let def = record_type
            .field(key)
            .ok_or_else(|| RecordError::UnknownField {
                record_type: record_type.name().to_string(),
                field: key.clone(),
            })?;

        let value = json_to_value(def.name(), def.kind(), raw)?;
        record_type.set(&mut record, key, value)?;
    }

    Ok(record)
}

fn json_to_value(field: &str, kind: &FieldKind, raw: &Json) -> Result<Value, JsonError> {
    let mismatch = || {
        JsonError::Record(RecordError::TypeMismatch {
            field: field.to_string(),
            expected: kind.to_string(),
            found: json_kind(raw).to_string(),
        })
    };

    match (kind, raw) {
        (FieldKind::Integer, Json::Number(n)) => {
            if let Some(v) = n.as_i64() {
                Ok(Value::Integer(v))
            } else if n.is_u64() {
                Err(JsonError::IntegerOutOfRange {
                    field: field.to_string(),
                    value: n.to_string(),
                })
            } else {
                Err(mismatch())
            }
        }
        (FieldKind::Float, Json::Number(n)) => n.as_f64().map(Value::Float).ok_or_else(mismatch),
        (FieldKind::Text, Json::String(s)) => Ok(Value::Text(s.clone())),
        (FieldKind::Boolean, Json::Bool(b)) => Ok(Value::Boolean(*b)),
        (FieldKind::Bytes, Json::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(mismatch)
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(Value::Bytes),
        (FieldKind::Record(_), Json::Null) => Ok(Value::Null),
        (FieldKind::Record(nested), Json::Object(_)) => from_json(nested, raw).map(Value::from),
        _ => Err(mismatch()),
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(n) if n.is_f64() => "float",
        Json::Number(_) => "integer",
        Json::String(_) => "text",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
