//! Field descriptors
//!
//! A [`FieldDescriptor`] is one `(name, kind)` pair of a schema. The kind is a
//! [`FieldType`]: one of the primitive kinds, a reference to another record
//! type by name, or an unsupported type name carried through from the source
//! definition so the engine can report it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prefix used in the textual form of a nested record reference
pub const RECORD_PREFIX: &str = "record:";

/// Declared type of a field
///
/// The textual form (used in config files) accepts a few aliases per kind:
///
/// | Kind | Accepted names |
/// |------|----------------|
/// | `Integer` | `integer`, `int`, `long`, `i64` |
/// | `Float` | `float`, `double`, `f64` |
/// | `Text` | `text`, `string` |
/// | `Boolean` | `boolean`, `bool` |
/// | `Bytes` | `bytes`, `binary` |
/// | `Record` | `record:<TypeName>` |
///
/// Anything else parses to [`FieldType::Unsupported`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Signed 64-bit integer
    Integer,
    /// 64-bit floating point
    Float,
    /// UTF-8 text
    Text,
    /// Boolean flag
    Boolean,
    /// Raw byte sequence
    Bytes,
    /// Nested record, by the name of a previously synthesized type
    Record(String),
    /// A type name outside the supported set
    Unsupported(String),
}

impl FieldType {
    /// Reference to a nested record type
    pub fn record(type_name: impl Into<String>) -> Self {
        Self::Record(type_name.into())
    }

    /// Canonical textual name (the form written back to config files)
    pub fn canonical_name(&self) -> String {
        match self {
            Self::Integer => "integer".to_string(),
            Self::Float => "float".to_string(),
            Self::Text => "text".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::Bytes => "bytes".to_string(),
            Self::Record(name) => format!("{RECORD_PREFIX}{name}"),
            Self::Unsupported(name) => name.clone(),
        }
    }
}

impl FromStr for FieldType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(target) = trimmed.strip_prefix(RECORD_PREFIX) {
            return Ok(Self::Record(target.trim().to_string()));
        }

        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "integer" | "int" | "long" | "i64" => Self::Integer,
            "float" | "double" | "f64" => Self::Float,
            "text" | "string" => Self::Text,
            "boolean" | "bool" => Self::Boolean,
            "bytes" | "binary" => Self::Bytes,
            _ => Self::Unsupported(trimmed.to_string()),
        })
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for FieldType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<FieldType> for String {
    fn from(kind: FieldType) -> Self {
        kind.canonical_name()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

/// One accessible field of a schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within the owning schema
    pub name: String,
    /// Declared kind
    pub kind: FieldType,
}

impl FieldDescriptor {
    /// Create a new field descriptor
    pub fn new(name: impl Into<String>, kind: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.kind)
    }
}
