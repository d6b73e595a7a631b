//! Typed views over synthesized record types
//!
//! Most contracts are only known at runtime, but some are also known when the
//! gateway is built. [`MessageContract`] lets such a contract be written as a
//! Rust struct wrapping a [`Record`] while still going through the same
//! registry, so typed and untyped code share one handle per name.
//!
//! The trait is normally implemented with `#[derive(MessageContract)]` from
//! `dynmsg-macros`.

use std::sync::Arc;

use dynmsg_schema::Schema;

use crate::error::{RecordError, SynthesisError};
use crate::record::Record;
use crate::record_type::RecordType;
use crate::registry::TypeRegistry;

/// A struct that is a typed view of one record type
pub trait MessageContract: Sized {
    /// Contract (record type) name
    const CONTRACT_NAME: &'static str;

    /// Schema declared by the struct
    fn schema() -> Schema;

    /// Wrap a record without checking it
    ///
    /// Callers must make sure the record satisfies [`Self::schema`];
    /// [`Self::from_record`] does that.
    #[doc(hidden)]
    fn wrap_unchecked(record: Record) -> Self;

    /// Borrow the underlying record
    fn record(&self) -> &Record;

    /// Unwrap the underlying record
    fn into_record(self) -> Record;

    /// Synthesize (or look up) the record type for this contract
    fn record_type(registry: &TypeRegistry) -> Result<Arc<RecordType>, SynthesisError> {
        registry.synthesize(&Self::schema())
    }

    /// Create a zero-valued message
    fn create(registry: &TypeRegistry) -> Result<Self, SynthesisError> {
        Self::record_type(registry).map(|rt| Self::wrap_unchecked(rt.new_instance()))
    }

    /// Wrap a record after checking that its type provides every declared
    /// field with the declared kind
    fn from_record(record: Record) -> Result<Self, RecordError> {
        let record_type = Arc::clone(record.record_type());
        if record_type.name() != Self::CONTRACT_NAME {
            return Err(RecordError::ForeignInstance {
                expected: Self::CONTRACT_NAME.to_string(),
                found: record_type.name().to_string(),
            });
        }

        for declared in Self::schema().fields {
            let def = record_type
                .field(&declared.name)
                .ok_or_else(|| RecordError::UnknownField {
                    record_type: record_type.name().to_string(),
                    field: declared.name.clone(),
                })?;

            if !def.kind().matches_declared(&declared.kind) {
                return Err(RecordError::TypeMismatch {
                    field: declared.name.clone(),
                    expected: declared.kind.to_string(),
                    found: def.kind().to_string(),
                });
            }
        }

        Ok(Self::wrap_unchecked(record))
    }
}
