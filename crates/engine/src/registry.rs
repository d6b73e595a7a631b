//! Type cache and synthesis
//!
//! [`TypeRegistry`] maps schema names to synthesized [`RecordType`] handles.
//! Entries are written once and never replaced, so a name always resolves to
//! the same `Arc` for the lifetime of the registry.
//!
//! # Concurrency
//!
//! ```text
//! synthesize(schema)
//!   │
//!   ├─ types.get(name) ──────────────── hit ──► return cached handle
//!   │
//!   ├─ in_flight[name].lock()          (per-name gate, other names unaffected)
//!   │    ├─ types.get(name) ─────────── hit ──► return winner's handle
//!   │    ├─ validate + resolve kinds
//!   │    └─ types.entry(name).or_insert(new)  (insert-if-absent)
//!   │
//!   └─ return published handle
//! ```
//!
//! Published handles live in a `DashMap`, so `lookup` and the cache-hit path
//! never wait on a synthesis in progress. The per-name gate keeps concurrent
//! first requests from building the same type twice; the insert-if-absent
//! publish keeps identity even if two builders ever slip past the gate.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, trace, warn, Level};

use dynmsg_schema::{FieldType, Schema};

use crate::error::SynthesisError;
use crate::record_type::{FieldKind, RecordType};

/// Registry of synthesized record types, keyed by schema name
#[derive(Default)]
pub struct TypeRegistry {
    /// Published handles
    types: DashMap<String, Arc<RecordType>>,
    /// Per-name gates for synthesis in progress
    in_flight: DashMap<String, Arc<Mutex<()>>>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record type for `schema`, synthesizing it on first request
    ///
    /// The cache is keyed by name only. A later request under a known name
    /// returns the first type even if its field list differs; the mismatch is
    /// logged as a warning.
    ///
    /// # Errors
    ///
    /// - [`SynthesisError::InvalidSchema`] for a bad type name, a bad field
    ///   name, or a duplicate field
    /// - [`SynthesisError::UnsupportedFieldKind`] for an unknown kind or a
    ///   reference to a record type that has not been synthesized
    ///
    /// A failure leaves no entry behind.
    pub fn synthesize(&self, schema: &Schema) -> Result<Arc<RecordType>, SynthesisError> {
        if let Some(existing) = self.cached(schema) {
            return Ok(existing);
        }

        let gate = Arc::clone(self.in_flight.entry(schema.name.clone()).or_default().value());
        let result = {
            let _guard = gate.lock();

            // Another caller may have finished while we waited for the gate
            match self.cached(schema) {
                Some(existing) => Ok(existing),
                None => self.build(schema).map(|built| self.publish(built)),
            }
        };

        self.in_flight
            .remove_if(&schema.name, |_, current| Arc::ptr_eq(current, &gate));

        result
    }

    /// Synthesize a list of schemas in order
    ///
    /// Later schemas may refer to earlier ones. Returns one result per
    /// schema, in the same order.
    pub fn synthesize_all(
        &self,
        schemas: &[Schema],
    ) -> Vec<Result<Arc<RecordType>, SynthesisError>> {
        schemas.iter().map(|schema| self.synthesize(schema)).collect()
    }

    /// Get a previously synthesized record type
    ///
    /// Never synthesizes. Returns `None` for names that were never
    /// synthesized.
    pub fn lookup(&self, name: &str) -> Option<Arc<RecordType>> {
        self.types.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Check if a record type is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of registered record types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Sorted snapshot of the registered names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.iter().map(|e| e.key().clone()).collect();
        names.sort_unstable();
        names
    }

    fn cached(&self, schema: &Schema) -> Option<Arc<RecordType>> {
        let existing = self.lookup(&schema.name)?;

        // Only pay for the comparison when the warning can be seen
        if tracing::enabled!(Level::WARN) && conflicts(&existing, schema) {
            warn!(
                "Record type {} already synthesized with fingerprint {:#018x}; \
                 ignoring request with different fields (fingerprint {:#018x})",
                schema.name,
                existing.fingerprint(),
                schema.fingerprint()
            );
        } else {
            trace!("Cache hit for {}", schema.name);
        }

        Some(existing)
    }

    /// Validate the schema and resolve its field kinds (no publishing)
    fn build(&self, schema: &Schema) -> Result<RecordType, SynthesisError> {
        schema
            .validate()
            .map_err(|reason| SynthesisError::InvalidSchema {
                name: schema.name.clone(),
                reason,
            })?;

        let resolved = schema
            .fields
            .iter()
            .map(|field| {
                self.resolve_kind(schema, &field.name, &field.kind)
                    .map(|kind| (field.name.clone(), kind))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RecordType::from_resolved(
            schema.name.clone(),
            resolved,
            schema.fingerprint(),
        ))
    }

    fn resolve_kind(
        &self,
        schema: &Schema,
        field: &str,
        declared: &FieldType,
    ) -> Result<FieldKind, SynthesisError> {
        let unsupported = || SynthesisError::UnsupportedFieldKind {
            schema: schema.name.clone(),
            field: field.to_string(),
            kind: declared.canonical_name(),
        };

        match declared {
            FieldType::Integer => Ok(FieldKind::Integer),
            FieldType::Float => Ok(FieldKind::Float),
            FieldType::Text => Ok(FieldKind::Text),
            FieldType::Boolean => Ok(FieldKind::Boolean),
            FieldType::Bytes => Ok(FieldKind::Bytes),
            // Self references are not in the cache yet, so they fail here too
            FieldType::Record(target) => self
                .lookup(target)
                .map(FieldKind::Record)
                .ok_or_else(unsupported),
            FieldType::Unsupported(_) => Err(unsupported()),
        }
    }

    /// Insert-if-absent; returns whichever handle ends up registered
    fn publish(&self, built: RecordType) -> Arc<RecordType> {
        let name = built.name().to_string();
        let field_count = built.len();
        let candidate = Arc::new(built);

        let published = Arc::clone(
            self.types
                .entry(name.clone())
                .or_insert_with(|| Arc::clone(&candidate))
                .value(),
        );

        if Arc::ptr_eq(&published, &candidate) {
            debug!("Synthesized record type {} ({} fields)", name, field_count);
        } else {
            debug!("Record type {} published concurrently, using existing", name);
        }

        published
    }
}

/// Check whether `schema` describes a different layout than `existing`
fn conflicts(existing: &RecordType, schema: &Schema) -> bool {
    existing.len() != schema.fields.len() || existing.fingerprint() != schema.fingerprint()
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}
