//! Application service layer.
//!
//! Wraps the domain validation entry points with logging and metrics so that
//! every accept/reject decision at the boundary is observable.

use serde_json::Value;
use tracing::{instrument, warn};

use crate::domain::{self, ApiError, BoundaryRecord, SchemaId, TypedRecord};

/// Boundary service orchestrating schema validation and failure
/// classification for the transport layer.
///
/// Validation is pure and stateless; concurrent calls for independent
/// requests share nothing.
#[derive(Debug, Default)]
pub struct BoundaryService;

impl BoundaryService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validates a payload against a statically known record type.
    ///
    /// # Errors
    ///
    /// Returns a `BadRequest` classification listing every offending field
    /// when the payload does not satisfy the record's schema.
    #[instrument(skip(self, payload), fields(schema = %T::SCHEMA))]
    pub fn validate_record<T: BoundaryRecord>(&self, payload: &Value) -> Result<T, ApiError> {
        match domain::validate_as::<T>(payload) {
            Ok(record) => {
                track(T::SCHEMA, "accepted");
                Ok(record)
            }
            Err(err) => {
                warn!(error = %err, "Payload rejected by schema validation");
                track(T::SCHEMA, "rejected");
                Err(ApiError::from(err))
            }
        }
    }

    /// Validates a payload against a schema selected by name at runtime.
    ///
    /// # Errors
    ///
    /// `NotFound` when no schema carries the given name; `BadRequest` when
    /// the payload fails the schema walk.
    #[instrument(skip(self, payload))]
    pub fn validate_named(&self, schema: &str, payload: &Value) -> Result<TypedRecord, ApiError> {
        let Some(schema) = SchemaId::from_name(schema) else {
            warn!("Validation requested for unknown schema");
            return Err(ApiError::not_found(format!("Unknown schema: {schema}")));
        };

        match domain::validate(schema, payload) {
            Ok(record) => {
                track(schema, "accepted");
                Ok(record)
            }
            Err(err) => {
                warn!(error = %err, "Payload rejected by schema validation");
                track(schema, "rejected");
                Err(ApiError::from(err))
            }
        }
    }
}

fn track(schema: SchemaId, outcome: &'static str) {
    metrics::counter!(
        "boundary_validations_total",
        "schema" => schema.name(),
        "outcome" => outcome
    )
    .increment(1);
}
