//! Domain layer containing the schema catalog, typed records, and the closed
//! error taxonomy.

pub mod error;
pub mod schema;
pub mod types;
pub mod value;

pub use error::{ApiError, ErrorBody, ErrorKind, FieldIssue, RateLimitResponse, ValidationError};
pub use schema::{FieldShape, FieldSpec, SchemaDescriptor, SchemaId};
pub use types::{
    AccountsQuery, BoundaryRecord, EventRecord, HealthResponse, HealthStatus, PaymentRecord,
    PriceEntry, RobotCatalogEntry, ServiceCatalogEntry, SoftwareCatalogEntry,
    TransactionSubmission, TypedRecord, WalletAddressRecord, validate, validate_as,
};
pub use value::{MapValue, ValueMap};
