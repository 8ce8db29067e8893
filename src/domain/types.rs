//! Typed records produced by boundary validation, and the validation entry
//! points themselves.
//!
//! A record is only ever constructed from a payload that already passed its
//! schema walk, so deserialization here cannot reject a well-formed request.
//! Optional fields serialize as explicit `null` so a validated record
//! re-serialized to its wire shape reproduces the fields supplied plus
//! explicit defaults for the ones omitted.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::error::{FieldIssue, ValidationError};
use super::schema::SchemaId;
use super::value::ValueMap;

/// A record kind registered in the schema catalog.
pub trait BoundaryRecord: DeserializeOwned + Serialize {
    /// The schema this record validates against.
    const SCHEMA: SchemaId;
}

/// Opaque wallet address mapping owned by the requesting user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WalletAddressRecord {
    #[schema(value_type = Object)]
    pub wallet_address: ValueMap,
}

/// Opaque event payload forwarded by an upstream producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventRecord {
    #[schema(value_type = Object)]
    pub event_data: ValueMap,
}

/// Batch account lookup by address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountsQuery {
    pub addresses: Vec<String>,
}

/// A pre-encoded transaction awaiting submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TransactionSubmission {
    pub transaction: String,
}

/// Invoice/payment linkage for the billing service.
///
/// `amount` stays a pre-formatted decimal string; the billing backend owns
/// parsing and currency rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub invoice_id: String,
    pub service_id: String,
    pub user_id: String,
    pub amount: String,
    pub expiration_date: Option<String>,
    pub status: Option<String>,
}

/// A logistics/subscription service listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCatalogEntry {
    pub service_id: String,
    pub category: String,
    pub description: String,
    pub name: String,
    pub r#type: String,
    #[schema(value_type = Option<Object>)]
    pub price: Option<ValueMap>,
    pub provider_id: Option<String>,
    pub reviews_id: Option<String>,
}

/// A robot model listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RobotCatalogEntry {
    pub manufacturer: String,
    pub manufacturer_id: String,
    pub model_id: String,
    pub description: String,
    #[schema(value_type = Option<Object>)]
    pub price: Option<ValueMap>,
    pub image_url: Option<String>,
}

/// Pricing for one robot model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceEntry {
    pub model_id: String,
    pub subscription_price: f64,
    pub premium_price: Option<f64>,
}

/// A software catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SoftwareCatalogEntry {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub compatibility: Vec<String>,
    pub license: String,
    pub documentation_url: String,
    pub image_url: Option<String>,
}

impl BoundaryRecord for WalletAddressRecord {
    const SCHEMA: SchemaId = SchemaId::WalletAddress;
}
impl BoundaryRecord for EventRecord {
    const SCHEMA: SchemaId = SchemaId::Event;
}
impl BoundaryRecord for AccountsQuery {
    const SCHEMA: SchemaId = SchemaId::Accounts;
}
impl BoundaryRecord for TransactionSubmission {
    const SCHEMA: SchemaId = SchemaId::Transaction;
}
impl BoundaryRecord for PaymentRecord {
    const SCHEMA: SchemaId = SchemaId::Payment;
}
impl BoundaryRecord for ServiceCatalogEntry {
    const SCHEMA: SchemaId = SchemaId::Service;
}
impl BoundaryRecord for RobotCatalogEntry {
    const SCHEMA: SchemaId = SchemaId::Robot;
}
impl BoundaryRecord for PriceEntry {
    const SCHEMA: SchemaId = SchemaId::Price;
}
impl BoundaryRecord for SoftwareCatalogEntry {
    const SCHEMA: SchemaId = SchemaId::Software;
}

/// A validated record, tagged by the schema that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedRecord {
    WalletAddress(WalletAddressRecord),
    Event(EventRecord),
    Accounts(AccountsQuery),
    Transaction(TransactionSubmission),
    Payment(PaymentRecord),
    Service(ServiceCatalogEntry),
    Robot(RobotCatalogEntry),
    Price(PriceEntry),
    Software(SoftwareCatalogEntry),
}

impl TypedRecord {
    pub fn schema(&self) -> SchemaId {
        match self {
            TypedRecord::WalletAddress(_) => SchemaId::WalletAddress,
            TypedRecord::Event(_) => SchemaId::Event,
            TypedRecord::Accounts(_) => SchemaId::Accounts,
            TypedRecord::Transaction(_) => SchemaId::Transaction,
            TypedRecord::Payment(_) => SchemaId::Payment,
            TypedRecord::Service(_) => SchemaId::Service,
            TypedRecord::Robot(_) => SchemaId::Robot,
            TypedRecord::Price(_) => SchemaId::Price,
            TypedRecord::Software(_) => SchemaId::Software,
        }
    }
}

/// Validate `payload` against `schema`, producing the corresponding record.
pub fn validate(schema: SchemaId, payload: &Value) -> Result<TypedRecord, ValidationError> {
    schema.descriptor().check(payload)?;
    let record = match schema {
        SchemaId::WalletAddress => TypedRecord::WalletAddress(decode(payload)?),
        SchemaId::Event => TypedRecord::Event(decode(payload)?),
        SchemaId::Accounts => TypedRecord::Accounts(decode(payload)?),
        SchemaId::Transaction => TypedRecord::Transaction(decode(payload)?),
        SchemaId::Payment => TypedRecord::Payment(decode(payload)?),
        SchemaId::Service => TypedRecord::Service(decode(payload)?),
        SchemaId::Robot => TypedRecord::Robot(decode(payload)?),
        SchemaId::Price => TypedRecord::Price(decode(payload)?),
        SchemaId::Software => TypedRecord::Software(decode(payload)?),
    };
    Ok(record)
}

/// Validate `payload` against `T`'s schema.
pub fn validate_as<T: BoundaryRecord>(payload: &Value) -> Result<T, ValidationError> {
    T::SCHEMA.descriptor().check(payload)?;
    decode(payload)
}

fn decode<T: DeserializeOwned>(payload: &Value) -> Result<T, ValidationError> {
    serde_json::from_value(payload.clone()).map_err(|err| {
        ValidationError::new(vec![FieldIssue::shape("payload", err.to_string())])
    })
}

/// Health check status for the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health check response for the boundary service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub schemas: usize,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn current() -> Self {
        Self {
            status: HealthStatus::Healthy,
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            schemas: SchemaId::ALL.len(),
            timestamp: Utc::now(),
        }
    }
}
