//! HTTP request handlers with OpenAPI documentation.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::error;
use utoipa::OpenApi;

use crate::app::AppState;
use crate::domain::{
    AccountsQuery, ApiError, ErrorBody, EventRecord, HealthResponse, PaymentRecord, PriceEntry,
    RateLimitResponse, RobotCatalogEntry, ServiceCatalogEntry, SoftwareCatalogEntry,
    TransactionSubmission, TypedRecord, WalletAddressRecord,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Construct Boundary API",
        version = "0.1.0",
        description = "Typed request/response boundary for The Construct platform: schema-validated payloads in, structured errors out",
        license(
            name = "MIT"
        )
    ),
    paths(
        save_address_handler,
        save_event_handler,
        query_accounts_handler,
        send_transaction_handler,
        create_payment_handler,
        create_service_handler,
        create_robot_handler,
        create_price_handler,
        create_software_handler,
        validate_schema_handler,
        health_check_handler,
        liveness_handler,
        readiness_handler,
    ),
    components(
        schemas(
            WalletAddressRecord,
            EventRecord,
            AccountsQuery,
            TransactionSubmission,
            PaymentRecord,
            ServiceCatalogEntry,
            RobotCatalogEntry,
            PriceEntry,
            SoftwareCatalogEntry,
            HealthResponse,
            crate::domain::HealthStatus,
            ErrorBody,
            RateLimitResponse,
        )
    ),
    tags(
        (name = "blockchain", description = "Wallet, event, account, and transaction payloads"),
        (name = "billing", description = "Invoice and payment payloads"),
        (name = "catalog", description = "Service, robot, price, and software listings"),
        (name = "schemas", description = "Dynamic schema operations"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

fn read_json(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
    }
}

/// Validate a wallet address record
#[utoipa::path(
    post,
    path = "/addresses",
    tag = "blockchain",
    request_body = WalletAddressRecord,
    responses(
        (status = 200, description = "Validated wallet address record", body = WalletAddressRecord),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = RateLimitResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn save_address_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<WalletAddressRecord>, ApiError> {
    let payload = read_json(payload)?;
    let record = state.service.validate_record(&payload)?;
    Ok(Json(record))
}

/// Validate an event record
#[utoipa::path(
    post,
    path = "/events",
    tag = "blockchain",
    request_body = EventRecord,
    responses(
        (status = 200, description = "Validated event record", body = EventRecord),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = RateLimitResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn save_event_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EventRecord>, ApiError> {
    let payload = read_json(payload)?;
    let record = state.service.validate_record(&payload)?;
    Ok(Json(record))
}

/// Validate a batch account query
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "blockchain",
    request_body = AccountsQuery,
    responses(
        (status = 200, description = "Validated account query", body = AccountsQuery),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = RateLimitResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn query_accounts_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AccountsQuery>, ApiError> {
    let payload = read_json(payload)?;
    let record = state.service.validate_record(&payload)?;
    Ok(Json(record))
}

/// Validate a transaction submission
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "blockchain",
    request_body = TransactionSubmission,
    responses(
        (status = 200, description = "Validated transaction submission", body = TransactionSubmission),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = RateLimitResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn send_transaction_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TransactionSubmission>, ApiError> {
    let payload = read_json(payload)?;
    let record = state.service.validate_record(&payload)?;
    Ok(Json(record))
}

/// Validate a payment record
#[utoipa::path(
    post,
    path = "/payments",
    tag = "billing",
    request_body = PaymentRecord,
    responses(
        (status = 200, description = "Validated payment record", body = PaymentRecord),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = RateLimitResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn create_payment_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PaymentRecord>, ApiError> {
    let payload = read_json(payload)?;
    let record = state.service.validate_record(&payload)?;
    Ok(Json(record))
}

/// Validate a service catalog entry
#[utoipa::path(
    post,
    path = "/services",
    tag = "catalog",
    request_body = ServiceCatalogEntry,
    responses(
        (status = 200, description = "Validated service entry", body = ServiceCatalogEntry),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = RateLimitResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn create_service_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ServiceCatalogEntry>, ApiError> {
    let payload = read_json(payload)?;
    let record = state.service.validate_record(&payload)?;
    Ok(Json(record))
}

/// Validate a robot catalog entry
#[utoipa::path(
    post,
    path = "/robots",
    tag = "catalog",
    request_body = RobotCatalogEntry,
    responses(
        (status = 200, description = "Validated robot entry", body = RobotCatalogEntry),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = RateLimitResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn create_robot_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RobotCatalogEntry>, ApiError> {
    let payload = read_json(payload)?;
    let record = state.service.validate_record(&payload)?;
    Ok(Json(record))
}

/// Validate a price entry
#[utoipa::path(
    post,
    path = "/prices",
    tag = "catalog",
    request_body = PriceEntry,
    responses(
        (status = 200, description = "Validated price entry", body = PriceEntry),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = RateLimitResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn create_price_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PriceEntry>, ApiError> {
    let payload = read_json(payload)?;
    let record = state.service.validate_record(&payload)?;
    Ok(Json(record))
}

/// Validate a software catalog entry
#[utoipa::path(
    post,
    path = "/software",
    tag = "catalog",
    request_body = SoftwareCatalogEntry,
    responses(
        (status = 200, description = "Validated software entry", body = SoftwareCatalogEntry),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = RateLimitResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn create_software_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SoftwareCatalogEntry>, ApiError> {
    let payload = read_json(payload)?;
    let record = state.service.validate_record(&payload)?;
    Ok(Json(record))
}

/// Validate a payload against a schema selected by name
#[utoipa::path(
    post,
    path = "/validate/{schema}",
    tag = "schemas",
    params(
        ("schema" = String, Path, description = "Schema name, e.g. payment or robot")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Validated record", body = Object),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 403, description = "Insufficient privileges", body = ErrorBody),
        (status = 404, description = "Unknown schema", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = RateLimitResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn validate_schema_handler(
    State(state): State<Arc<AppState>>,
    Path(schema): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TypedRecord>, ApiError> {
    let payload = read_json(payload)?;
    let record = state.service.validate_named(&schema, &payload)?;
    Ok(Json(record))
}

/// Detailed health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health status", body = HealthResponse)
    )
)]
pub async fn health_check_handler() -> Json<HealthResponse> {
    Json(HealthResponse::current())
}

/// Kubernetes liveness probe
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Application is alive")
    )
)]
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Kubernetes readiness probe
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Application is ready to serve traffic")
    )
)]
pub async fn readiness_handler() -> StatusCode {
    // validation is stateless; once the router is up there is nothing left to wait for
    StatusCode::OK
}

/// Prometheus exposition endpoint.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.as_ref() {
        Some(handle) => handle.render().into_response(),
        None => ApiError::not_found("Metrics are not enabled").into_response(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.kind().status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(kind = ?self.kind(), detail = %self.detail(), "Server error");
        }

        let body = Json(ErrorBody {
            detail: self.into_detail(),
        });

        (status, body).into_response()
    }
}
