//! HTTP routing: endpoint groups, the shared middleware stack, and per-IP
//! rate limiting.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderValue, Request, Response, StatusCode},
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
};
use governor::clock::{Clock, DefaultClock};
use governor::{Quota, RateLimiter};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app::AppState;
use crate::domain::{ErrorBody, RateLimitResponse};

use super::handlers::{
    ApiDoc, create_payment_handler, create_price_handler, create_robot_handler,
    create_service_handler, create_software_handler, health_check_handler, liveness_handler,
    metrics_handler, query_accounts_handler, readiness_handler, save_address_handler,
    save_event_handler, send_transaction_handler, validate_schema_handler,
};
use super::middleware::{admin_auth_middleware, auth_middleware};

/// Quotas for the two endpoint groups, as requests per second plus burst.
///
/// Health probes get their own, more generous bucket so a validation storm
/// cannot starve the orchestrator's liveness checks.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub validate_rps: u32,
    pub validate_burst: u32,
    pub health_rps: u32,
    pub health_burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            validate_rps: 10,
            validate_burst: 20,
            health_rps: 100,
            health_burst: 100,
        }
    }
}

impl RateLimitConfig {
    /// Reads `BOUNDARY_RATE_LIMIT_RPS` and `BOUNDARY_RATE_LIMIT_BURST`,
    /// falling back to the defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            validate_rps: env_u32("BOUNDARY_RATE_LIMIT_RPS").unwrap_or(defaults.validate_rps),
            validate_burst: env_u32("BOUNDARY_RATE_LIMIT_BURST").unwrap_or(defaults.validate_burst),
            ..defaults
        }
    }
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok()?.parse().ok()
}

type KeyedLimiter = RateLimiter<
    IpAddr,
    governor::state::keyed::DashMapStateStore<IpAddr>,
    governor::clock::DefaultClock,
>;

/// Limiter buckets keyed by client IP, one per endpoint group.
pub struct RateLimitState {
    validate_limiter: KeyedLimiter,
    health_limiter: KeyedLimiter,
    config: RateLimitConfig,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            validate_limiter: RateLimiter::dashmap(quota(
                config.validate_rps,
                config.validate_burst,
            )),
            health_limiter: RateLimiter::dashmap(quota(config.health_rps, config.health_burst)),
            config,
        }
    }
}

// A zero rate would panic in Quota; clamp to one instead.
fn quota(rps: u32, burst: u32) -> Quota {
    let non_zero = |value: u32| NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN);
    Quota::per_second(non_zero(rps)).allow_burst(non_zero(burst))
}

/// The IP a request is bucketed under: proxy headers first (the platform
/// fronts this service with a load balancer), then the connect address.
/// Requests with no attributable address share the unspecified bucket.
fn client_ip<B>(request: &Request<B>) -> IpAddr {
    let header_ip = |name: &str| -> Option<IpAddr> {
        let value = request.headers().get(name)?.to_str().ok()?;
        // X-Forwarded-For lists the client first
        value.split(',').next()?.trim().parse().ok()
    };

    header_ip("x-forwarded-for")
        .or_else(|| header_ip("x-real-ip"))
        .or_else(|| {
            request
                .extensions()
                .get::<SocketAddr>()
                .map(SocketAddr::ip)
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn seconds_until_allowed(not_until: &governor::NotUntil<governor::clock::QuantaInstant>) -> u64 {
    not_until
        .wait_time_from(DefaultClock::default().now())
        .as_secs()
}

/// Per-IP limiter in front of the validation endpoints. Successful responses
/// carry the configured limit; throttled ones add `Retry-After` and a
/// `{"detail", "retry_after"}` body.
async fn rate_limit_validate_middleware(
    State(limits): State<Arc<RateLimitState>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let rps = limits.config.validate_rps;
    match limits.validate_limiter.check_key(&client_ip(&request)) {
        Ok(_) => {
            let mut response = next.run(request).await;
            response
                .headers_mut()
                .insert("X-RateLimit-Limit", HeaderValue::from(rps));
            response
        }
        Err(not_until) => {
            let retry_after = seconds_until_allowed(&not_until);
            let body = RateLimitResponse {
                detail: "Rate limit exceeded. Please slow down your requests.".to_string(),
                retry_after,
            };

            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            let headers = response.headers_mut();
            headers.insert("X-RateLimit-Limit", HeaderValue::from(rps));
            headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
            headers.insert("Retry-After", HeaderValue::from(retry_after));
            response
        }
    }
}

/// Limiter for the health probes; throttled responses keep the plain
/// `{"detail"}` contract.
async fn rate_limit_health_middleware(
    State(limits): State<Arc<RateLimitState>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    match limits.health_limiter.check_key(&client_ip(&request)) {
        Ok(_) => next.run(request).await,
        Err(not_until) => {
            let retry_after = seconds_until_allowed(&not_until);
            let body = ErrorBody {
                detail: "Rate limit exceeded".to_string(),
            };

            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            response
                .headers_mut()
                .insert("Retry-After", HeaderValue::from(retry_after));
            response
        }
    }
}

fn validate_routes(app_state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/addresses", post(save_address_handler))
        .route("/events", post(save_event_handler))
        .route("/accounts", post(query_accounts_handler))
        .route("/transactions", post(send_transaction_handler))
        .route("/payments", post(create_payment_handler))
        .route("/services", post(create_service_handler))
        .route("/robots", post(create_robot_handler))
        .route("/prices", post(create_price_handler))
        .route("/software", post(create_software_handler))
        .layer(middleware::from_fn_with_state(
            Arc::clone(app_state),
            auth_middleware,
        ))
}

fn admin_routes(app_state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/validate/{schema}", post(validate_schema_handler))
        .layer(middleware::from_fn_with_state(
            Arc::clone(app_state),
            admin_auth_middleware,
        ))
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check_handler))
        .route("/live", get(liveness_handler))
        .route("/ready", get(readiness_handler))
}

fn build_router(app_state: Arc<AppState>, limits: Option<Arc<RateLimitState>>) -> Router {
    let mut validation = validate_routes(&app_state).merge(admin_routes(&app_state));
    let mut health = health_routes();

    if let Some(limits) = limits {
        validation = validation.layer(middleware::from_fn_with_state(
            Arc::clone(&limits),
            rate_limit_validate_middleware,
        ));
        health = health.layer(middleware::from_fn_with_state(
            limits,
            rate_limit_health_middleware,
        ));
    }

    Router::new()
        .merge(validation)
        .nest("/health", health)
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                // the original services allow all origins
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Router without rate limiting; used by the integration tests.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    build_router(app_state, None)
}

/// Router with per-IP rate limiting, as deployed.
pub fn create_router_with_rate_limit(app_state: Arc<AppState>, config: RateLimitConfig) -> Router {
    build_router(app_state, Some(Arc::new(RateLimitState::new(config))))
}
