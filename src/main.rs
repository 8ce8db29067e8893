use std::env;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tracing::{info, warn};

use construct_boundary::api::{RateLimitConfig, create_router_with_rate_limit};
use construct_boundary::app::{AppState, AuthConfig};
use construct_boundary::infra::{init_metrics_handle, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    let auth = AuthConfig::from_env();
    if auth.service_key.is_none() {
        warn!("BOUNDARY_API_KEY not set, request authentication is disabled");
    }
    if auth.admin_key.is_none() {
        warn!("BOUNDARY_ADMIN_KEY not set, operator endpoints are open");
    }

    let mut state = AppState::new(auth);
    if let Some(handle) = init_metrics_handle() {
        state = state.with_metrics(handle);
    } else {
        warn!("Metrics recorder could not be installed, GET /metrics is disabled");
    }

    let router = create_router_with_rate_limit(Arc::new(state), RateLimitConfig::from_env());

    // Cloud Run convention: the platform provides PORT
    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = format!("0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Boundary service listening");

    axum::serve(listener, router).await?;

    Ok(())
}
