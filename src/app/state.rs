//! Application state management.
//!
//! Shared state handed to every request handler via Axum's State extractor.

use std::env;
use std::sync::Arc;

use secrecy::SecretString;

use crate::infra::PrometheusHandle;

use super::service::BoundaryService;

/// API credential configuration.
///
/// With no keys configured, authentication is disabled; this mirrors local
/// development where the platform gateway has not issued keys yet.
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Key required on validation endpoints.
    pub service_key: Option<SecretString>,
    /// Key required on operator endpoints; implies the service privilege.
    pub admin_key: Option<SecretString>,
}

impl AuthConfig {
    /// Reads `BOUNDARY_API_KEY` and `BOUNDARY_ADMIN_KEY`.
    pub fn from_env() -> Self {
        Self {
            service_key: key_from_env("BOUNDARY_API_KEY"),
            admin_key: key_from_env("BOUNDARY_ADMIN_KEY"),
        }
    }

    /// No authentication; for development and tests.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }
}

fn key_from_env(name: &str) -> Option<SecretString> {
    env::var(name)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}

/// Shared application state for the Axum web server.
///
/// All contained types are `Send + Sync`; the state is safe to share across
/// async tasks.
#[derive(Clone)]
pub struct AppState {
    /// The boundary service containing validation logic.
    pub service: Arc<BoundaryService>,

    /// Credential configuration enforced by the auth middleware.
    pub auth: AuthConfig,

    /// Prometheus handle rendered by GET /metrics, when metrics are enabled.
    pub metrics: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    #[must_use]
    pub fn new(auth: AuthConfig) -> Self {
        Self {
            service: Arc::new(BoundaryService::new()),
            auth,
            metrics: None,
        }
    }

    /// Attaches a Prometheus handle for the /metrics endpoint.
    #[must_use]
    pub fn with_metrics(mut self, handle: Arc<PrometheusHandle>) -> Self {
        self.metrics = Some(handle);
        self
    }
}
