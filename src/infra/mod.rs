//! Infrastructure layer implementations.

pub mod observability;

pub use observability::{PrometheusHandle, init_metrics, init_metrics_handle, init_tracing};
