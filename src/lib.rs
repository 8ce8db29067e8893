//! Construct Boundary
//!
//! The typed request/response boundary for The Construct platform: inbound
//! payloads are validated against a declared schema catalog and every failure
//! condition is translated into one of five structured HTTP errors.
//!
//! # Architecture Overview
//!
//! This crate is organized into four main layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │   HTTP handlers, routing, auth, rate limits  │
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │   Validation orchestration, logging, metrics │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │  Schema catalog, typed records, error kinds  │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │        Tracing and metrics installation      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Closed error taxonomy**: five kinds, each with a status code and an
//!   overridable default detail; unclassified conditions fall back to 500
//! - **Exhaustive validation**: a rejected payload reports every offending
//!   field, not just the first
//! - **Typed records**: optional fields default to absent and re-serialize as
//!   explicit `null`, so the wire shape round-trips
//! - **Logging**: structured logging with `tracing`
//! - **Security**: API keys held with the `secrecy` crate, compared in
//!   constant time
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use construct_boundary::api::create_router;
//! use construct_boundary::app::{AppState, AuthConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let state = Arc::new(AppState::new(AuthConfig::from_env()));
//!     let router = create_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, router).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

// Sample payloads shared by unit and integration tests
pub mod test_utils;
