//! Application layer containing validation orchestration and shared state.

pub mod service;
pub mod state;

pub use service::BoundaryService;
pub use state::{AppState, AuthConfig};
