//! The API layer, containing web handlers, middleware, and routing.

pub mod handlers;
pub mod middleware;
pub mod router;

pub use router::{RateLimitConfig, create_router, create_router_with_rate_limit};
