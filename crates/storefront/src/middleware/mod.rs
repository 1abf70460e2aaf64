//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded in the span and Sentry scope)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//! 5. Rate limiting on JSON endpoints (governor)

pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use rate_limit::api_rate_limiter;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
