//! Middleware components for HTTP request processing

pub mod correlation;
pub mod guard;

pub use correlation::{CORRELATION_ID_HEADER, correlation_id_middleware};
pub use guard::{SIGNIN_PATH, route_guard};
