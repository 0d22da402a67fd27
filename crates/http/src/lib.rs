//! Confect HTTP surface: upstream gateway client, session store,
//! route guard middleware, and the proxy route tree.

#[macro_use]
extern crate tracing;

pub mod client;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod types;

pub use client::{RefreshOutcome, UpstreamGateway};
pub use error::{HttpError, Result};
pub use session::{CookieSession, MemorySession, SessionStore};
pub use state::AppState;
