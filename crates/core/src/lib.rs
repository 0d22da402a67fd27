//! Confect core types and utilities

pub mod access;
pub mod cake;
pub mod envelope;
pub mod error;
pub mod session;

pub use access::{Capabilities, Role};
pub use cake::{CustomCake, CustomCakeStatus};
pub use envelope::{ApiEnvelope, ErrorDetail};
pub use error::{CoreError, CoreResult};
pub use session::TokenPair;
