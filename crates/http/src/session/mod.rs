//! Session credential storage
//!
//! The store is always passed as an explicit handle into the gateway and
//! route handlers; nothing reads cookies ambiently. The production
//! implementation rides the browser cookie jar, the in-memory one backs
//! tests and tooling.

mod cookies;
mod memory;

pub use cookies::{CookieSession, clear_access_cookie, clear_refresh_cookie};
pub use memory::MemorySession;

use confect_core::TokenPair;

/// Handle to the session credential pair
///
/// Implementations use interior mutability: the gateway rotates or clears
/// the pair through a shared reference while a request is in flight.
pub trait SessionStore: Send + Sync {
    /// Current access token, if any
    fn access_token(&self) -> Option<String>;

    /// Current refresh token, if any
    fn refresh_token(&self) -> Option<String>;

    /// Replace the stored pair. Both tokens are written together; a
    /// partial update is not possible through this interface.
    fn store_pair(&self, pair: TokenPair);

    /// Remove both tokens
    fn clear(&self);
}
