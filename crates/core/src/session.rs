//! Session credential pair

use serde::{Deserialize, Serialize};

/// Cookie name carrying the short-lived access credential
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Cookie name carrying the long-lived refresh credential
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Access token lifetime in seconds (30 minutes)
pub const ACCESS_TOKEN_MAX_AGE_SECS: i64 = 1800;
/// Refresh token lifetime in seconds (7 days)
pub const REFRESH_TOKEN_MAX_AGE_SECS: i64 = 604_800;

/// An access/refresh credential pair
///
/// Both tokens are opaque to this system; the upstream API is the source
/// of truth for their validity. A pair is always rotated or destroyed as
/// a unit, never partially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}
