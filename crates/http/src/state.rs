//! Shared application state

use crate::client::UpstreamGateway;
use std::sync::Arc;

/// State shared by all handlers and middleware
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<UpstreamGateway>,
    cookie_secure: bool,
}

impl AppState {
    /// Create state around a gateway; `cookie_secure` controls the
    /// `Secure` attribute on session cookies (on in production)
    pub fn new(gateway: Arc<UpstreamGateway>, cookie_secure: bool) -> Self {
        Self {
            gateway,
            cookie_secure,
        }
    }

    pub fn gateway(&self) -> &UpstreamGateway {
        &self.gateway
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}
