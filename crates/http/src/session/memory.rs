//! In-memory session store for tests and tooling

use super::SessionStore;
use confect_core::TokenPair;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct Tokens {
    access: Option<String>,
    refresh: Option<String>,
}

/// Session store holding the pair in process memory
#[derive(Debug, Default)]
pub struct MemorySession {
    tokens: RwLock<Tokens>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an arbitrary (possibly partial) token state
    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        Self {
            tokens: RwLock::new(Tokens {
                access: access.map(str::to_string),
                refresh: refresh.map(str::to_string),
            }),
        }
    }
}

impl SessionStore for MemorySession {
    fn access_token(&self) -> Option<String> {
        self.tokens
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .access
            .clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .refresh
            .clone()
    }

    fn store_pair(&self, pair: TokenPair) {
        let mut tokens = self.tokens.write().unwrap_or_else(|e| e.into_inner());
        tokens.access = Some(pair.access_token);
        tokens.refresh = Some(pair.refresh_token);
    }

    fn clear(&self) {
        let mut tokens = self.tokens.write().unwrap_or_else(|e| e.into_inner());
        tokens.access = None;
        tokens.refresh = None;
    }
}
