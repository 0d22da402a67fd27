//! Token refresh procedure with single-flight deduplication

use crate::session::SessionStore;
use confect_core::TokenPair;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

const REFRESH_PATH: &str = "/auth/refresh";

/// Outcome of one refresh attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No refresh credential present; the store was left untouched
    NoRefreshToken,
    /// Both tokens were rotated and stored
    Refreshed(TokenPair),
    /// The upstream rejected the refresh; the store was cleared
    Failed,
}

type SharedAttempt = Arc<OnceCell<Option<TokenPair>>>;

/// Coordinates refresh calls across concurrent requests
///
/// Two requests observing a 401 at nearly the same time would each send
/// the same soon-to-be-rotated refresh token upstream; with strict
/// rotation the second call would kill a healthy session. Attempts are
/// therefore keyed by refresh-token value and concurrent callers share
/// the first call's outcome.
pub(crate) struct RefreshCoordinator {
    inflight: Mutex<HashMap<String, SharedAttempt>>,
}

impl RefreshCoordinator {
    pub(crate) fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) async fn run(
        &self,
        client: &Client,
        base_url: &str,
        session: &dyn SessionStore,
    ) -> RefreshOutcome {
        let Some(refresh_token) = session.refresh_token() else {
            return RefreshOutcome::NoRefreshToken;
        };

        let attempt = {
            let mut inflight = self.inflight.lock().await;
            inflight
                .entry(refresh_token.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let outcome = attempt
            .get_or_init(|| request_new_pair(client, base_url, refresh_token.clone()))
            .await
            .clone();

        // Drop the entry so a later expiry starts a fresh attempt. Only
        // the cell we actually used is removed; a successor attempt under
        // the same (reissued) token value must not be evicted.
        {
            let mut inflight = self.inflight.lock().await;
            if let Some(existing) = inflight.get(&refresh_token) {
                if Arc::ptr_eq(existing, &attempt) {
                    inflight.remove(&refresh_token);
                }
            }
        }

        match outcome {
            Some(pair) => {
                session.store_pair(pair.clone());
                RefreshOutcome::Refreshed(pair)
            }
            None => {
                session.clear();
                RefreshOutcome::Failed
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    refresh_token: String,
}

/// Exchange the refresh token for a new pair
///
/// Any failure (transport, rejection, or an incomplete pair) yields
/// `None`; the caller clears the session so the route guard forces
/// re-authentication on the next navigation.
async fn request_new_pair(client: &Client, base_url: &str, refresh_token: String) -> Option<TokenPair> {
    let url = format!("{base_url}{REFRESH_PATH}");
    let response = match client
        .post(&url)
        .json(&serde_json::json!({ "refresh_token": refresh_token }))
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!("Refresh request failed to send: {e}");
            return None;
        }
    };

    if !response.status().is_success() {
        debug!("Upstream rejected refresh: {}", response.status());
        return None;
    }

    match response.json::<RefreshResponse>().await {
        Ok(body) if !body.access_token.is_empty() && !body.refresh_token.is_empty() => {
            Some(TokenPair::new(body.access_token, body.refresh_token))
        }
        Ok(_) => {
            warn!("Upstream returned an incomplete credential pair");
            None
        }
        Err(e) => {
            warn!("Malformed refresh response: {e}");
            None
        }
    }
}
