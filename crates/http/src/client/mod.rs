//! Authenticated upstream gateway
//!
//! Every call to the commerce API goes through [`UpstreamGateway::send`]:
//! it attaches the session's access credential, recovers from a 401 with
//! exactly one refresh-and-retry, and folds every HTTP-level outcome into
//! a normalized [`ApiEnvelope`]. HTTP failures are data, not errors; the
//! only `Err` this module produces is builder misconfiguration.

mod commerce;
mod refresh;

pub use refresh::RefreshOutcome;

use crate::error::HttpError;
use crate::session::SessionStore;
use confect_core::ApiEnvelope;
use refresh::RefreshCoordinator;
use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::instrument;

/// Client for the remote commerce API
pub struct UpstreamGateway {
    client: Client,
    base_url: String,
    refresh: RefreshCoordinator,
}

impl UpstreamGateway {
    /// Create a new gateway with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new gateway builder
    pub fn builder() -> UpstreamGatewayBuilder {
        UpstreamGatewayBuilder::default()
    }

    /// Get the upstream base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one authenticated upstream call
    ///
    /// On a 401 with a refresh credential present, refreshes the session
    /// once and retries once with the rotated access token. Never chains
    /// more than one refresh per call.
    #[instrument(name = "upstream.send", skip(self, body, session), fields(method = %method, path = %path))]
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<JsonValue>,
        session: &dyn SessionStore,
    ) -> ApiEnvelope {
        self.send_with_headers(method, path, body, None, session)
            .await
    }

    /// [`UpstreamGateway::send`] with extra headers forwarded upstream
    pub async fn send_with_headers(
        &self,
        method: Method,
        path: &str,
        body: Option<JsonValue>,
        headers: Option<HeaderMap>,
        session: &dyn SessionStore,
    ) -> ApiEnvelope {
        let access = session.access_token();
        let response = match self
            .issue(
                method.clone(),
                path,
                body.as_ref(),
                headers.as_ref(),
                access.as_deref(),
            )
            .await
        {
            Ok(response) => response,
            Err(e) => return transport_failure(&e),
        };

        if response.status() != StatusCode::UNAUTHORIZED {
            return envelope_from_response(response).await;
        }

        match self.refresh_session(session).await {
            RefreshOutcome::Refreshed(pair) => {
                debug!("Access token rotated, retrying original request");
                match self
                    .issue(
                        method,
                        path,
                        body.as_ref(),
                        headers.as_ref(),
                        Some(&pair.access_token),
                    )
                    .await
                {
                    Ok(retried) => envelope_from_response(retried).await,
                    Err(e) => transport_failure(&e),
                }
            }
            // No recovery possible; surface the original 401
            RefreshOutcome::NoRefreshToken | RefreshOutcome::Failed => {
                envelope_from_response(response).await
            }
        }
    }

    /// Perform one unauthenticated upstream call (login, register)
    ///
    /// No credential is attached and a 401 is surfaced as-is.
    pub async fn send_public(
        &self,
        method: Method,
        path: &str,
        body: Option<JsonValue>,
    ) -> ApiEnvelope {
        match self.issue(method, path, body.as_ref(), None, None).await {
            Ok(response) => envelope_from_response(response).await,
            Err(e) => transport_failure(&e),
        }
    }

    /// Run the refresh procedure for this session
    ///
    /// Concurrent callers holding the same refresh token share a single
    /// upstream refresh call.
    pub async fn refresh_session(&self, session: &dyn SessionStore) -> RefreshOutcome {
        self.refresh
            .run(&self.client, &self.base_url, session)
            .await
    }

    pub(crate) async fn issue(
        &self,
        method: Method,
        path: &str,
        body: Option<&JsonValue>,
        headers: Option<&HeaderMap>,
        bearer: Option<&str>,
    ) -> reqwest::Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        if let Some(headers) = headers {
            request = request.headers(headers.clone());
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await
    }
}

/// Shape a failure envelope for a request that never reached the upstream
fn transport_failure(error: &reqwest::Error) -> ApiEnvelope {
    warn!("Upstream unreachable: {error}");
    ApiEnvelope::failure(503, "Unable to reach the commerce service")
}

/// Fold an upstream response into the normalized envelope
async fn envelope_from_response(response: Response) -> ApiEnvelope {
    let status = response.status();

    if status.is_success() {
        let data = response.json::<JsonValue>().await.unwrap_or(JsonValue::Null);
        return ApiEnvelope::success_with(data, status.as_u16(), "OK");
    }

    let body = response.text().await.unwrap_or_default();
    ApiEnvelope::failure(status.as_u16(), extract_detail(status, &body))
}

/// Extract a human-readable detail from an upstream error body
///
/// Supports a flat `detail` string, an array of `{msg}` validation
/// records (joined with `"; "`), and a `message` field, in that order.
fn extract_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<JsonValue>(body) {
        match value.get("detail") {
            Some(JsonValue::String(s)) if !s.is_empty() => return s.clone(),
            Some(JsonValue::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(JsonValue::as_str))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }

        if let Some(message) = value.get("message").and_then(JsonValue::as_str) {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }

    status
        .canonical_reason()
        .unwrap_or("Upstream request failed")
        .to_string()
}

/// Builder for [`UpstreamGateway`]
#[derive(Default)]
pub struct UpstreamGatewayBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl UpstreamGatewayBuilder {
    /// Set the upstream base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the gateway
    pub fn build(self) -> Result<UpstreamGateway, HttpError> {
        let base_url = self
            .base_url
            .ok_or_else(|| HttpError::Configuration("base_url is required".into()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new();

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        client_builder = client_builder.user_agent(
            self.user_agent
                .unwrap_or_else(|| "confect-gateway/0.1.0".to_string()),
        );

        let client = client_builder
            .build()
            .map_err(|e| HttpError::Configuration(e.to_string()))?;

        Ok(UpstreamGateway {
            client,
            base_url,
            refresh: RefreshCoordinator::new(),
        })
    }
}
