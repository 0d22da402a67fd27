//! Typed endpoint wrappers over the gateway

use super::UpstreamGateway;
use crate::session::SessionStore;
use crate::types::{LoginRequest, RegisterRequest};
use confect_core::{ApiEnvelope, TokenPair};
use reqwest::Method;
use serde_json::{Value as JsonValue, json};

impl UpstreamGateway {
    /// Sign in and populate the session with the issued credential pair
    ///
    /// Tokens never appear in the returned envelope; they travel only
    /// through the session store. On failure the store is untouched.
    pub async fn login(
        &self,
        request: &LoginRequest,
        session: &dyn SessionStore,
    ) -> ApiEnvelope {
        self.authenticate_via("/auth/login", request, session, "Signed in")
            .await
    }

    /// Register a new account; the upstream signs the account in, so the
    /// session is populated exactly as for login
    pub async fn register(
        &self,
        request: &RegisterRequest,
        session: &dyn SessionStore,
    ) -> ApiEnvelope {
        self.authenticate_via("/auth/register", request, session, "Account created")
            .await
    }

    async fn authenticate_via<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
        session: &dyn SessionStore,
        message: &str,
    ) -> ApiEnvelope {
        let body = match serde_json::to_value(body) {
            Ok(body) => body,
            Err(e) => return ApiEnvelope::failure(500, format!("Invalid request payload: {e}")),
        };

        let envelope = self.send_public(Method::POST, path, Some(body)).await;
        if !envelope.succeeded {
            return envelope;
        }

        let status = envelope.status();
        let data = envelope.data.unwrap_or(JsonValue::Null);
        let Some(pair) = credential_pair(&data) else {
            warn!("Upstream {path} response lacked a complete credential pair");
            return ApiEnvelope::failure(502, "Upstream returned an incomplete credential pair");
        };

        session.store_pair(pair);
        ApiEnvelope::success_with(user_payload(data), status, message)
    }

    /// Sign out: notify the upstream best-effort, always clear the session
    pub async fn logout(&self, session: &dyn SessionStore) -> ApiEnvelope {
        if let Some(access) = session.access_token() {
            match self
                .issue(Method::POST, "/auth/logout", None, None, Some(&access))
                .await
            {
                Ok(response) if !response.status().is_success() => {
                    warn!("Upstream logout returned {}", response.status());
                }
                Err(e) => warn!("Upstream logout failed: {e}"),
                Ok(_) => {}
            }
        }

        session.clear();
        ApiEnvelope::success_with(json!({ "signedOut": true }), 200, "Signed out")
    }

    /// Fetch the authenticated user's profile
    pub async fn current_user(&self, session: &dyn SessionStore) -> ApiEnvelope {
        self.send(Method::GET, "/auth/me", None, session).await
    }

    /// Update the authenticated user's profile
    pub async fn update_profile(
        &self,
        changes: JsonValue,
        session: &dyn SessionStore,
    ) -> ApiEnvelope {
        self.send(Method::PATCH, "/auth/me", Some(changes), session)
            .await
    }
}

/// Pull a complete token pair out of an upstream auth response
fn credential_pair(data: &JsonValue) -> Option<TokenPair> {
    let access = data.get("access_token")?.as_str()?;
    let refresh = data.get("refresh_token")?.as_str()?;
    if access.is_empty() || refresh.is_empty() {
        return None;
    }
    Some(TokenPair::new(access, refresh))
}

/// The browser-facing payload of an auth response: the user record, with
/// the raw tokens stripped
fn user_payload(mut data: JsonValue) -> JsonValue {
    if let Some(user) = data.get("user") {
        return user.clone();
    }
    if let Some(map) = data.as_object_mut() {
        map.remove("access_token");
        map.remove("refresh_token");
        map.remove("token_type");
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_pair_requires_both_tokens() {
        assert!(credential_pair(&json!({"access_token": "a", "refresh_token": "r"})).is_some());
        assert!(credential_pair(&json!({"access_token": "a"})).is_none());
        assert!(credential_pair(&json!({"access_token": "", "refresh_token": "r"})).is_none());
    }

    #[test]
    fn user_payload_prefers_nested_user() {
        let payload = user_payload(json!({
            "access_token": "a",
            "refresh_token": "r",
            "user": {"email": "ada@example.test"},
        }));
        assert_eq!(payload, json!({"email": "ada@example.test"}));
    }

    #[test]
    fn user_payload_strips_tokens_from_flat_response() {
        let payload = user_payload(json!({
            "access_token": "a",
            "refresh_token": "r",
            "token_type": "bearer",
            "email": "ada@example.test",
        }));
        assert_eq!(payload, json!({"email": "ada@example.test"}));
    }
}
