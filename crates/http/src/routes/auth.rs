//! Session and profile endpoints

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::Response,
};
use axum_extra::extract::CookieJar;
use confect_core::{ApiEnvelope, Role};
use serde_json::Value as JsonValue;
use tracing::instrument;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::client::RefreshOutcome;
use crate::error::HttpError;
use crate::routes::respond;
use crate::session::CookieSession;
use crate::state::AppState;
use crate::types::{LoginRequest, RegisterRequest};

/// Attach the role's static capability flags to a user payload so the UI
/// can gate itself without a second round trip
fn with_capabilities(envelope: ApiEnvelope) -> ApiEnvelope {
    envelope.map_data(|mut user| {
        let role = user
            .get("role")
            .and_then(JsonValue::as_str)
            .map(Role::parse_or_default)
            .unwrap_or_default();
        let capabilities = serde_json::to_value(role.capabilities()).unwrap_or(JsonValue::Null);
        if let Some(map) = user.as_object_mut() {
            map.insert("permissions".to_string(), capabilities);
        }
        user
    })
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; session cookies set"),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid credentials"),
        (status = 503, description = "Upstream unreachable"),
    ),
    tag = "authentication"
)]
#[instrument(name = "auth_login", skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(request) = payload.map_err(|e| HttpError::BadRequest(e.to_string()))?;

    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state.gateway().login(&request, &session).await;
    if envelope.succeeded {
        info!("User signed in: {}", request.email);
    }

    Ok(respond(session, with_capabilities(envelope)))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created; session cookies set"),
        (status = 400, description = "Malformed request body"),
        (status = 409, description = "Account already exists"),
    ),
    tag = "authentication"
)]
#[instrument(name = "auth_register", skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(request) = payload.map_err(|e| HttpError::BadRequest(e.to_string()))?;

    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state.gateway().register(&request, &session).await;

    Ok(respond(session, with_capabilities(envelope)))
}

/// Rotate the session's credential pair
#[utoipa::path(
    post,
    path = "/refresh",
    responses(
        (status = 200, description = "Pair rotated; new cookies set"),
        (status = 401, description = "No usable refresh credential; cookies cleared"),
    ),
    tag = "authentication"
)]
#[instrument(name = "auth_refresh", skip(state, jar))]
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());

    let envelope = match state.gateway().refresh_session(&session).await {
        RefreshOutcome::Refreshed(_) => {
            ApiEnvelope::success_with(serde_json::json!({ "refreshed": true }), 200, "Session refreshed")
        }
        RefreshOutcome::NoRefreshToken => ApiEnvelope::failure(401, "No refresh credential"),
        RefreshOutcome::Failed => ApiEnvelope::failure(401, "Session expired"),
    };

    respond(session, envelope)
}

/// Sign out and clear the session
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Session cleared"),
    ),
    tag = "authentication"
)]
#[instrument(name = "auth_logout", skip(state, jar))]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state.gateway().logout(&session).await;
    respond(session, envelope)
}

/// Fetch the authenticated user's profile
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Current user with capability flags"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "authentication"
)]
#[instrument(name = "auth_me", skip(state, jar))]
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state.gateway().current_user(&session).await;
    respond(session, with_capabilities(envelope))
}

/// Update the authenticated user's profile
#[utoipa::path(
    patch,
    path = "/me",
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "authentication"
)]
#[instrument(name = "auth_update_me", skip(state, jar, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(changes) = payload.map_err(|e| HttpError::BadRequest(e.to_string()))?;

    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state.gateway().update_profile(changes, &session).await;

    Ok(respond(session, with_capabilities(envelope)))
}

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(register))
        .routes(routes!(refresh))
        .routes(routes!(logout))
        .routes(routes!(me, update_me))
}
