//! User management proxy (back-office)

use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
    response::Response,
};
use axum_extra::extract::CookieJar;
use reqwest::Method;
use serde_json::Value as JsonValue;
use tracing::instrument;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::error::HttpError;
use crate::routes::{path_with_query, respond};
use crate::session::CookieSession;
use crate::state::AppState;

/// List users
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "User list"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "users"
)]
#[instrument(name = "users_list", skip(state, jar))]
pub async fn list(
    State(state): State<AppState>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let path = path_with_query("/users", query.as_deref());
    let envelope = state.gateway().send(Method::GET, &path, None, &session).await;
    respond(session, envelope)
}

/// Fetch one user
#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User"),
        (status = 404, description = "No such user"),
    ),
    tag = "users"
)]
#[instrument(name = "users_get", skip(state, jar))]
pub async fn get(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state
        .gateway()
        .send(Method::GET, &format!("/users/{id}"), None, &session)
        .await;
    respond(session, envelope)
}

/// Update a user
#[utoipa::path(
    patch,
    path = "/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User updated"),
        (status = 400, description = "Malformed request body"),
        (status = 404, description = "No such user"),
    ),
    tag = "users"
)]
#[instrument(name = "users_update", skip(state, jar, payload))]
pub async fn update(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(body) = payload.map_err(|e| HttpError::BadRequest(e.to_string()))?;

    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state
        .gateway()
        .send(Method::PATCH, &format!("/users/{id}"), Some(body), &session)
        .await;

    Ok(respond(session, envelope))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "No such user"),
    ),
    tag = "users"
)]
#[instrument(name = "users_delete", skip(state, jar))]
pub async fn delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state
        .gateway()
        .send(Method::DELETE, &format!("/users/{id}"), None, &session)
        .await;
    respond(session, envelope)
}

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list))
        .routes(routes!(get, update, delete))
}
