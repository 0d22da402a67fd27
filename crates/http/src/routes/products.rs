//! Product catalog proxy

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

/// List products
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Product list"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "products"
)]
#[instrument(name = "products_list", skip(state, jar))]
pub async fn list(
    State(state): State<AppState>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let path = path_with_query("/products", query.as_deref());
    let envelope = state.gateway().send(Method::GET, &path, None, &session).await;
    respond(session, envelope)
}

/// Create a product
#[utoipa::path(
    post,
    path = "/",
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Malformed request body"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "products"
)]
#[instrument(name = "products_create", skip(state, jar, payload))]
pub async fn create(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(body) = payload.map_err(|e| HttpError::BadRequest(e.to_string()))?;

    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state
        .gateway()
        .send(Method::POST, "/products", Some(body), &session)
        .await;

    Ok(respond(session, envelope))
}

/// Fetch one product
#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product"),
        (status = 404, description = "No such product"),
    ),
    tag = "products"
)]
#[instrument(name = "products_get", skip(state, jar))]
pub async fn get(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state
        .gateway()
        .send(Method::GET, &format!("/products/{id}"), None, &session)
        .await;
    respond(session, envelope)
}

/// Update a product
#[utoipa::path(
    patch,
    path = "/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product updated"),
        (status = 400, description = "Malformed request body"),
        (status = 404, description = "No such product"),
    ),
    tag = "products"
)]
#[instrument(name = "products_update", skip(state, jar, payload))]
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
        .send(Method::PATCH, &format!("/products/{id}"), Some(body), &session)
        .await;

    Ok(respond(session, envelope))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "No such product"),
    ),
    tag = "products"
)]
#[instrument(name = "products_delete", skip(state, jar))]
pub async fn delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state
        .gateway()
        .send(Method::DELETE, &format!("/products/{id}"), None, &session)
        .await;
    respond(session, envelope)
}

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list, create))
        .routes(routes!(get, update, delete))
}
