//! Order management proxy

use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
    response::Response,
};
use axum_extra::extract::CookieJar;
use reqwest::Method;
use tracing::instrument;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::error::HttpError;
use crate::routes::{path_with_query, respond};
use crate::session::CookieSession;
use crate::state::AppState;
use crate::types::StatusUpdateRequest;

/// List orders
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Order list"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "orders"
)]
#[instrument(name = "orders_list", skip(state, jar))]
pub async fn list(
    State(state): State<AppState>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let path = path_with_query("/orders", query.as_deref());
    let envelope = state.gateway().send(Method::GET, &path, None, &session).await;
    respond(session, envelope)
}

/// Fetch one order
#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order"),
        (status = 404, description = "No such order"),
    ),
    tag = "orders"
)]
#[instrument(name = "orders_get", skip(state, jar))]
pub async fn get(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state
        .gateway()
        .send(Method::GET, &format!("/orders/{id}"), None, &session)
        .await;
    respond(session, envelope)
}

/// Transition an order's status
#[utoipa::path(
    patch,
    path = "/{id}/status",
    params(("id" = String, Path, description = "Order id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Malformed request body"),
        (status = 422, description = "Invalid transition"),
    ),
    tag = "orders"
)]
#[instrument(name = "orders_update_status", skip(state, jar, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(request) = payload.map_err(|e| HttpError::BadRequest(e.to_string()))?;

    let session = CookieSession::new(jar, state.cookie_secure());
    let body = serde_json::json!({ "status": request.status });
    let envelope = state
        .gateway()
        .send(
            Method::PATCH,
            &format!("/orders/{id}/status"),
            Some(body),
            &session,
        )
        .await;

    Ok(respond(session, envelope))
}

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list))
        .routes(routes!(get))
        .routes(routes!(update_status))
}
