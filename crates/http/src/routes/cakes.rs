//! Custom-cake request proxy
//!
//! Unlike the other proxies, responses are pushed through the normalizer
//! before returning: the upstream's cake records arrive loosely typed.

use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
    response::Response,
};
use axum_extra::extract::CookieJar;
use confect_core::CustomCake;
use reqwest::Method;
use serde_json::Value as JsonValue;
use tracing::instrument;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::error::HttpError;
use crate::routes::{path_with_query, respond};
use crate::session::CookieSession;
use crate::state::AppState;
use crate::types::StatusUpdateRequest;

/// Normalize a cake payload, element-wise for lists
fn normalized(data: JsonValue) -> JsonValue {
    match data {
        JsonValue::Array(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| {
                    serde_json::to_value(CustomCake::normalize(item)).unwrap_or(JsonValue::Null)
                })
                .collect(),
        ),
        other => serde_json::to_value(CustomCake::normalize(&other)).unwrap_or(JsonValue::Null),
    }
}

/// List custom-cake requests
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Normalized cake request list"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "custom_cakes"
)]
#[instrument(name = "cakes_list", skip(state, jar))]
pub async fn list(
    State(state): State<AppState>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let path = path_with_query("/custom-cakes", query.as_deref());
    let envelope = state.gateway().send(Method::GET, &path, None, &session).await;
    respond(session, envelope.map_data(normalized))
}

/// Fetch one custom-cake request
#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = String, Path, description = "Cake request id")),
    responses(
        (status = 200, description = "Normalized cake request"),
        (status = 404, description = "No such request"),
    ),
    tag = "custom_cakes"
)]
#[instrument(name = "cakes_get", skip(state, jar))]
pub async fn get(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state
        .gateway()
        .send(Method::GET, &format!("/custom-cakes/{id}"), None, &session)
        .await;
    respond(session, envelope.map_data(normalized))
}

/// Transition a custom-cake request's status
#[utoipa::path(
    patch,
    path = "/{id}/status",
    params(("id" = String, Path, description = "Cake request id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated; normalized record returned"),
        (status = 400, description = "Malformed request body"),
        (status = 404, description = "No such request"),
    ),
    tag = "custom_cakes"
)]
#[instrument(name = "cakes_update_status", skip(state, jar, payload))]
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
            &format!("/custom-cakes/{id}/status"),
            Some(body),
            &session,
        )
        .await;

    Ok(respond(session, envelope.map_data(normalized)))
}

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list))
        .routes(routes!(get))
        .routes(routes!(update_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lists_normalize_element_wise() {
        let data = normalized(json!([
            {"id": 1, "status": "approved"},
            {"id": 2, "status": "bogus"},
        ]));
        assert_eq!(data[0]["id"], "1");
        assert_eq!(data[0]["status"], "approved");
        assert_eq!(data[1]["status"], "pending_review");
    }

    #[test]
    fn single_records_normalize() {
        let data = normalized(json!({"id": "cake-1", "quotedPrice": "12.5"}));
        assert_eq!(data["quotedPrice"], 12.5);
    }
}
