//! Image library proxy

use axum::{
    extract::{Path, RawQuery, State},
    response::Response,
};
use axum_extra::extract::CookieJar;
use reqwest::Method;
use tracing::instrument;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::routes::{path_with_query, respond};
use crate::session::CookieSession;
use crate::state::AppState;

/// List images
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Image list"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "images"
)]
#[instrument(name = "images_list", skip(state, jar))]
pub async fn list(
    State(state): State<AppState>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let path = path_with_query("/images", query.as_deref());
    let envelope = state.gateway().send(Method::GET, &path, None, &session).await;
    respond(session, envelope)
}

/// Delete an image
#[utoipa::path(
    delete,
    path = "/{id}",
    params(("id" = String, Path, description = "Image id")),
    responses(
        (status = 200, description = "Image deleted"),
        (status = 404, description = "No such image"),
    ),
    tag = "images"
)]
#[instrument(name = "images_delete", skip(state, jar))]
pub async fn delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());
    let envelope = state
        .gateway()
        .send(Method::DELETE, &format!("/images/{id}"), None, &session)
        .await;
    respond(session, envelope)
}

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list))
        .routes(routes!(delete))
}
