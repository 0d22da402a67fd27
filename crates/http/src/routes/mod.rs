//! API route definitions

use crate::middleware::{correlation_id_middleware, route_guard};
use crate::session::CookieSession;
use crate::state::AppState;
use axum::{
    Json, Router,
    http::StatusCode,
    middleware::from_fn,
    response::{IntoResponse, Response},
};
use confect_core::ApiEnvelope;
use serde::Serialize;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

pub mod analytics;
pub mod auth;
pub mod cakes;
pub mod health;
pub mod images;
pub mod orders;
pub mod products;
pub mod users;

#[derive(OpenApi)]
#[openapi(tags(
    (name = "authentication", description = "Session and profile endpoints"),
    (name = "products", description = "Product catalog proxy"),
    (name = "orders", description = "Order management proxy"),
    (name = "users", description = "User management proxy"),
    (name = "custom_cakes", description = "Custom-cake request proxy"),
    (name = "images", description = "Image library proxy"),
    (name = "analytics", description = "Analytics aggregation"),
    (name = "health", description = "Service health"),
))]
struct ApiDoc;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/products", products::router())
        .nest("/api/orders", orders::router())
        .nest("/api/users", users::router())
        .nest("/api/custom-cakes", cakes::router())
        .nest("/api/images", images::router())
        .nest("/api/analytics", analytics::router())
        .split_for_parts();

    router
        .merge(Scalar::with_url("/docs", api))
        .layer(from_fn(route_guard))
        .layer(from_fn(correlation_id_middleware))
        .with_state(state)
}

/// Finish a proxy request: mirror the envelope status and attach any
/// pending cookie mutations to the response
pub(crate) fn respond<T: Serialize>(session: CookieSession, envelope: ApiEnvelope<T>) -> Response {
    let status =
        StatusCode::from_u16(envelope.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, session.into_jar(), Json(envelope)).into_response()
}

/// Forward the browser's query string to the upstream path unchanged
pub(crate) fn path_with_query(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{path}?{q}"),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_appended_when_present() {
        assert_eq!(
            path_with_query("/products", Some("page=2&limit=10")),
            "/products?page=2&limit=10"
        );
        assert_eq!(path_with_query("/products", Some("")), "/products");
        assert_eq!(path_with_query("/products", None), "/products");
    }
}
