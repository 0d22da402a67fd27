//! Analytics aggregation
//!
//! The overview fans out to two independent upstream reads and joins
//! them. The stats fetch is primary; the recent-orders fetch degrades to
//! an empty list on failure so the dashboard still renders.

use axum::{extract::State, response::Response};
use axum_extra::extract::CookieJar;
use confect_core::ApiEnvelope;
use reqwest::Method;
use serde_json::{Value as JsonValue, json};
use tracing::instrument;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::routes::respond;
use crate::session::CookieSession;
use crate::state::AppState;

/// Combined dashboard overview
#[utoipa::path(
    get,
    path = "/overview",
    responses(
        (status = 200, description = "Stats plus recent orders (orders may degrade to empty)"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "analytics"
)]
#[instrument(name = "analytics_overview", skip(state, jar))]
pub async fn overview(State(state): State<AppState>, jar: CookieJar) -> Response {
    let session = CookieSession::new(jar, state.cookie_secure());

    let (stats, recent) = tokio::join!(
        state
            .gateway()
            .send(Method::GET, "/analytics/stats", None, &session),
        state
            .gateway()
            .send(Method::GET, "/orders?limit=10", None, &session),
    );

    if !stats.succeeded {
        return respond(session, stats);
    }

    let recent_orders = if recent.succeeded {
        recent.data.unwrap_or_else(|| json!([]))
    } else {
        warn!("Recent-orders fetch failed ({}), serving empty list", recent.status());
        json!([])
    };

    let envelope: ApiEnvelope<JsonValue> = ApiEnvelope::success(json!({
        "stats": stats.data,
        "recentOrders": recent_orders,
    }));

    respond(session, envelope)
}

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(overview))
}
