//! Confect gateway server: configuration, assembly, and serving

pub mod config;
pub mod error;

pub use config::{Environment, ServerConfig, Settings, UpstreamConfig};
pub use error::{Result, ServerError};

use axum::Router;
use confect_http::{AppState, UpstreamGateway};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// Build the application router from settings
///
/// # Errors
///
/// Returns an error if the upstream gateway is misconfigured
pub fn build_router(settings: &Settings) -> Result<Router> {
    let gateway = UpstreamGateway::builder()
        .base_url(&settings.upstream.base_url)
        .timeout(Duration::from_secs(settings.upstream.timeout_secs))
        .build()?;

    let state = AppState::new(Arc::new(gateway), settings.environment.is_production());

    let mut app = confect_http::routes::router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                settings.server.timeout_secs,
            ))),
    );

    if settings.server.cors_enabled {
        app = app.layer(CorsLayer::permissive());
    }

    Ok(app)
}

/// Bind and serve until shutdown
///
/// # Errors
///
/// Returns an error if binding or serving fails
pub async fn serve(settings: Settings) -> Result<()> {
    let app = build_router(&settings)?;

    let listener = TcpListener::bind(settings.server.bind_addr).await?;
    info!("Confect gateway listening on {}", settings.server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Received shutdown signal");
}
