//! Chartdeck HTTP API
//!
//! HTTP layer for the dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - Dashboard page
//!
//! ## Sessions
//! - `POST /api/v1/sessions` - Open a session
//! - `GET /api/v1/sessions/:id` - Inspect a session
//! - `DELETE /api/v1/sessions/:id` - Close a session
//! - `POST /api/v1/sessions/:id/upload` - Upload a CSV file
//! - `PUT /api/v1/sessions/:id/chart-type` - Change chart type
//! - `PUT /api/v1/sessions/:id/selection` - Change column selections
//! - `POST /api/v1/sessions/:id/generate` - Generate the chart
//!
//! ## One-shot
//! - `POST /api/v1/preview` - Preview and pickers for an upload
//! - `POST /api/v1/chart` - Chart for an upload plus a selection
//! - `GET /api/v1/chart-types` - Chart type picker contents
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use chartdeck::api::{serve, ApiConfig, AppState};
//! use chartdeck::session::StoreConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::default();
//!     let state = AppState::new(config.clone(), StoreConfig::default());
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;

    let api_routes = Router::new()
        // Session routes
        .route("/sessions", post(routes::sessions::create_session))
        .route(
            "/sessions/:id",
            get(routes::sessions::get_session).delete(routes::sessions::delete_session),
        )
        .route("/sessions/:id/upload", post(routes::sessions::upload))
        .route(
            "/sessions/:id/chart-type",
            put(routes::sessions::set_chart_type),
        )
        .route("/sessions/:id/selection", put(routes::sessions::set_selection))
        .route("/sessions/:id/generate", post(routes::sessions::generate))
        // One-shot routes
        .route("/preview", post(routes::oneshot::preview))
        .route("/chart", post(routes::oneshot::chart))
        .route("/chart-types", get(routes::oneshot::chart_types))
        // Uploads arrive base64-encoded inside JSON
        .layer(DefaultBodyLimit::max(max_body_size));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::page::index))
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the HTTP server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Chartdeck dashboard listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Chartdeck shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
