//! Chartdeck Dashboard Server
//!
//! Run with: cargo run --bin chartdeck
//!
//! # Configuration
//!
//! Read from the first config file found (see [`Config::load_default`]),
//! then overridden by environment variables:
//! - `CHARTDECK_HOST`: Host to bind to (default: 127.0.0.1)
//! - `CHARTDECK_PORT`: Port to listen on (default: 8050)
//! - `CHARTDECK_MAX_UPLOAD_BYTES`: Request body limit (default: 20 MiB)
//! - `CHARTDECK_DEBUG`: Verbose logging (default: false)
//! - `CHARTDECK_MAX_SESSIONS`: Concurrent session limit (default: 256)
//! - `CHARTDECK_LOG_FORMAT`: `pretty` or `json` (default: pretty)
//! - `RUST_LOG`: Log filter, takes precedence over the config file

use chartdeck::api::{serve, AppState};
use chartdeck::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, source) = Config::load_default();

    // Initialize tracing
    let (json_layer, pretty_layer) = if config.logging.format == "json" {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(json_layer)
        .with(pretty_layer)
        .init();

    source.log();
    tracing::info!("Starting Chartdeck v{}", env!("CARGO_PKG_VERSION"));

    let api_config = config.api_config();
    let store_config = config.store_config();

    tracing::info!(
        max_sessions = store_config.max_sessions,
        idle_timeout_secs = store_config.idle_timeout.as_secs(),
        max_upload_bytes = api_config.max_body_size,
        "Session store configured"
    );

    let state = AppState::new(api_config.clone(), store_config);

    // Evict sessions whose tabs went away
    let sweep_handle = state.sessions.start_background_sweep();

    serve(state, &api_config).await?;

    sweep_handle.abort();
    tracing::info!("Chartdeck stopped");

    Ok(())
}
