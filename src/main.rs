//! Lead Diagnostic Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lead_diagnostic_service::api::{self, AppState};
use lead_diagnostic_service::config::ServiceConfig;
use lead_diagnostic_service::metrics::Metrics;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - SERVICE_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("SERVICE_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lead_diagnostic_service=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This enables SERVICE_CONFIG_PATH / AGENT_ENDPOINT from .env
    // so config.rs can pick them up.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let config = ServiceConfig::load();
    let metrics = Metrics::init();

    let state = AppState::from_config(&config);
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
