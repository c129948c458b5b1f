//! Credit Risk Scoring — Binary Entrypoint
//! Boots the Axum HTTP server (pages, JSON API, CSV export, /metrics) on Shuttle.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a tracing subscriber unless the runtime already did.
///
/// Filter comes from `RUST_LOG` (default `credit_risk_scoring=info,warn`);
/// `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("credit_risk_scoring=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This enables SCORING_CONFIG_PATH / SCORING_PDO etc. from .env
    let _ = dotenvy::dotenv();

    init_tracing();

    let router = credit_risk_scoring::app()
        .map_err(|e| shuttle_runtime::Error::Custom(e.context("building scoring app")))?;

    Ok(router.into())
}
