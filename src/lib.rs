// src/lib.rs
// Public library surface for the binaries and integration tests.

// Scoring core (pure, no I/O)
pub mod applicant;
pub mod decision;
pub mod engine;
pub mod error;
pub mod risk;
pub mod scorecard;
pub mod table;

// Front end, export & runtime plumbing
pub mod api;
pub mod config;
pub mod export;
pub mod metrics;
pub mod pages;

// ---- Re-exports for stable public API ----
pub use crate::applicant::{ApplicantInput, ApplicantRecord};
pub use crate::decision::{Decision, Recommendation, ScoredRecord};
pub use crate::engine::{score_applicant, score_batch};
pub use crate::error::ScoringError;
pub use crate::risk::probability_of_default;
pub use crate::scorecard::{to_score, Scorecard};

use axum::Router;
use tracing::info;

use crate::api::AppState;
use crate::config::ScoringConfig;

/// Build the full in-process app: pages, JSON API and `/metrics`.
///
/// Configuration is loaded via `ScoringConfig::load_default` (env path,
/// `config/scoring.toml`, then defaults).
pub fn app() -> anyhow::Result<Router> {
    let config = ScoringConfig::load_default()?;
    app_with_config(config)
}

pub fn app_with_config(config: ScoringConfig) -> anyhow::Result<Router> {
    let state = AppState::new(config);
    let scorecard = state.config().scorecard();
    let prom = crate::metrics::Metrics::init(&scorecard)?;
    info!(
        base_score = scorecard.base_score(),
        pdo = scorecard.pdo(),
        max_rows = state.config().batch.max_rows,
        "scoring app ready"
    );
    Ok(api::create_router(state).merge(prom.router()))
}
