use anyhow::anyhow;
use axum::{routing::get, Router};
use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::decision::Decision;
use crate::scorecard::Scorecard;

// The global recorder can only be installed once per process; routers built
// later (tests, hot restarts) share the same handle.
static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder and expose the active scorecard as gauges.
    pub fn init(scorecard: &Scorecard) -> anyhow::Result<Self> {
        let handle = HANDLE
            .get_or_try_init(|| {
                PrometheusBuilder::new()
                    .install_recorder()
                    .map_err(|e| anyhow!("prometheus: install recorder: {e}"))
            })?
            .clone();

        gauge!("credit_scoring_base_score").set(scorecard.base_score());
        gauge!("credit_scoring_pdo").set(scorecard.pdo());

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

pub fn record_applicant(decision: Decision) {
    counter!("credit_scoring_applicants_total", "decision" => decision.code()).increment(1);
}

pub fn record_batch(rows: usize) {
    counter!("credit_scoring_batches_total").increment(1);
    counter!("credit_scoring_batch_rows_total").increment(rows as u64);
}

pub fn record_failure(kind: &'static str) {
    counter!("credit_scoring_failures_total", "kind" => kind).increment(1);
}
