use axum::{routing::get, Router};
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::normalize::NormalizedResponse;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder. Call once at boot.
    pub fn init() -> Self {
        // Use default buckets to avoid API differences across crate versions.
        let builder = PrometheusBuilder::new();

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        Self { handle }
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

/// Outcome counters live here, recorded by the API layer, so the
/// normalizer itself stays pure.
pub fn record_outcome(resp: &NormalizedResponse) {
    let outcome = if !resp.is_success() {
        "invalid_input"
    } else if resp.is_fallback() {
        "fallback"
    } else {
        "ai"
    };
    counter!("normalize_outcomes_total", "outcome" => outcome).increment(1);
}

pub fn record_track_failure() {
    counter!("track_failures_total").increment(1);
}
