//! Metrics collection for portfolio-service.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the Prometheus recorder. Calling it again is a no-op.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!("Failed to install Prometheus recorder: {}", e),
    }
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count an inquiry that reached the store, by outcome (`accepted` or `failed`).
pub fn record_inquiry(outcome: &'static str) {
    counter!("portfolio_inquiries_total", "outcome" => outcome).increment(1);
}

/// Count artworks served by a listing request.
pub fn record_artworks_listed(filtered: bool, count: usize) {
    let filtered = if filtered { "true" } else { "false" };
    counter!("portfolio_artworks_listed_total", "filtered" => filtered).increment(count as u64);
}
