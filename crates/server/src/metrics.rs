//! Prometheus metrics

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder; idempotent
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .expect("install Prometheus recorder")
        })
        .clone()
}

/// Render the metrics exposition text
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Record one completed conversation turn
pub fn record_turn(intent: &str, latency_ms: f64, had_audio: bool) {
    metrics::counter!("plushpal_turns_total", "intent" => intent.to_string()).increment(1);
    metrics::histogram!("plushpal_turn_latency_ms").record(latency_ms);
    if !had_audio {
        metrics::counter!("plushpal_turns_text_only_total").increment(1);
    }
}

/// Record a client-facing error by code
pub fn record_error(code: &str) {
    metrics::counter!("plushpal_errors_total", "code" => code.to_string()).increment(1);
}
