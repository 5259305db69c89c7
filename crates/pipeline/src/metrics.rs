use std::net::SocketAddr;

use metrics::{Counter, Histogram};
use metrics_derive::Metrics;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Metrics for the `txflow_pipeline` component.
/// Conventions:
/// - Durations are recorded in seconds (histograms).
/// - Counters are monotonic event counts.
#[derive(Metrics, Clone)]
#[metrics(scope = "txflow_pipeline")]
pub struct PipelineMetrics {
    #[metric(describe = "Sponsored operations accepted by the bundler")]
    pub sponsored_submitted: Counter,

    #[metric(describe = "Sponsored attempts that fell back to the direct path")]
    pub sponsored_fallbacks: Counter,

    #[metric(describe = "Direct transactions broadcast")]
    pub direct_submitted: Counter,

    #[metric(describe = "Direct transactions that failed to broadcast")]
    pub direct_failed: Counter,

    #[metric(describe = "End-to-end duration of submit")]
    pub submit_duration: Histogram,
}

/// Serve Prometheus metrics on `addr`.
pub fn init_prometheus_exporter(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    Ok(())
}
