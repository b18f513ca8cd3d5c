use std::sync::OnceLock;
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

pub(crate) fn record_omr_submission(outcome: &'static str, upstream_elapsed: Duration) {
    metrics::counter!("omr_submissions_total", "outcome" => outcome).increment(1);
    metrics::histogram!("omr_upstream_duration_seconds", "outcome" => outcome)
        .record(upstream_elapsed.as_secs_f64());
}

pub(crate) fn record_store_operation(backend: &'static str, operation: &'static str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    metrics::counter!(
        "store_operations_total",
        "backend" => backend,
        "operation" => operation,
        "result" => result
    )
    .increment(1);
}
