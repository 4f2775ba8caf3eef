// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram_vec, register_int_counter, register_int_counter_vec,
    register_int_gauge, Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

// --- Metric Statics ---
// Collectors are registered with the default registry exactly once by `install`.
// Until then every sink method is a no-op.

static STORAGE_BATCHES_COMMITTED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static STORAGE_BYTES_WRITTEN_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static SVC_DISPATCH_LATENCY_SECONDS: OnceCell<HistogramVec> = OnceCell::new();
static SVC_DISPATCH_ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static VERIFY_SUBMISSIONS_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static VERIFY_ENDORSEMENTS_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static VERIFY_CONSENSUS_REACHED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static VERIFY_ACTIVE_ORACLES: OnceCell<IntGauge> = OnceCell::new();

/// The Prometheus-backed implementation of every sink trait.
#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

impl StorageMetricsSink for PrometheusSink {
    fn inc_batches_committed(&self) {
        if let Some(m) = STORAGE_BATCHES_COMMITTED_TOTAL.get() {
            m.inc();
        }
    }
    fn inc_bytes_written_total(&self, bytes: u64) {
        if let Some(m) = STORAGE_BYTES_WRITTEN_TOTAL.get() {
            m.inc_by(bytes);
        }
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, code: &'static str) {
        if let Some(m) = ERRORS_TOTAL.get() {
            m.with_label_values(&[kind, code]).inc();
        }
    }
}

impl ServiceMetricsSink for PrometheusSink {
    fn observe_service_dispatch_latency(&self, service_id: &str, method: &str, duration_secs: f64) {
        if let Some(m) = SVC_DISPATCH_LATENCY_SECONDS.get() {
            m.with_label_values(&[service_id, method])
                .observe(duration_secs);
        }
    }
    fn inc_dispatch_error(&self, service_id: &str, method: &str, code: &'static str) {
        if let Some(m) = SVC_DISPATCH_ERRORS_TOTAL.get() {
            m.with_label_values(&[service_id, method, code]).inc();
        }
    }
}

impl VerificationMetricsSink for PrometheusSink {
    fn inc_submissions(&self) {
        if let Some(m) = VERIFY_SUBMISSIONS_TOTAL.get() {
            m.inc();
        }
    }
    fn inc_endorsements(&self) {
        if let Some(m) = VERIFY_ENDORSEMENTS_TOTAL.get() {
            m.inc();
        }
    }
    fn inc_consensus_reached(&self) {
        if let Some(m) = VERIFY_CONSENSUS_REACHED_TOTAL.get() {
            m.inc();
        }
    }
    fn set_active_oracles(&self, count: u64) {
        if let Some(m) = VERIFY_ACTIVE_ORACLES.get() {
            m.set(i64::try_from(count).unwrap_or(i64::MAX));
        }
    }
}

fn already_installed(name: &str) -> prometheus::Error {
    prometheus::Error::Msg(format!("metric {} is already installed", name))
}

/// Registers every collector with the default registry and returns the sink.
///
/// Calling it a second time fails with a registration error.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    STORAGE_BATCHES_COMMITTED_TOTAL
        .set(register_int_counter!(
            "verdant_storage_batches_committed_total",
            "Total number of write batches committed to the state backend."
        )?)
        .map_err(|_| already_installed("verdant_storage_batches_committed_total"))?;
    STORAGE_BYTES_WRITTEN_TOTAL
        .set(register_int_counter!(
            "verdant_storage_bytes_written_total",
            "Total value bytes written to the state backend."
        )?)
        .map_err(|_| already_installed("verdant_storage_bytes_written_total"))?;
    ERRORS_TOTAL
        .set(register_int_counter_vec!(
            "verdant_errors_total",
            "Total number of errors, categorized by kind and stable code.",
            &["kind", "code"]
        )?)
        .map_err(|_| already_installed("verdant_errors_total"))?;
    SVC_DISPATCH_LATENCY_SECONDS
        .set(register_histogram_vec!(
            "verdant_service_dispatch_latency_seconds",
            "Latency of dispatched service calls and queries.",
            &["service_id", "method"],
            exponential_buckets(0.00005, 2.0, 16)?
        )?)
        .map_err(|_| already_installed("verdant_service_dispatch_latency_seconds"))?;
    SVC_DISPATCH_ERRORS_TOTAL
        .set(register_int_counter_vec!(
            "verdant_service_dispatch_errors_total",
            "Total errors returned from service dispatch.",
            &["service_id", "method", "code"]
        )?)
        .map_err(|_| already_installed("verdant_service_dispatch_errors_total"))?;
    VERIFY_SUBMISSIONS_TOTAL
        .set(register_int_counter!(
            "verdant_verification_submissions_total",
            "Total number of submissions recorded."
        )?)
        .map_err(|_| already_installed("verdant_verification_submissions_total"))?;
    VERIFY_ENDORSEMENTS_TOTAL
        .set(register_int_counter!(
            "verdant_verification_endorsements_total",
            "Total number of endorsements accepted."
        )?)
        .map_err(|_| already_installed("verdant_verification_endorsements_total"))?;
    VERIFY_CONSENSUS_REACHED_TOTAL
        .set(register_int_counter!(
            "verdant_verification_consensus_reached_total",
            "Total number of submissions that reached consensus."
        )?)
        .map_err(|_| already_installed("verdant_verification_consensus_reached_total"))?;
    VERIFY_ACTIVE_ORACLES
        .set(register_int_gauge!(
            "verdant_verification_active_oracles",
            "Number of currently active oracles."
        )?)
        .map_err(|_| already_installed("verdant_verification_active_oracles"))?;

    static SINK: PrometheusSink = PrometheusSink;
    Ok(&SINK)
}

/// Renders every metric in the default registry in the Prometheus text format.
pub fn render_text() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
