// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns the configured error metrics sink, or a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns the configured service dispatch metrics sink, or a no-op sink.
pub fn service_metrics() -> &'static dyn ServiceMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns the configured storage metrics sink, or a no-op sink.
pub fn storage_metrics() -> &'static dyn StorageMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns the configured verification metrics sink, or a no-op sink.
pub fn verification_metrics() -> &'static dyn VerificationMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

// --- Trait Definitions ---

/// A sink for metrics related to the state backends.
pub trait StorageMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the number of committed write batches.
    fn inc_batches_committed(&self);
    /// Increments the total number of value bytes written to the backend.
    fn inc_bytes_written_total(&self, bytes: u64);
}
impl StorageMetricsSink for NopSink {
    fn inc_batches_committed(&self) {}
    fn inc_bytes_written_total(&self, _bytes: u64) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and stable code.
    fn inc_error(&self, kind: &'static str, code: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _code: &'static str) {}
}

/// A sink for service-level metrics related to the generic dispatch mechanism.
pub trait ServiceMetricsSink: Send + Sync + std::fmt::Debug {
    /// Observes the latency of a dispatched call or query, labeled by service and method.
    fn observe_service_dispatch_latency(&self, service_id: &str, method: &str, duration_secs: f64);
    /// Increments a counter for failed dispatches, labeled by the error code.
    fn inc_dispatch_error(&self, service_id: &str, method: &str, code: &'static str);
}
impl ServiceMetricsSink for NopSink {
    fn observe_service_dispatch_latency(
        &self,
        _service_id: &str,
        _method: &str,
        _duration_secs: f64,
    ) {
    }
    fn inc_dispatch_error(&self, _service_id: &str, _method: &str, _code: &'static str) {}
}

/// A sink for domain metrics of the verification service.
pub trait VerificationMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of recorded submissions.
    fn inc_submissions(&self);
    /// Increments the counter of accepted endorsements.
    fn inc_endorsements(&self);
    /// Increments the counter of submissions that reached consensus.
    fn inc_consensus_reached(&self);
    /// Sets the gauge of currently active oracles.
    fn set_active_oracles(&self, count: u64);
}
impl VerificationMetricsSink for NopSink {
    fn inc_submissions(&self) {}
    fn inc_endorsements(&self) {}
    fn inc_consensus_reached(&self) {}
    fn set_active_oracles(&self, _count: u64) {}
}

/// A unified sink that implements all domain-specific traits, providing a single
/// point of implementation for metrics backends like Prometheus.
pub trait MetricsSink:
    StorageMetricsSink + ErrorMetricsSink + ServiceMetricsSink + VerificationMetricsSink
{
}

impl<T> MetricsSink for T where
    T: StorageMetricsSink + ErrorMetricsSink + ServiceMetricsSink + VerificationMetricsSink
{
}
