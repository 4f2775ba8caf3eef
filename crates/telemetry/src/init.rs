// Path: crates/telemetry/src/init.rs
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Initializes the global `tracing` subscriber for structured JSON logging at `info`.
pub fn init_tracing() -> Result<(), anyhow::Error> {
    init_tracing_with_default("info")
}

/// Initializes the global `tracing` subscriber for structured JSON logging.
///
/// `RUST_LOG` takes precedence over `default_filter` when set. Records emitted
/// through the `log` facade are bridged into the same subscriber. Logs go to
/// stderr so command output on stdout stays machine-readable.
pub fn init_tracing_with_default(default_filter: &str) -> Result<(), anyhow::Error> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)?,
    };
    let json_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_current_span(false)
        .with_timer(fmt::time::UtcTime::rfc_3339());
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(Registry::default().with(filter).with(json_layer))?;
    Ok(())
}
