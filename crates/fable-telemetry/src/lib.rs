//! Telemetry for the Fable narration service
//!
//! Structured logging via the `tracing` ecosystem. Filter directives come
//! from the `[telemetry]` config section, falling back to `RUST_LOG`, then
//! `"info"`.

use fable_config::{LogFormat, TelemetryConfig};

/// Initialize the global tracing subscriber
///
/// # Errors
///
/// Returns an error if a subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = config
        .and_then(|c| c.filter.clone())
        .map_or_else(
            || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            |directives| EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let format = config.map(|c| c.format).unwrap_or_default();

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Full => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);
            registry
                .with(fmt_layer)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
        }
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);
            registry
                .with(fmt_layer)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
        }
    }

    Ok(())
}
