//! Tracing/logging pipeline for the catalog service.

use catalog_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. `RUST_LOG` wins when set;
/// otherwise everything at `info` and above is emitted. Safe to call more
/// than once; later calls are no-ops.
pub fn init(settings: &TelemetrySettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let initialized = match settings.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    if initialized.is_err() {
        tracing::debug!(target: "catalog-telemetry", "subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let settings = TelemetrySettings::default();
        init(&settings);
        // Second call must not panic even though a subscriber is installed.
        init(&settings);
    }
}
