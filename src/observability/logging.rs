//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber once per process
//! - Honour `RUST_LOG` when set, otherwise the configured level
//! - Emit JSON for log shippers or human-readable lines for development

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Install the global log subscriber.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

/// Filter used when `RUST_LOG` is absent. Exporter diagnostics from the
/// OpenTelemetry SDK stay visible at warn.
pub fn default_directives(level: &str) -> String {
    format!("cep_weather={level},tower_http={level},opentelemetry=warn,opentelemetry_sdk=warn")
}
