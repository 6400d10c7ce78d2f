//! Configuration schema definitions.
//!
//! One file configures both services; each role reads the sections it needs.
//! All types derive Serde traits and every field has a default, so an empty
//! file (or no file at all) yields a runnable configuration.

use serde::{Deserialize, Serialize};

/// Placeholder used when no weather API key is configured.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_DEFAULT_API_KEY";

/// Environment variable that overrides `upstream.weather_api_key`.
pub const WEATHER_API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Root configuration for the pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Edge service (A) settings.
    pub edge: EdgeConfig,

    /// Resolver service (B) settings.
    pub resolver: ResolverConfig,

    /// Third-party endpoints used by the resolver.
    pub upstream: UpstreamConfig,

    /// Inbound and outbound deadlines.
    pub timeouts: TimeoutConfig,

    /// Span export settings.
    pub telemetry: TelemetryConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// Apply overrides taken from the process environment.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_weather_api_key(std::env::var(WEATHER_API_KEY_ENV).ok());
        self
    }

    /// Replace the weather API key when a non-empty value is supplied.
    pub fn apply_weather_api_key(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.upstream.weather_api_key = key;
        }
    }

    /// True when requests to the weather provider will carry the placeholder key.
    pub fn uses_placeholder_api_key(&self) -> bool {
        self.upstream.weather_api_key == PLACEHOLDER_API_KEY
    }
}

/// Edge service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Base URL of the resolver; `/weather` is appended.
    pub resolver_url: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            resolver_url: "http://service-b:8081".to_string(),
        }
    }
}

impl EdgeConfig {
    /// Full URL of the resolver's weather endpoint.
    pub fn weather_endpoint(&self) -> String {
        format!("{}/weather", self.resolver_url.trim_end_matches('/'))
    }
}

/// Resolver service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Bind address (e.g., "0.0.0.0:8081").
    pub bind_address: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8081".to_string(),
        }
    }
}

/// Postal-code directory and weather provider endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Directory base URL; lookups go to `{base}/ws/{cep}/json/`.
    pub directory_url: String,

    /// Weather provider base URL; lookups go to `{base}/v1/current.json`.
    pub weather_url: String,

    /// API key for the weather provider.
    pub weather_api_key: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            directory_url: "https://viacep.com.br".to_string(),
            weather_url: "http://api.weatherapi.com".to_string(),
            weather_api_key: PLACEHOLDER_API_KEY.to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total deadline for each outbound HTTP call, in seconds.
    pub outbound_secs: u64,

    /// Deadline for handling one inbound request, in seconds.
    pub inbound_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            outbound_secs: 5,
            inbound_secs: 30,
        }
    }
}

/// Span export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Export spans to the collector. Propagation works either way.
    pub enabled: bool,

    /// Zipkin-compatible collector endpoint.
    pub collector_endpoint: String,

    /// Overrides the per-role default service name.
    pub service_name: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            collector_endpoint: "http://zipkin:9411/api/v2/spans".to_string(),
            service_name: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
