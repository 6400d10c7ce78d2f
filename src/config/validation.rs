//! Configuration validation.
//!
//! Serde handles syntax; this checks values: addresses parse, URLs are
//! absolute http(s), deadlines are non-zero. All problems are reported at
//! once rather than stopping at the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid http(s) URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "edge.bind_address", &config.edge.bind_address);
    check_address(&mut errors, "resolver.bind_address", &config.resolver.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    check_url(&mut errors, "edge.resolver_url", &config.edge.resolver_url);
    check_url(&mut errors, "upstream.directory_url", &config.upstream.directory_url);
    check_url(&mut errors, "upstream.weather_url", &config.upstream.weather_url);
    if config.telemetry.enabled {
        check_url(
            &mut errors,
            "telemetry.collector_endpoint",
            &config.telemetry.collector_endpoint,
        );
    }

    if config.timeouts.outbound_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.outbound_secs" });
    }
    if config.timeouts.inbound_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.inbound_secs" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let ok = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false);
    if !ok {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
