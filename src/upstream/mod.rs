//! Outbound calls to third-party services.
//!
//! # Data Flow
//! ```text
//! resolver handler span
//!     → directory.rs  (span fetchCityFromCEP: GET /ws/{cep}/json/)
//!     → weather.rs    (span fetchTemperature: GET /v1/current.json)
//!     each via client.rs (shared client, per-call timeout, context injection)
//! ```
//!
//! # Design Decisions
//! - Every failure branch records the error on its span before returning
//! - No retries; one attempt per request

pub mod client;
pub mod directory;
pub mod weather;

use axum::http::StatusCode;
use thiserror::Error;

pub use client::{build_client, send_traced};
pub use directory::DirectoryClient;
pub use weather::WeatherClient;

/// Failure of a single outbound call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, timeout or request construction failure.
    #[error("{upstream} request failed")]
    Transport {
        upstream: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a status other than 200.
    #[error("{upstream} returned status {status}")]
    Status {
        upstream: &'static str,
        status: StatusCode,
    },

    /// Body was not the expected JSON shape.
    #[error("failed to decode {upstream} response")]
    Decode {
        upstream: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Directory reported the CEP as unknown.
    #[error("CEP not found")]
    NotFound,
}

impl UpstreamError {
    /// Name of the upstream involved, for metrics labels.
    pub fn upstream(&self) -> &'static str {
        match self {
            UpstreamError::Transport { upstream, .. }
            | UpstreamError::Status { upstream, .. }
            | UpstreamError::Decode { upstream, .. } => upstream,
            UpstreamError::NotFound => directory::UPSTREAM_NAME,
        }
    }
}
