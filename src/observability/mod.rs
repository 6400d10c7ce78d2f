//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and upstream clients produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → telemetry.rs (OpenTelemetry spans, W3C context propagation)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//!     → Zipkin collector (batched span export)
//! ```

pub mod logging;
pub mod metrics;
pub mod telemetry;

pub use telemetry::{SpanGuard, Telemetry, TelemetryError};
