//! CEP → temperature pipeline with end-to-end distributed tracing.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──POST /cep──▶ Edge (A) ──POST /weather──▶ Resolver (B) ──GET──▶ Directory
//!                          │                           │             └─GET──▶ Weather provider
//!                          ▼                           ▼
//!                     handleCEP span            handleWeather span
//!                                                ├─ fetchCityFromCEP
//!                                                └─ fetchTemperature
//!
//!   traceparent / tracestate / baggage travel on every hop; spans are
//!   batched to a Zipkin collector by each process.
//! ```

pub mod config;
pub mod domain;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::{Role, Shutdown};
pub use observability::Telemetry;
