//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Edge (A)                                Resolver (B)
//!   server.rs (router, middleware)          server.rs
//!   → edge.rs  handleCEP span               → resolver.rs handleWeather span
//!   → request.rs (method, body, CEP)        → request.rs
//!   → POST resolver /weather  ───────────▶  → upstream::directory, upstream::weather
//!   → response.rs (mirror, stream) ◀──────  → response.rs (JSON / error mapping)
//! ```

pub mod edge;
pub mod request;
pub mod resolver;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::PipelineError;
pub use server::HttpServer;
