//! Domain types shared by the edge and resolver services.
//!
//! # Data Flow
//! ```text
//! inbound JSON body
//!     → cep.rs (CepRequest decode, eight-digit validation)
//!     → [resolver: directory + weather lookups]
//!     → temperature.rs (Celsius → Fahrenheit / Kelvin)
//!     → types.rs (WeatherResponse / ErrorResponse envelopes)
//! ```

pub mod cep;
pub mod temperature;
pub mod types;

pub use cep::{is_valid_cep, CepRequest};
pub use temperature::Temperatures;
pub use types::{ErrorResponse, WeatherResponse};
