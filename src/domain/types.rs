//! Response envelopes.

use serde::{Deserialize, Serialize};

use crate::domain::temperature::Temperatures;

/// Success body returned by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl WeatherResponse {
    pub fn new(city: impl Into<String>, temperatures: Temperatures) -> Self {
        Self {
            city: city.into(),
            temp_c: temperatures.celsius,
            temp_f: temperatures.fahrenheit,
            temp_k: temperatures.kelvin,
        }
    }
}

/// JSON error envelope, used only for invalid and unknown zipcodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
