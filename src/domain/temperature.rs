//! Temperature conversions.
//!
//! Kelvin uses an integer offset of 273 rather than 273.15 so results stay
//! identical to the values clients have been receiving.

/// A Celsius reading together with its derived scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperatures {
    pub celsius: f64,
    pub fahrenheit: f64,
    pub kelvin: f64,
}

impl Temperatures {
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            celsius,
            fahrenheit: celsius * 1.8 + 32.0,
            kelvin: celsius + 273.0,
        }
    }
}
