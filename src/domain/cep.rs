//! Brazilian postal code (CEP) request and validation.

use serde::{Deserialize, Deserializer, Serialize};

/// Number of decimal digits in a well-formed CEP.
pub const CEP_LENGTH: usize = 8;

/// Inbound body for both `/cep` and `/weather`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CepRequest {
    /// A missing or `null` field decodes as empty and is then rejected by
    /// validation.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cep: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl CepRequest {
    pub fn new(cep: impl Into<String>) -> Self {
        Self { cep: cep.into() }
    }

    pub fn is_valid(&self) -> bool {
        is_valid_cep(&self.cep)
    }
}

/// Returns true only for exactly eight ASCII decimal digits.
pub fn is_valid_cep(cep: &str) -> bool {
    cep.len() == CEP_LENGTH && cep.bytes().all(|b| b.is_ascii_digit())
}
