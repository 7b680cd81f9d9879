//! Job status updates

use serde::{Deserialize, Deserializer, Serialize};

use super::LooseNumber;

/// Progress of a running check, as pushed on the status channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobStatus {
    /// Set to 1 when the job failed
    #[serde(deserialize_with = "loose_integer")]
    pub error: i64,
    /// Completion from 0 to 100
    #[serde(deserialize_with = "loose_integer")]
    pub percent: i64,
}

impl JobStatus {
    /// Parse a raw status message
    pub fn parse(message: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(message)
    }

    /// No further status will follow this one
    pub fn is_terminal(&self) -> bool {
        self.error == 1 || self.percent == 100
    }
}

/// Accept whole numbers sent as floats or numeric strings
fn loose_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = LooseNumber::deserialize(deserializer)?;
    match value.as_f64() {
        Some(number) if number.is_finite() => Ok(number.trunc() as i64),
        _ => Err(serde::de::Error::custom(format!("not a number: {value:?}"))),
    }
}
