//! Records returned by the Codequiry API

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_with::{SerializeDisplay, DeserializeFromStr};

use crate::types::Error;

pub mod account;
pub mod check;
pub mod error;
pub mod results;
pub mod status;
pub mod submission;
pub mod upload;

/// Literal layout of every timestamp the service sends
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A zone-less timestamp in the `YYYY-MM-DD HH:MM:SS` form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct Timestamp {
    value: NaiveDateTime
}

impl Timestamp {
    /// Access the underlying chrono value
    pub fn naive(&self) -> NaiveDateTime {
        self.value
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self { value }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value.format(TIMESTAMP_FORMAT))
    }
}

impl std::ops::Deref for Timestamp {
    type Target = NaiveDateTime;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl std::str::FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts unpadded fields, the wire format doesn't
        if !has_timestamp_layout(s) {
            return Err(Error::InvalidTimestamp(s.to_owned()))
        }
        match NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT) {
            Ok(value) => Ok(Self { value }),
            Err(_) => Err(Error::InvalidTimestamp(s.to_owned())),
        }
    }
}

fn has_timestamp_layout(s: &str) -> bool {
    const LAYOUT: &[u8] = b"0000-00-00 00:00:00";
    let bytes = s.as_bytes();
    bytes.len() == LAYOUT.len() && bytes.iter().zip(LAYOUT).all(|(byte, expected)| {
        if *expected == b'0' { byte.is_ascii_digit() } else { byte == expected }
    })
}

/// A value the service sends either as a JSON number or as a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    /// Sent as a JSON number
    Number(f64),
    /// Sent as a string
    Text(String),
}

impl LooseNumber {
    /// Read the value as a float, if the text form holds one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LooseNumber::Number(value) => Some(*value),
            LooseNumber::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl Default for LooseNumber {
    fn default() -> Self {
        LooseNumber::Number(0.0)
    }
}

impl From<f64> for LooseNumber {
    fn from(value: f64) -> Self {
        LooseNumber::Number(value)
    }
}

impl From<&str> for LooseNumber {
    fn from(value: &str) -> Self {
        LooseNumber::Text(value.to_owned())
    }
}
