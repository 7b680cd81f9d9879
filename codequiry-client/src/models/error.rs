//! Error report sent by the service

use serde::{Serialize, Deserialize};

/// Error reported by the service in the body of a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Message exactly as the service wrote it
    pub message: String,
}

impl ApiError {
    /// Wrap a service supplied message
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}
