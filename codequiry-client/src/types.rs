
use crate::models::error::ApiError;

/// Result type returned by every client operation
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to the Codequiry service
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with a failure status and no recognizable error body
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String
    },
    /// The service reported an error with its `{"error": ...}` shape
    #[error("server error: {0}")]
    Server(ApiError),
    /// The body matched neither the expected shape nor the error shape
    #[error("could not decode response: {0}")]
    Decode(String),
    /// A timestamp was not in the `YYYY-MM-DD HH:MM:SS` format
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// Reading a local file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A configured header name or value could not be used
    #[error("invalid header")]
    InvalidHeader,
    /// The client configuration could not be applied
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The status channel could not be established or failed while open
    #[error("there was an error when trying to establish a socket connection: {0}")]
    SocketConnection(String),
    /// The job subscription event could not be sent
    #[error("error when trying to check the job status: {0}")]
    JobSubscription(String),
    /// A status channel packet could not be decoded
    #[error("malformed packet: {0}")]
    MalformedPacket(String),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Transport(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Decode(value.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderName> for Error {
    fn from(_value: reqwest::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(_value: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader
    }
}

impl From<url::ParseError> for Error {
    fn from(value: url::ParseError) -> Self {
        Error::Configuration(value.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Error::SocketConnection(value.to_string())
    }
}
