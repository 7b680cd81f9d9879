#![warn(missing_docs, non_ascii_idents, trivial_numeric_casts,
    unused_crate_dependencies, noop_method_call, single_use_lifetimes, trivial_casts,
    unused_lifetimes, nonstandard_style, variant_size_differences)]
#![deny(keyword_idents)]
#![allow(clippy::needless_return)]

//! A library to help access the Codequiry API from rust

mod types;
mod connection;
mod modules;
mod socketio;
pub mod models;

use std::sync::Arc;

use modules::account::Account;
use modules::check::Check;
use modules::file::File;
use modules::status::Status;
pub use modules::status::{Subscription, JOB_CHECK_EVENT, JOB_STATUS_EVENT};
pub use types::{Error, Result};
pub use connection::{decode_response, ApiResponse, ClientConfig, Connection, API_BASE_URL, API_UPLOAD_URL, SOCKETS_BASE_URL};


/// A client to communicate with the Codequiry API
pub struct Client {
    /// Account API endpoints
    pub account: Account,
    /// Check API endpoints
    pub check: Check,
    /// File upload API endpoints
    pub file: File,
    /// Job status notifications
    pub status: Status,
}

impl Client {
    /// Prepare a client for the production service
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_config(api_key, ClientConfig::default())
    }

    /// Prepare a client with custom endpoints or transport settings
    pub fn with_config(api_key: &str, config: ClientConfig) -> Result<Self> {
        let connection = Arc::new(Connection::new(api_key, config)?);
        Ok(Self::from_connection(connection))
    }

    /// Build a client around an existing connection
    pub fn from_connection(connection: Arc<Connection>) -> Self {
        Self {
            account: Account::new(connection.clone()),
            check: Check::new(connection.clone()),
            file: File::new(connection.clone()),
            status: Status::new(connection),
        }
    }
}
