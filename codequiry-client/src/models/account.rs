//! Account details

use serde::{Serialize, Deserialize};

use super::LooseNumber;

/// Account details and remaining quota for the api key in use
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    /// Name of the account holder
    pub user: String,
    /// Email of the account holder
    pub email: String,
    /// Peer checks left on the plan, sent as a string by the service
    pub peer_checks_remaining: LooseNumber,
    /// Pro checks left on the plan
    pub pro_checks_remaining: i64,
    /// Number of submissions made so far
    pub submissions: i64,
}
