//! Checks and their run state

use serde::{Serialize, Deserialize};

use super::Timestamp;

/// A named plagiarism scan grouping one or more submissions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Check {
    /// Check ID
    pub id: u64,
    /// Name given when the check was created
    pub name: String,
    /// Creation timestamp
    pub created_at: Option<Timestamp>,
    /// Last update timestamp
    pub updated_at: Option<Timestamp>,
    /// Status code of the check
    pub status_id: i64,
    /// Job correlating this check with its live status stream
    pub job_id: u64,
}

/// Run state of a check, returned when a check is started
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckStatusInfo {
    /// The check that was started
    pub check: Check,
    /// Human readable status
    pub status: String,
    /// Submissions are also compared against the Codequiry database
    #[serde(alias = "DBCheck", alias = "dbCheck", alias = "db_check")]
    pub dbcheck: bool,
    /// Submissions are also compared against web sources
    #[serde(alias = "WebCheck", alias = "webCheck", alias = "web_check")]
    pub webcheck: bool,
    /// Number of submissions under the check
    pub submission_count: i64,
    /// Dashboard page of the check
    #[serde(alias = "dashURL", alias = "dashUrl", alias = "dashurl")]
    pub dash_url: String,
}
