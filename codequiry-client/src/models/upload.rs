//! File upload outcomes

use serde::{Serialize, Deserialize};

use super::{LooseNumber, Timestamp};
use super::check::Check;

/// Per criterion status of an uploaded file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentStatus {
    /// Status ID
    pub id: u64,
    /// Status label
    pub status: String,
    /// Display icon, shape is not fixed by the service
    pub icon: serde_json::Value,
    /// Display colour
    pub color: String,
    /// Creation timestamp
    pub created_at: Option<Timestamp>,
    /// Last update timestamp
    pub updated_at: Option<Timestamp>,
}

/// Outcome of uploading one file to a check
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadData {
    /// Submission ID created for the file
    pub id: u64,
    /// Name of the uploaded file
    pub filename: String,
    /// Status code of the submission
    pub status_id: i64,
    /// Creation time, as the service formatted it
    pub created_at: Option<String>,
    /// Last update time, as the service formatted it
    pub updated_at: Option<String>,
    /// First sub-score
    pub result1: Option<LooseNumber>,
    /// Second sub-score
    pub result2: Option<LooseNumber>,
    /// Third sub-score
    pub result3: Option<LooseNumber>,
    /// Combined score
    pub total_result: Option<LooseNumber>,
    /// Time of the last modification by the uploader, as the service formatted it
    pub modify_updated_at: Option<String>,
    /// Status entries for the file
    #[serde(alias = "assignmentStatuses", alias = "assignmentstatuses", alias = "AssignmentStatuses")]
    pub assignment_statuses: Vec<AssignmentStatus>,
    /// Stored file reference
    pub file: String,
    /// Number of submissions now under the check
    pub submission_count: i64,
    /// Check the file was uploaded to
    pub check: Check,
}
