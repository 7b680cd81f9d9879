//! Submissions and check overviews

use serde::{Serialize, Deserialize};

use super::Timestamp;

/// One uploaded artifact analyzed within a check
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Submission {
    /// Submission ID
    pub id: u64,
    /// Name of the uploaded file
    pub filename: String,
    /// Status code of the submission
    pub status_id: i64,
    /// Creation timestamp
    pub created_at: Option<Timestamp>,
    /// Last update timestamp
    pub updated_at: Option<Timestamp>,
    /// First sub-score
    pub result1: f32,
    /// Second sub-score
    pub result2: f32,
    /// Third sub-score
    pub result3: f32,
    /// Combined score
    #[serde(alias = "totalresult", alias = "TotalResult")]
    pub total_result: f32,
    /// Pairwise comparisons against other submissions
    pub submission_results: Vec<SubmissionResult>,
}

/// Similarity between two submissions of the same check
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionResult {
    /// Result ID
    pub id: u64,
    /// Submission this result belongs to
    pub submission_id: u64,
    /// Submission it was compared against
    pub submission_id_compared: u64,
    /// Similarity score
    pub score: f32,
    /// Creation timestamp
    pub created_at: Option<Timestamp>,
    /// Last update timestamp
    pub updated_at: Option<Timestamp>,
}

/// Summary of every submission under a check
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Overview {
    /// Overview page of the check
    #[serde(alias = "overviewURL", alias = "overviewUrl", alias = "overviewurl")]
    pub overview_url: String,
    /// Submissions under the check
    pub submissions: Vec<Submission>,
    /// Chart data, shape is not fixed by the service
    pub bardata: serde_json::Value,
}

impl Overview {
    /// Find a submission of this check by id
    pub fn submission(&self, id: u64) -> Option<&Submission> {
        self.submissions.iter().find(|submission| submission.id == id)
    }
}
