//! Per submission reports and peer matches

use serde::{Serialize, Deserialize};

use super::{LooseNumber, Timestamp};
use super::submission::Submission;

/// Detailed report for a single submission
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionResults {
    /// The submission being reported on
    pub submission: Submission,
    /// Average similarity
    pub avg: Option<LooseNumber>,
    /// Highest similarity
    pub max: Option<LooseNumber>,
    /// Lowest similarity
    pub min: Option<LooseNumber>,
    /// Code spans matched against other submissions
    #[serde(alias = "peerMatches", alias = "peermatches", alias = "PeerMatches")]
    pub peer_matches: Vec<PeerMatch>,
    /// Matches against other sources, shape is not fixed by the service
    pub other_matches: Vec<serde_json::Value>,
    /// Submissions referenced by the matches
    pub related_submissions: Vec<Submission>,
    /// Source files referenced by the matches
    pub related_files: Vec<RelatedFile>,
}

impl SubmissionResults {
    /// Peer matches found against a given submission
    pub fn matches_with(&self, submission_id: u64) -> impl Iterator<Item=&PeerMatch> {
        self.peer_matches.iter().filter(move |item| item.submission_id_matched == submission_id)
    }

    /// Look up a related source file by id
    pub fn related_file(&self, id: u64) -> Option<&RelatedFile> {
        self.related_files.iter().find(|file| file.id == id)
    }
}

/// A similar code span detected between two submissions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerMatch {
    /// Match ID
    pub id: u64,
    /// Submission the span was found in
    pub submission_id: u64,
    /// Submission the span was matched against
    pub submission_id_matched: u64,
    /// Similarity of the span
    pub similarity: Option<LooseNumber>,
    /// Similarity of the matched span
    pub matched_similarity: Option<LooseNumber>,
    /// Path of the file containing the span
    pub file: String,
    /// Path of the file containing the matched span
    pub file_matched: String,
    /// First line of the span
    pub line_start: i64,
    /// Last line of the span
    pub line_end: i64,
    /// Number of tokens covered
    pub tokens: i64,
    /// Creation time, shape is not fixed by the service
    pub created_at: Option<serde_json::Value>,
    /// Last update time, shape is not fixed by the service
    pub updated_at: Option<serde_json::Value>,
    /// First line of the matched span
    pub line_matched_start: i64,
    /// Last line of the matched span
    pub line_matched_end: i64,
    /// Kind of match, as coded by the service
    pub match_type: i64,
}

/// A source file of a related submission
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedFile {
    /// File ID
    pub id: u64,
    /// Submission the file was uploaded with
    pub submission_id: u64,
    /// Path of the file inside the submission
    pub filedir: String,
    /// Raw file content
    pub content: String,
    /// Creation timestamp
    pub created_at: Option<Timestamp>,
    /// Last update timestamp
    pub updated_at: Option<Timestamp>,
    /// Language detected for the file
    pub language_id: i64,
}
