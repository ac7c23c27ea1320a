//! The normalized issue record emitted by the audit.
//!
//! The serialized field names (`fileName`, `problemDescription`, ...) are the
//! wire format consumed by the report frontend, so they must stay camelCase.

use serde::{Deserialize, Serialize};

/// `problem` value of the synthetic record produced when the model's output
/// is not a valid JSON array.
pub const INVALID_JSON_PROBLEM: &str = "Invalid JSON format";

/// `problem` value of the synthetic record produced when the completion
/// request itself fails (timeout, connection, HTTP error).
pub const TRANSPORT_FAILURE_PROBLEM: &str = "Completion request failed";

/// One sustainability issue found in one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    /// Base name of the file the issue was found in.
    pub file_name: String,
    /// Short issue title.
    pub problem: String,
    /// Why it matters.
    pub problem_description: String,
    /// The offending snippet, verbatim.
    pub problematic_code: String,
    /// What to do instead.
    pub optimization: String,
    /// Suggested replacement code.
    pub optimized_code: String,
}

/// Aggregate counts over a finished audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Total issue records, including synthetic fallbacks.
    pub total: usize,
    /// Distinct files that produced at least one record.
    pub files: usize,
    /// Synthetic records (malformed output or failed requests).
    pub fallbacks: usize,
}

impl Summary {
    pub fn from_records(records: &[IssueRecord]) -> Self {
        let mut files: Vec<&str> = records.iter().map(|r| r.file_name.as_str()).collect();
        files.sort_unstable();
        files.dedup();
        let fallbacks = records
            .iter()
            .filter(|r| r.problem == INVALID_JSON_PROBLEM || r.problem == TRANSPORT_FAILURE_PROBLEM)
            .count();
        Self {
            total: records.len(),
            files: files.len(),
            fallbacks,
        }
    }
}
