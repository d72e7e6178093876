use serde::{Deserialize, Serialize};

/// One row of the append-only `submissions` table, written once per
/// generation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub name: String,
    pub email: String,
    pub resume_text: String,
    pub job_description: String,
}
