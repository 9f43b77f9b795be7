use serde::{Deserialize, Serialize};

/// Structured applicant fields submitted alongside a resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub phone_number: String,
    pub email: String,
    pub state: String,
    pub district: String,
}
