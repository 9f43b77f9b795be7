use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::candidate::CandidateInfo;

/// Reviewer-owned decision on an application. Set by admins, never by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Shortlisted,
    Rejected,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 3] = [
        ReviewStatus::Pending,
        ReviewStatus::Shortlisted,
        ReviewStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Shortlisted => "shortlisted",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReviewStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown review status '{s}'"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub phone_number: String,
    pub email: String,
    pub state: String,
    pub district: String,
    pub role_applied: String,
    pub resume_text: String,
    pub review_status: String,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,
    pub review_note: Option<String>,
    pub ai_score: Option<i32>,
    pub ai_reason: Option<String>,
    pub ai_status: Option<String>,
    pub key_skills: Option<Vec<String>>,
    pub experience_years: Option<i32>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

impl ApplicationRow {
    pub fn candidate(&self) -> CandidateInfo {
        CandidateInfo {
            name: self.name.clone(),
            age: self.age,
            gender: self.gender.clone(),
            phone_number: self.phone_number.clone(),
            email: self.email.clone(),
            state: self.state.clone(),
            district: self.district.clone(),
        }
    }
}
