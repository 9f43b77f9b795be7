//! Boundary checks for incoming requests. The scoring engine accepts anything
//! well-typed; shape rules live here.

use crate::errors::AppError;
use crate::models::candidate::CandidateInfo;

/// Problems found in a submission, one message per field.
pub fn submission_problems(candidate: &CandidateInfo, role_applied: &str) -> Vec<String> {
    let mut problems = Vec::new();

    if candidate.name.trim().is_empty() {
        problems.push("name cannot be empty".to_string());
    }
    if candidate.age < 0 {
        problems.push("age cannot be negative".to_string());
    }
    if candidate.email.trim().is_empty() {
        problems.push("email cannot be empty".to_string());
    } else if !candidate.email.contains('@') {
        problems.push(format!("email '{}' is not a valid address", candidate.email));
    }
    if role_applied.trim().is_empty() {
        problems.push("role_applied cannot be empty".to_string());
    }

    problems
}

pub fn validate_submission(candidate: &CandidateInfo, role_applied: &str) -> Result<(), AppError> {
    let problems = submission_problems(candidate, role_applied);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(problems.join("; ")))
    }
}

pub fn validate_reviewer(reviewed_by: &str) -> Result<(), AppError> {
    if reviewed_by.trim().is_empty() {
        return Err(AppError::Validation("reviewed_by cannot be empty".to_string()));
    }
    Ok(())
}
