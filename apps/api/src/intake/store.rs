use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ReviewStatus};
use crate::models::candidate::CandidateInfo;
use crate::scoring::ScoreResult;

/// Fields for a new application row. Review status always starts at `pending`.
pub struct NewApplication<'a> {
    pub user_id: Uuid,
    pub candidate: &'a CandidateInfo,
    pub role_applied: &'a str,
    pub resume_text: &'a str,
}

#[derive(Debug, Default)]
pub struct ListFilter {
    pub user_id: Option<Uuid>,
    pub status: Option<ReviewStatus>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub shortlisted: i64,
    pub rejected: i64,
    pub total: i64,
}

impl StatusCounts {
    pub fn from_rows(rows: &[(String, i64)]) -> Self {
        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            match status.parse::<ReviewStatus>() {
                Ok(ReviewStatus::Pending) => counts.pending += count,
                Ok(ReviewStatus::Shortlisted) => counts.shortlisted += count,
                Ok(ReviewStatus::Rejected) => counts.rejected += count,
                Err(_) => {}
            }
            counts.total += count;
        }
        counts
    }
}

pub async fn insert_application(
    pool: &PgPool,
    new: NewApplication<'_>,
) -> Result<ApplicationRow, AppError> {
    let NewApplication {
        user_id,
        candidate,
        role_applied,
        resume_text,
    } = new;

    let row = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications
            (id, user_id, name, age, gender, phone_number, email, state, district,
             role_applied, resume_text, review_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&candidate.name)
    .bind(candidate.age)
    .bind(&candidate.gender)
    .bind(&candidate.phone_number)
    .bind(&candidate.email)
    .bind(&candidate.state)
    .bind(&candidate.district)
    .bind(role_applied)
    .bind(resume_text)
    .bind(ReviewStatus::Pending.as_str())
    .fetch_one(pool)
    .await?;

    info!("Inserted application {} for user {user_id}", row.id);
    Ok(row)
}

pub async fn get_application(pool: &PgPool, id: Uuid) -> Result<ApplicationRow, AppError> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// Newest first. Absent filters match everything.
pub async fn list_applications(
    pool: &PgPool,
    filter: &ListFilter,
) -> Result<Vec<ApplicationRow>, AppError> {
    let rows = sqlx::query_as::<_, ApplicationRow>(
        r#"
        SELECT * FROM applications
        WHERE ($1::uuid IS NULL OR user_id = $1)
          AND ($2::text IS NULL OR review_status = $2)
        ORDER BY submitted_at DESC
        "#,
    )
    .bind(filter.user_id)
    .bind(filter.status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn count_by_status(pool: &PgPool) -> Result<StatusCounts, AppError> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT review_status, COUNT(*) FROM applications GROUP BY review_status",
    )
    .fetch_all(pool)
    .await?;

    Ok(StatusCounts::from_rows(&rows))
}

/// Records a scorer result. Touches only the ai_* columns; the review status is
/// owned by reviewers.
pub async fn save_analysis(pool: &PgPool, id: Uuid, result: &ScoreResult) -> Result<(), AppError> {
    let updated = sqlx::query(
        r#"
        UPDATE applications
        SET ai_score = $1,
            ai_reason = $2,
            ai_status = $3,
            key_skills = $4,
            experience_years = $5,
            analyzed_at = NOW()
        WHERE id = $6
        "#,
    )
    .bind(i32::try_from(result.score).unwrap_or(i32::MAX))
    .bind(&result.reason)
    .bind(result.status.as_str())
    .bind(&result.key_skills)
    .bind(i32::try_from(result.experience_years).unwrap_or(i32::MAX))
    .bind(id)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Application {id} not found")));
    }

    info!("Saved analysis for application {id}: score {}", result.score);
    Ok(())
}

pub struct ReviewUpdate<'a> {
    pub status: ReviewStatus,
    pub reviewed_by: &'a str,
    pub note: &'a str,
}

pub async fn update_review_status(
    pool: &PgPool,
    id: Uuid,
    update: ReviewUpdate<'_>,
) -> Result<ApplicationRow, AppError> {
    let row = sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications
        SET review_status = $1,
            reviewed_by = $2,
            review_note = $3,
            reviewed_at = NOW()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(update.status.as_str())
    .bind(update.reviewed_by)
    .bind(update.note)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;

    info!(
        "Application {id} marked {} by {}",
        update.status, update.reviewed_by
    );
    Ok(row)
}
