//! Axum route handlers for the Intake API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::analysis::{CancelOutcome, JobState};
use crate::intake::store::{
    self, ListFilter, NewApplication, ReviewUpdate, StatusCounts,
};
use crate::intake::validation::{validate_reviewer, validate_submission};
use crate::models::application::{ApplicationRow, ReviewStatus};
use crate::models::candidate::CandidateInfo;
use crate::scoring::ScoreResult;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub resume_text: String,
    pub candidate: CandidateInfo,
}

#[derive(Debug, Serialize)]
pub struct ScorePreviewResponse {
    pub result: ScoreResult,
    pub scorer_backend: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitApplicationRequest {
    pub user_id: Uuid,
    pub candidate: CandidateInfo,
    pub role_applied: String,
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: Option<Uuid>,
    pub status: Option<ReviewStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub status: ReviewStatus,
    pub reviewed_by: String,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisStatusResponse {
    pub application_id: Uuid,
    /// In-process job state; `None` when no job ran since this process started or
    /// its finished state was evicted. The `ai_*` fields are the durable record.
    pub job: Option<JobState>,
    pub ai_score: Option<i32>,
    pub ai_status: Option<String>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/score
///
/// Scores a resume without storing anything and without the processing delay.
pub async fn handle_score_preview(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScorePreviewResponse>, AppError> {
    let result = state
        .scorer
        .score(&request.resume_text, &request.candidate)
        .await?;

    Ok(Json(ScorePreviewResponse {
        result,
        scorer_backend: state.scorer.backend().to_string(),
    }))
}

/// POST /api/v1/applications
pub async fn handle_submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    validate_submission(&request.candidate, &request.role_applied)?;

    let application = store::insert_application(
        &state.db,
        NewApplication {
            user_id: request.user_id,
            candidate: &request.candidate,
            role_applied: request.role_applied.trim(),
            resume_text: &request.resume_text,
        },
    )
    .await?;

    if state.config.auto_analyze {
        schedule_analysis(&state, &application);
    }

    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications
pub async fn handle_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let filter = ListFilter {
        user_id: query.user_id,
        status: query.status,
    };
    Ok(Json(store::list_applications(&state.db, &filter).await?))
}

/// GET /api/v1/applications/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<StatusCounts>, AppError> {
    Ok(Json(store::count_by_status(&state.db).await?))
}

/// GET /api/v1/applications/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationRow>, AppError> {
    Ok(Json(store::get_application(&state.db, id).await?))
}

/// PATCH /api/v1/applications/:id/status
///
/// Reviewer decision. Independent of the scorer's triage label, which stays untouched.
pub async fn handle_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    validate_reviewer(&request.reviewed_by)?;

    let note = request
        .note
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| default_review_note(request.status));

    let row = store::update_review_status(
        &state.db,
        id,
        ReviewUpdate {
            status: request.status,
            reviewed_by: request.reviewed_by.trim(),
            note: &note,
        },
    )
    .await?;

    Ok(Json(row))
}

/// POST /api/v1/applications/:id/analysis
pub async fn handle_schedule_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<AnalysisStatusResponse>), AppError> {
    let application = store::get_application(&state.db, id).await?;
    schedule_analysis(&state, &application);

    Ok((
        StatusCode::ACCEPTED,
        Json(analysis_status(&state, &application)),
    ))
}

/// GET /api/v1/applications/:id/analysis
pub async fn handle_analysis_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisStatusResponse>, AppError> {
    let application = store::get_application(&state.db, id).await?;
    Ok(Json(analysis_status(&state, &application)))
}

/// DELETE /api/v1/applications/:id/analysis
///
/// Cancels an analysis still inside its processing delay.
pub async fn handle_cancel_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobState>, AppError> {
    match state.jobs.cancel(id) {
        CancelOutcome::Cancelled => Ok(Json(JobState::Cancelled)),
        CancelOutcome::NotWaiting(job) => Err(AppError::Conflict(format!(
            "Analysis for {id} can no longer be cancelled (state: {job:?})"
        ))),
        CancelOutcome::Unknown => Err(AppError::NotFound(format!(
            "No analysis scheduled for {id}"
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Queues score + persist behind the configured delay. Nothing runs until the wait ends.
fn schedule_analysis(state: &AppState, application: &ApplicationRow) -> JoinHandle<()> {
    let db = state.db.clone();
    let scorer = state.scorer.clone();
    let id = application.id;
    let resume_text = application.resume_text.clone();
    let candidate = application.candidate();

    state
        .jobs
        .schedule(id, state.config.analysis_delay(), async move {
            let result = scorer.score(&resume_text, &candidate).await?;
            store::save_analysis(&db, id, &result).await?;
            Ok::<ScoreResult, AppError>(result)
        })
}

fn analysis_status(state: &AppState, application: &ApplicationRow) -> AnalysisStatusResponse {
    AnalysisStatusResponse {
        application_id: application.id,
        job: state.jobs.state(application.id),
        ai_score: application.ai_score,
        ai_status: application.ai_status.clone(),
        analyzed_at: application.analyzed_at,
    }
}

fn default_review_note(status: ReviewStatus) -> String {
    format!("Manually {status} by admin")
}
