use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::intake::analysis::AnalysisJobs;
use crate::intake::scorer::ResumeScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable scorer. Default: RuleBasedScorer over the shared ScoringEngine.
    pub scorer: Arc<dyn ResumeScorer>,
    /// Delayed background analyses, keyed by application id.
    pub jobs: AnalysisJobs,
}
