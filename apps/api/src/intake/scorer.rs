//! Resume scorer seam: the intake service talks to this trait, never to a concrete engine.
//!
//! Default: `RuleBasedScorer`, a thin wrapper over the synchronous `ScoringEngine`.
//! `AppState` holds an `Arc<dyn ResumeScorer>`, so an inference-backed scorer can be
//! swapped in at startup without touching handlers or the analysis task.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::candidate::CandidateInfo;
use crate::scoring::{ScoreResult, ScoringEngine};

#[async_trait]
pub trait ResumeScorer: Send + Sync {
    async fn score(
        &self,
        resume_text: &str,
        candidate: &CandidateInfo,
    ) -> Result<ScoreResult, AppError>;

    /// Short label reported alongside results, e.g. "rule_based".
    fn backend(&self) -> &'static str;
}

pub struct RuleBasedScorer {
    engine: Arc<ScoringEngine>,
}

impl RuleBasedScorer {
    pub fn new(engine: Arc<ScoringEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl ResumeScorer for RuleBasedScorer {
    async fn score(
        &self,
        resume_text: &str,
        candidate: &CandidateInfo,
    ) -> Result<ScoreResult, AppError> {
        Ok(self.engine.evaluate(resume_text, candidate))
    }

    fn backend(&self) -> &'static str {
        "rule_based"
    }
}
