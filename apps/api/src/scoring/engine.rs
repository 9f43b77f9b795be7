use serde::{Deserialize, Serialize};

use crate::models::candidate::CandidateInfo;
use crate::scoring::catalog::SkillCatalog;
use crate::scoring::extract::FeatureExtractor;
use crate::scoring::rules::{
    apply_rules, ScoringRule, StatusThresholds, TriageStatus, DEFAULT_RULES,
};

/// Output of a single evaluation. Built fresh on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u32,
    pub reason: String,
    pub key_skills: Vec<String>,
    pub experience_years: u32,
    pub status: TriageStatus,
}

impl ScoreResult {
    fn blank(status: TriageStatus) -> Self {
        Self {
            score: 0,
            reason: String::new(),
            key_skills: vec![],
            experience_years: 0,
            status,
        }
    }
}

/// Rule-based candidate scorer.
///
/// Evaluation is three phases run in order:
/// 1. extract features (skills, experience years, education and achievement signals)
/// 2. sum the points of every rule whose condition holds
/// 3. classify the total against the status thresholds
///
/// Holds only immutable data, so one instance can be shared across tasks behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    extractor: FeatureExtractor,
    rules: Vec<ScoringRule>,
    thresholds: StatusThresholds,
}

impl ScoringEngine {
    pub fn new(catalog: SkillCatalog) -> Self {
        Self::with_rules(catalog, DEFAULT_RULES.to_vec(), StatusThresholds::default())
    }

    pub fn with_rules(
        catalog: SkillCatalog,
        rules: Vec<ScoringRule>,
        thresholds: StatusThresholds,
    ) -> Self {
        Self {
            extractor: FeatureExtractor::new(catalog),
            rules,
            thresholds,
        }
    }

    pub fn catalog(&self) -> &SkillCatalog {
        self.extractor.catalog()
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    /// Scores a resume. Total for every input: empty text yields a zero, rejected
    /// result without consulting any rule. Any other text, whitespace included,
    /// goes through the full rule table.
    pub fn evaluate(&self, resume_text: &str, candidate: &CandidateInfo) -> ScoreResult {
        if resume_text.is_empty() {
            return ScoreResult::blank(self.thresholds.classify(0));
        }

        let features = self.extractor.extract(resume_text);
        let outcome = apply_rules(&self.rules, &features, candidate);

        ScoreResult {
            score: outcome.points,
            reason: outcome.reason(),
            status: self.thresholds.classify(outcome.points),
            key_skills: features.key_skills,
            experience_years: features.experience_years,
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(SkillCatalog::default())
    }
}
