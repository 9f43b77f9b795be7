//! Point table and status thresholds, kept as data so each can be tested alone.

use serde::{Deserialize, Serialize};

use crate::models::candidate::CandidateInfo;
use crate::scoring::extract::ResumeFeatures;

/// What a rule checks. `{n}` in a rule's reason is filled from the same signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    MinSkillCount(usize),
    MinExperienceYears(u32),
    EducationSignal,
    AgeBetween { min: i64, max: i64 },
    AchievementSignal,
}

impl Condition {
    pub fn is_met(&self, features: &ResumeFeatures, candidate: &CandidateInfo) -> bool {
        match *self {
            Condition::MinSkillCount(min) => features.key_skills.len() >= min,
            Condition::MinExperienceYears(min) => features.experience_years >= min,
            Condition::EducationSignal => features.has_education,
            Condition::AgeBetween { min, max } => (min..=max).contains(&candidate.age),
            Condition::AchievementSignal => features.has_achievements,
        }
    }

    fn subject(&self, features: &ResumeFeatures) -> Option<String> {
        match self {
            Condition::MinSkillCount(_) => Some(features.key_skills.len().to_string()),
            Condition::MinExperienceYears(_) => Some(features.experience_years.to_string()),
            _ => None,
        }
    }
}

/// One row of the point table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRule {
    pub condition: Condition,
    pub points: u32,
    pub reason: &'static str,
}

impl ScoringRule {
    pub fn reason_for(&self, features: &ResumeFeatures) -> String {
        match self.condition.subject(features) {
            Some(n) => self.reason.replace("{n}", &n),
            None => self.reason.to_string(),
        }
    }
}

/// Default point table. Maximum attainable total is exactly 100; nothing clamps it,
/// so adding rows here can push scores past 100.
pub const DEFAULT_RULES: &[ScoringRule] = &[
    ScoringRule {
        condition: Condition::MinSkillCount(5),
        points: 30,
        reason: "Strong skill set with {n} relevant skills",
    },
    ScoringRule {
        condition: Condition::MinExperienceYears(2),
        points: 25,
        reason: "{n} years of relevant experience",
    },
    ScoringRule {
        condition: Condition::EducationSignal,
        points: 20,
        reason: "Strong educational background",
    },
    ScoringRule {
        condition: Condition::AgeBetween { min: 22, max: 35 },
        points: 15,
        reason: "Optimal age range for the position",
    },
    ScoringRule {
        condition: Condition::AchievementSignal,
        points: 10,
        reason: "Demonstrates project experience and achievements",
    },
];

pub const REASON_SEPARATOR: &str = ". ";

/// Points and reason fragments from every rule that fired, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    pub points: u32,
    pub reasons: Vec<String>,
}

impl RuleOutcome {
    pub fn reason(&self) -> String {
        self.reasons.join(REASON_SEPARATOR)
    }
}

pub fn apply_rules(
    rules: &[ScoringRule],
    features: &ResumeFeatures,
    candidate: &CandidateInfo,
) -> RuleOutcome {
    rules
        .iter()
        .filter(|rule| rule.condition.is_met(features, candidate))
        .fold(RuleOutcome::default(), |mut outcome, rule| {
            outcome.points = outcome.points.saturating_add(rule.points);
            outcome.reasons.push(rule.reason_for(features));
            outcome
        })
}

/// Engine-side triage label. Informational; it never replaces a reviewer's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageStatus {
    Shortlisted,
    Pending,
    Rejected,
}

impl TriageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageStatus::Shortlisted => "shortlisted",
            TriageStatus::Pending => "pending",
            TriageStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusThresholds {
    pub shortlist_at: u32,
    pub pending_at: u32,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            shortlist_at: 60,
            pending_at: 40,
        }
    }
}

impl StatusThresholds {
    pub fn classify(&self, score: u32) -> TriageStatus {
        match score {
            s if s >= self.shortlist_at => TriageStatus::Shortlisted,
            s if s >= self.pending_at => TriageStatus::Pending,
            _ => TriageStatus::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(age: i64) -> CandidateInfo {
        CandidateInfo {
            name: "Test Candidate".to_string(),
            age,
            gender: String::new(),
            phone_number: String::new(),
            email: "test@example.com".to_string(),
            state: String::new(),
            district: String::new(),
        }
    }

    fn skills(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("skill{i}")).collect()
    }

    #[test]
    fn test_default_table_sums_to_100() {
        let total: u32 = DEFAULT_RULES.iter().map(|r| r.points).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_skill_rule_fires_once_above_threshold() {
        for n in [5, 6, 12] {
            let features = ResumeFeatures {
                key_skills: skills(n),
                ..Default::default()
            };
            let outcome = apply_rules(&DEFAULT_RULES[..1], &features, &candidate(50));
            assert_eq!(outcome.points, 30);
            assert_eq!(
                outcome.reason(),
                format!("Strong skill set with {n} relevant skills")
            );
        }
    }

    #[test]
    fn test_skill_rule_silent_below_threshold() {
        let features = ResumeFeatures {
            key_skills: skills(4),
            ..Default::default()
        };
        let outcome = apply_rules(DEFAULT_RULES, &features, &candidate(50));
        assert_eq!(outcome, RuleOutcome::default());
    }

    #[test]
    fn test_age_bounds_inclusive() {
        let features = ResumeFeatures::default();
        assert_eq!(apply_rules(DEFAULT_RULES, &features, &candidate(22)).points, 15);
        assert_eq!(apply_rules(DEFAULT_RULES, &features, &candidate(35)).points, 15);
        assert_eq!(apply_rules(DEFAULT_RULES, &features, &candidate(21)).points, 0);
        assert_eq!(apply_rules(DEFAULT_RULES, &features, &candidate(36)).points, 0);
        assert_eq!(apply_rules(DEFAULT_RULES, &features, &candidate(-4)).points, 0);
    }

    #[test]
    fn test_experience_reason_renders_years() {
        let features = ResumeFeatures {
            experience_years: 7,
            ..Default::default()
        };
        let outcome = apply_rules(DEFAULT_RULES, &features, &candidate(0));
        assert_eq!(outcome.points, 25);
        assert_eq!(outcome.reason(), "7 years of relevant experience");
    }

    #[test]
    fn test_reasons_joined_in_table_order() {
        let features = ResumeFeatures {
            key_skills: vec![],
            experience_years: 3,
            has_education: false,
            has_achievements: true,
        };
        let outcome = apply_rules(DEFAULT_RULES, &features, &candidate(28));
        assert_eq!(outcome.points, 50);
        assert_eq!(
            outcome.reason(),
            "3 years of relevant experience. Optimal age range for the position. \
             Demonstrates project experience and achievements"
        );
    }

    #[test]
    fn test_more_conditions_never_lower_score() {
        let mut features = ResumeFeatures::default();
        let c = candidate(30);
        let mut last = apply_rules(DEFAULT_RULES, &features, &c).points;

        features.has_achievements = true;
        let next = apply_rules(DEFAULT_RULES, &features, &c).points;
        assert!(next >= last);
        last = next;

        features.has_education = true;
        let next = apply_rules(DEFAULT_RULES, &features, &c).points;
        assert!(next >= last);
        last = next;

        features.experience_years = 2;
        let next = apply_rules(DEFAULT_RULES, &features, &c).points;
        assert!(next >= last);
        last = next;

        features.key_skills = skills(5);
        let next = apply_rules(DEFAULT_RULES, &features, &c).points;
        assert!(next >= last);
        assert_eq!(next, 100);
    }

    #[test]
    fn test_status_boundaries_exact() {
        let t = StatusThresholds::default();
        assert_eq!(t.classify(0), TriageStatus::Rejected);
        assert_eq!(t.classify(39), TriageStatus::Rejected);
        assert_eq!(t.classify(40), TriageStatus::Pending);
        assert_eq!(t.classify(59), TriageStatus::Pending);
        assert_eq!(t.classify(60), TriageStatus::Shortlisted);
        assert_eq!(t.classify(100), TriageStatus::Shortlisted);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&TriageStatus::Shortlisted).unwrap();
        assert_eq!(json, "\"shortlisted\"");
    }
}
