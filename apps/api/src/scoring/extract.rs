//! Feature extraction: turns raw resume text into the signals the rule table reads.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::scoring::catalog::SkillCatalog;

/// `<n> year|years|yr|yrs [of] experience|exp`, spacing optional, any case.
const EXPERIENCE_PATTERN: &str = r"(?i)([0-9]+)\s*(?:years?|yrs?)\s*(?:of\s*)?(?:experience|exp)";

const EDUCATION_MARKERS: &[&str] = &["bachelor", "master"];
const ACHIEVEMENT_MARKERS: &[&str] = &["project", "achievement"];

/// Signals extracted from a single resume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeFeatures {
    pub key_skills: Vec<String>,
    pub experience_years: u32,
    pub has_education: bool,
    pub has_achievements: bool,
}

#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    catalog: SkillCatalog,
    experience_regex: Regex,
}

impl FeatureExtractor {
    pub fn new(catalog: SkillCatalog) -> Self {
        let experience_regex =
            Regex::new(EXPERIENCE_PATTERN).expect("Invalid experience regex");
        Self {
            catalog,
            experience_regex,
        }
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    pub fn extract(&self, resume_text: &str) -> ResumeFeatures {
        let text_lower = resume_text.to_lowercase();

        ResumeFeatures {
            key_skills: self.catalog.matches_in(&text_lower),
            experience_years: self.experience_years(resume_text),
            has_education: contains_any(&text_lower, EDUCATION_MARKERS),
            has_achievements: contains_any(&text_lower, ACHIEVEMENT_MARKERS),
        }
    }

    /// First experience mention only; later mentions are never summed.
    /// Numbers beyond `u32::MAX` saturate rather than fail.
    pub fn experience_years(&self, resume_text: &str) -> u32 {
        self.experience_regex
            .captures(resume_text)
            .and_then(|caps| caps.get(1))
            .map(|years| years.as_str().parse::<u32>().unwrap_or(u32::MAX))
            .unwrap_or(0)
    }
}

fn contains_any(text_lower: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text_lower.contains(m))
}
