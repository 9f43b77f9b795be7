/// Skills recognised out of the box, in reporting order.
pub const DEFAULT_SKILLS: &[&str] = &[
    "javascript",
    "python",
    "java",
    "react",
    "node.js",
    "sql",
    "html",
    "css",
    "typescript",
    "angular",
    "vue",
    "mongodb",
    "postgresql",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "agile",
    "scrum",
    "machine learning",
    "data analysis",
];

/// Ordered, immutable set of skill keywords matched against resume text.
///
/// Keywords are stored lower-cased and deduplicated (first occurrence wins), so a
/// match list produced from the catalog can never contain the same skill twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCatalog {
    skills: Vec<String>,
}

impl SkillCatalog {
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for skill in skills {
            let skill = skill.as_ref().trim().to_lowercase();
            if skill.is_empty() || ordered.contains(&skill) {
                continue;
            }
            ordered.push(skill);
        }
        Self { skills: ordered }
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Returns the catalog skills contained in `text_lower`, in catalog order.
    /// Plain substring containment: "java" is found inside "javascript".
    pub fn matches_in(&self, text_lower: &str) -> Vec<String> {
        self.skills
            .iter()
            .filter(|skill| text_lower.contains(skill.as_str()))
            .cloned()
            .collect()
    }
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_keeps_declared_order() {
        let catalog = SkillCatalog::default();
        assert_eq!(catalog.len(), DEFAULT_SKILLS.len());
        assert_eq!(catalog.skills()[0], "javascript");
        assert_eq!(catalog.skills()[catalog.len() - 1], "data analysis");
    }

    #[test]
    fn test_new_lowercases_and_dedups() {
        let catalog = SkillCatalog::new(["Rust", "rust", " Go ", "", "SQL"]);
        assert_eq!(catalog.skills(), &["rust", "go", "sql"]);
    }

    #[test]
    fn test_matches_follow_catalog_order_not_text_order() {
        let catalog = SkillCatalog::default();
        let found = catalog.matches_in("docker first, then python, then react");
        assert_eq!(found, vec!["python", "react", "docker"]);
    }

    #[test]
    fn test_substring_match_has_no_word_boundary() {
        let catalog = SkillCatalog::default();
        let found = catalog.matches_in("javascript only");
        assert_eq!(found, vec!["javascript", "java"]);
    }

    #[test]
    fn test_empty_catalog_matches_nothing() {
        let catalog = SkillCatalog::new(Vec::<String>::new());
        assert!(catalog.is_empty());
        assert!(catalog.matches_in("python react sql").is_empty());
    }
}
