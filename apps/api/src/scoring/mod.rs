// Candidate scoring engine.
// Pure and synchronous: no I/O, no shared mutable state. Any delay or persistence
// around an evaluation belongs to the caller (see intake::analysis).

pub mod catalog;
pub mod engine;
pub mod extract;
pub mod rules;

pub use catalog::SkillCatalog;
pub use engine::{ScoreResult, ScoringEngine};
pub use rules::TriageStatus;
