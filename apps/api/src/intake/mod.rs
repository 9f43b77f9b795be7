// Resume intake: submission, delayed background scoring, and reviewer decisions.
// Scoring goes through the ResumeScorer trait; the engine itself lives in crate::scoring.

pub mod analysis;
pub mod handlers;
pub mod scorer;
pub mod store;
pub mod validation;
