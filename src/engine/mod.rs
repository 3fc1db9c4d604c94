//! Scoring entry points and reporting
//!
//! `calculate_scores` is the sequential engine; `ScoringRunner` fans the same
//! work out over tokio. Both produce identical, ranked scorecards.

pub mod calculator;
pub mod report;
pub mod runner;

pub use calculator::calculate_scores;
pub use report::{GradeCounts, ScoreReport, ScoreSummary};
pub use runner::ScoringRunner;
