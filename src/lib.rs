//! ORbit Score: peer-relative surgeon scorecards from OR case data

pub mod cli;
pub mod engine;
pub mod error;
pub mod model;
pub mod scoring;

pub use engine::{calculate_scores, ScoreReport, ScoringRunner};
pub use error::{ConfigError, DatasetError};
pub use model::{Grade, PillarScores, Scorecard, ScoringInput, ScoringSettings, Trend};
