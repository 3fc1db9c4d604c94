pub mod args;
pub mod config;
pub mod dataset;

pub use args::{Args, Command, ExplainArgs, InitArgs, ScoreArgs};
pub use config::ScoringConfig;
pub use dataset::{load_dataset, Dataset};
