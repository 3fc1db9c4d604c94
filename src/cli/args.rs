use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ORBIT-SCORE: surgeon scorecards from operating room case data
///
/// Scores every surgeon with enough cases in a period against their peers on
/// profitability, consistency, schedule adherence and availability.
#[derive(Parser, Debug)]
#[command(name = "orbit-score")]
#[command(version = "0.1.0")]
#[command(about = "Score surgeons against their peers from OR case data")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a period and write the report
    Score(ScoreArgs),

    /// Show the cohort breakdown behind one surgeon's scorecard
    Explain(ExplainArgs),

    /// Generate a sample scoring config file
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Path to the scoring config file (YAML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Current-period dataset (JSON)
    #[arg(long)]
    pub cases: PathBuf,

    /// Prior-period dataset (JSON), used for trend
    #[arg(long)]
    pub prior: Option<PathBuf>,

    /// Override the output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of surgeons scored concurrently
    #[arg(long, default_value = "4")]
    pub parallelism: usize,

    /// Attach cohort diagnostics to every scorecard
    #[arg(long)]
    pub diagnostics: bool,
}

#[derive(Parser, Debug)]
pub struct ExplainArgs {
    /// Path to the scoring config file (YAML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Current-period dataset (JSON)
    #[arg(long)]
    pub cases: PathBuf,

    /// Surgeon ID to explain
    #[arg(short, long)]
    pub surgeon: String,

    /// Prior-period dataset (JSON), used for trend
    #[arg(long)]
    pub prior: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output path for the config file
    #[arg(short, long, default_value = "scoring-config.yaml")]
    pub output: PathBuf,
}
