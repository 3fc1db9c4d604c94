//! Records consumed and produced by a scoring call

mod case;
mod input;
mod scorecard;
mod settings;

pub use case::{
    minutes_between, parse_instant, Case, CaseFinancials, CaseFlag, Milestone, DELAY_FLAG_TYPE,
};
pub use input::{DateRange, PeriodData, ScoringInput};
pub use scorecard::{Grade, Pillar, PillarScores, ProcedureCount, Scorecard, Trend};
pub use settings::{ScoringSettings, StartMilestone, MIN_CASE_THRESHOLD};
