use super::case::Milestone;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum cases a surgeon needs in the window to receive a scorecard
pub const MIN_CASE_THRESHOLD: usize = 15;

/// Milestone that counts as the actual start for schedule adherence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StartMilestone {
    #[default]
    PatientIn,
    Incision,
}

impl StartMilestone {
    pub fn milestone(self) -> Milestone {
        match self {
            StartMilestone::PatientIn => Milestone::PatientIn,
            StartMilestone::Incision => Milestone::Incision,
        }
    }
}

impl fmt::Display for StartMilestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.milestone())
    }
}

/// Facility-configured scoring thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSettings {
    /// Which milestone defines the actual start
    #[serde(default)]
    pub start_time_milestone: StartMilestone,

    /// Minutes late before adherence starts decaying
    #[serde(default = "default_start_grace")]
    pub start_time_grace_minutes: f64,

    /// Minutes over grace at which a case scores zero for adherence
    #[serde(default = "default_start_floor")]
    pub start_time_floor_minutes: f64,

    /// Acceptable prep/drape-to-incision wait
    #[serde(default = "default_waiting_grace")]
    pub waiting_on_surgeon_minutes: f64,

    /// Minutes over the acceptable wait at which a case scores zero
    #[serde(default = "default_waiting_floor")]
    pub waiting_on_surgeon_floor_minutes: f64,

    /// Valid cases per procedure a cohort member needs to be scored
    #[serde(default = "default_min_procedure_cases")]
    pub min_procedure_cases: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            start_time_milestone: StartMilestone::default(),
            start_time_grace_minutes: default_start_grace(),
            start_time_floor_minutes: default_start_floor(),
            waiting_on_surgeon_minutes: default_waiting_grace(),
            waiting_on_surgeon_floor_minutes: default_waiting_floor(),
            min_procedure_cases: default_min_procedure_cases(),
        }
    }
}

fn default_start_grace() -> f64 {
    3.0
}

fn default_start_floor() -> f64 {
    20.0
}

fn default_waiting_grace() -> f64 {
    3.0
}

fn default_waiting_floor() -> f64 {
    10.0
}

fn default_min_procedure_cases() -> usize {
    3
}
