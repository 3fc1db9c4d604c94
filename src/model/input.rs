use super::case::{Case, CaseFinancials, CaseFlag};
use super::settings::ScoringSettings;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Case, financial and flag records for one date window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodData {
    pub range: DateRange,
    #[serde(default)]
    pub cases: Vec<Case>,
    #[serde(default)]
    pub financials: Vec<CaseFinancials>,
    #[serde(default)]
    pub flags: Vec<CaseFlag>,
}

/// Everything a scoring call needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringInput {
    /// Current scoring window
    pub current: PeriodData,
    /// Prior window used for trend, if any
    #[serde(default)]
    pub prior: Option<PeriodData>,
    #[serde(default)]
    pub settings: ScoringSettings,
    /// Facility timezone (IANA name or fixed offset)
    pub timezone: String,
    /// Offset for a timezone name that is not a known IANA zone
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
    /// Attach per-pillar cohort diagnostics to each scorecard
    #[serde(default)]
    pub enable_diagnostics: bool,
}
