use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flag type that marks a case as delayed
pub const DELAY_FLAG_TYPE: &str = "delay";

/// Recorded case milestones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    /// Patient wheeled into the room
    PatientIn,
    /// First incision
    Incision,
    /// Prep and drape finished, room waiting on the surgeon
    PrepDrapeComplete,
    /// Closing started
    Closing,
    /// Patient wheeled out of the room
    PatientOut,
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Milestone::PatientIn => write!(f, "patient_in"),
            Milestone::Incision => write!(f, "incision"),
            Milestone::PrepDrapeComplete => write!(f, "prep_drape_complete"),
            Milestone::Closing => write!(f, "closing"),
            Milestone::PatientOut => write!(f, "patient_out"),
        }
    }
}

/// A single surgical case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Unique case identifier
    pub case_id: String,
    /// Operating surgeon
    pub surgeon_id: String,
    /// Surgeon display name
    pub surgeon_name: String,
    /// Procedure type identifier
    pub procedure_type_id: String,
    /// Procedure display name
    pub procedure_name: String,
    /// OR room the case ran in
    #[serde(default)]
    pub or_room_id: Option<String>,
    /// Calendar date the case was scheduled for
    pub scheduled_date: NaiveDate,
    /// Scheduled start as local wall-clock time (`HH:MM`)
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub patient_in_at: Option<String>,
    #[serde(default)]
    pub incision_at: Option<String>,
    #[serde(default)]
    pub prep_drape_complete_at: Option<String>,
    #[serde(default)]
    pub closing_at: Option<String>,
    #[serde(default)]
    pub patient_out_at: Option<String>,
}

impl Case {
    /// Raw recorded value for a milestone
    pub fn milestone_raw(&self, milestone: Milestone) -> Option<&str> {
        let raw = match milestone {
            Milestone::PatientIn => &self.patient_in_at,
            Milestone::Incision => &self.incision_at,
            Milestone::PrepDrapeComplete => &self.prep_drape_complete_at,
            Milestone::Closing => &self.closing_at,
            Milestone::PatientOut => &self.patient_out_at,
        };
        raw.as_deref()
    }

    /// Parsed milestone instant. Unrecorded and unparseable values are both `None`.
    pub fn milestone(&self, milestone: Milestone) -> Option<DateTime<Utc>> {
        self.milestone_raw(milestone).and_then(parse_instant)
    }

    /// Patient-in to patient-out, in minutes
    pub fn duration_minutes(&self) -> Option<f64> {
        minutes_between(
            self.milestone(Milestone::PatientIn)?,
            self.milestone(Milestone::PatientOut)?,
        )
    }

    /// Minutes the room waited between prep/drape complete and incision.
    ///
    /// Unlike [`Case::duration_minutes`] a zero gap is a valid value.
    pub fn prep_to_incision_minutes(&self) -> Option<f64> {
        let ready = self.milestone(Milestone::PrepDrapeComplete)?;
        let incision = self.milestone(Milestone::Incision)?;
        if incision < ready {
            return None;
        }
        Some((incision - ready).num_seconds() as f64 / 60.0)
    }
}

/// Minutes from `start` to `end`; `None` unless `end` is strictly after `start`
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<f64> {
    if end <= start {
        return None;
    }
    Some((end - start).num_seconds() as f64 / 60.0)
}

/// Parse a recorded instant: RFC 3339, or the `2024-03-01 07:32:00+00` form
/// databases tend to emit.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%#z"]
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Financial outcome of a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseFinancials {
    pub case_id: String,
    /// Profit; `Some(0.0)` is a real break-even case, only `None` is missing
    #[serde(default)]
    pub profit: Option<f64>,
    #[serde(default)]
    pub reimbursement: Option<f64>,
    #[serde(default)]
    pub or_time_cost: Option<f64>,
}

/// A flag raised against a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseFlag {
    pub case_id: String,
    /// Flag category, e.g. "delay" or "threshold"
    pub flag_type: String,
    #[serde(default)]
    pub severity: Option<String>,
    /// Name of the attributed delay type, if any
    #[serde(default)]
    pub delay_type_name: Option<String>,
}

impl CaseFlag {
    pub fn is_delay(&self) -> bool {
        self.flag_type == DELAY_FLAG_TYPE
    }
}
