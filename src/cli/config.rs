use super::dataset::Dataset;
use crate::error::ConfigError;
use crate::model::{DateRange, ScoringInput, ScoringSettings, StartMilestone};
use crate::scoring::clock::FacilityClock;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a scoring run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Name of this run, shown in reports
    pub name: String,

    /// Description of the run
    #[serde(default)]
    pub description: String,

    /// Facility timezone: an IANA name, a UTC alias or a fixed offset such as `-05:00`
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Offset to use when `timezone` is not a known zone name or offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,

    /// Window to score
    pub period: DateRange,

    /// Window to compare against for trend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_period: Option<DateRange>,

    /// Facility scoring thresholds
    #[serde(default)]
    pub settings: ScoringSettings,

    /// Attach cohort diagnostics to every scorecard
    #[serde(default)]
    pub enable_diagnostics: bool,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl ScoringConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .context(format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: ScoringConfig =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .context(format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Resolve the facility clock
    pub fn clock(&self) -> Result<FacilityClock, ConfigError> {
        FacilityClock::resolve(&self.timezone, self.utc_offset_minutes)
    }

    /// Check everything the engine takes on trust
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_period(&self.period)?;
        if let Some(prior) = &self.prior_period {
            check_period(prior)?;
        }

        let minutes = [
            ("start_time_grace_minutes", self.settings.start_time_grace_minutes),
            ("start_time_floor_minutes", self.settings.start_time_floor_minutes),
            ("waiting_on_surgeon_minutes", self.settings.waiting_on_surgeon_minutes),
            (
                "waiting_on_surgeon_floor_minutes",
                self.settings.waiting_on_surgeon_floor_minutes,
            ),
        ];
        for (name, value) in minutes {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSetting {
                    name,
                    reason: format!("expected a non-negative number of minutes, got {}", value),
                });
            }
        }

        if self.settings.min_procedure_cases == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "min_procedure_cases",
                reason: "must be at least 1".to_string(),
            });
        }

        self.clock()?;
        Ok(())
    }

    /// Prior window: the configured one, or the equally long window ending
    /// the day before `period` starts
    pub fn prior_range(&self) -> DateRange {
        self.prior_period.unwrap_or_else(|| {
            let end = self.period.start - Duration::days(1);
            let length = self.period.end - self.period.start;
            DateRange::new(end - length, end)
        })
    }

    /// Assemble the engine input from loaded datasets
    pub fn scoring_input(&self, current: Dataset, prior: Option<Dataset>) -> ScoringInput {
        ScoringInput {
            current: current.into_period(self.period),
            prior: prior.map(|dataset| dataset.into_period(self.prior_range())),
            settings: self.settings.clone(),
            timezone: self.timezone.clone(),
            utc_offset_minutes: self.utc_offset_minutes,
            enable_diagnostics: self.enable_diagnostics,
        }
    }

    /// Generate a sample configuration
    pub fn sample() -> Self {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
        Self {
            name: "Q1 Surgeon Scorecards".to_string(),
            description: "Quarterly peer-relative scorecards".to_string(),
            timezone: "-05:00".to_string(),
            utc_offset_minutes: None,
            period: DateRange::new(date(2024, 1, 1), date(2024, 3, 31)),
            prior_period: Some(DateRange::new(date(2023, 10, 1), date(2023, 12, 31))),
            settings: ScoringSettings {
                start_time_milestone: StartMilestone::PatientIn,
                ..Default::default()
            },
            enable_diagnostics: false,
        }
    }
}

fn check_period(range: &DateRange) -> Result<(), ConfigError> {
    if range.start > range.end {
        return Err(ConfigError::InvalidPeriod {
            start: range.start.to_string(),
            end: range.end.to_string(),
        });
    }
    Ok(())
}
