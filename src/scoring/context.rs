//! Per-call grouping of case records
//!
//! Cases are grouped by surgeon and, within a surgeon, by procedure type once
//! per scoring call. Every per-case metric a pillar needs (margin per OR
//! minute, duration, adherence and prep-gap case scores, delay flags) is
//! derived here, so peer cohorts are read from the same materialized data
//! for every surgeon.

use super::clock::LocalClock;
use super::pillars::{adherence, availability};
use crate::model::{Case, CaseFinancials, PeriodData, ScoringSettings};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// A surgeon's metric samples for one procedure type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcedureSamples {
    pub procedure_name: String,
    /// All of the surgeon's cases of this procedure
    pub case_count: usize,
    /// Profit per OR minute, for cases with profit and a positive duration
    pub margins: Vec<f64>,
    /// Patient-in to patient-out minutes, where defined
    pub durations: Vec<f64>,
}

/// Everything derived for one surgeon
#[derive(Debug, Clone, PartialEq)]
pub struct SurgeonProfile {
    pub surgeon_id: String,
    pub surgeon_name: String,
    pub cases: Vec<Case>,
    /// Samples keyed by procedure type id
    pub procedures: BTreeMap<String, ProcedureSamples>,
    /// Graduated start-time score of every scoreable case
    pub adherence_scores: Vec<f64>,
    /// Graduated prep-to-incision score of every scoreable case
    pub gap_scores: Vec<f64>,
    /// Cases carrying at least one delay flag
    pub delayed_cases: usize,
}

impl SurgeonProfile {
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }
}

/// Grouped, pre-derived view of one period
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringContext {
    settings: ScoringSettings,
    surgeons: BTreeMap<String, SurgeonProfile>,
}

impl ScoringContext {
    pub fn build(period: &PeriodData, settings: &ScoringSettings, clock: &dyn LocalClock) -> Self {
        let mut financials: HashMap<&str, &CaseFinancials> = HashMap::new();
        for record in &period.financials {
            financials.entry(record.case_id.as_str()).or_insert(record);
        }
        let delayed: HashSet<&str> = period
            .flags
            .iter()
            .filter(|flag| flag.is_delay())
            .map(|flag| flag.case_id.as_str())
            .collect();

        let mut surgeons: BTreeMap<String, SurgeonProfile> = BTreeMap::new();
        let mut out_of_range = 0usize;

        for case in &period.cases {
            if !period.range.contains(case.scheduled_date) {
                out_of_range += 1;
                continue;
            }

            let profile = surgeons
                .entry(case.surgeon_id.clone())
                .or_insert_with(|| SurgeonProfile {
                    surgeon_id: case.surgeon_id.clone(),
                    surgeon_name: case.surgeon_name.clone(),
                    cases: Vec::new(),
                    procedures: BTreeMap::new(),
                    adherence_scores: Vec::new(),
                    gap_scores: Vec::new(),
                    delayed_cases: 0,
                });

            let samples = profile
                .procedures
                .entry(case.procedure_type_id.clone())
                .or_insert_with(|| ProcedureSamples {
                    procedure_name: case.procedure_name.clone(),
                    ..Default::default()
                });
            samples.case_count += 1;

            if let Some(duration) = case.duration_minutes() {
                samples.durations.push(duration);
                let profit = financials
                    .get(case.case_id.as_str())
                    .and_then(|record| record.profit);
                if let Some(profit) = profit {
                    samples.margins.push(profit / duration);
                }
            }

            if let Some(score) = adherence::case_score(case, settings, clock) {
                profile.adherence_scores.push(score);
            }
            if let Some(score) = availability::gap_case_score(case, settings) {
                profile.gap_scores.push(score);
            }
            if delayed.contains(case.case_id.as_str()) {
                profile.delayed_cases += 1;
            }

            profile.cases.push(case.clone());
        }

        if out_of_range > 0 {
            debug!(
                "Dropped {} cases outside of {}",
                out_of_range, period.range
            );
        }

        Self {
            settings: settings.clone(),
            surgeons,
        }
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    pub fn surgeon(&self, surgeon_id: &str) -> Option<&SurgeonProfile> {
        self.surgeons.get(surgeon_id)
    }

    pub fn surgeons(&self) -> impl Iterator<Item = &SurgeonProfile> {
        self.surgeons.values()
    }

    /// Every surgeon except `surgeon_id`, in id order
    pub fn peers<'a>(&'a self, surgeon_id: &'a str) -> impl Iterator<Item = &'a SurgeonProfile> {
        self.surgeons
            .values()
            .filter(move |profile| profile.surgeon_id != surgeon_id)
    }

    pub fn surgeon_count(&self) -> usize {
        self.surgeons.len()
    }
}
