//! Cohort diagnostics
//!
//! Every pillar calculator reports what it saw through a [`DiagnosticsSink`].
//! Scoring without diagnostics passes [`NoDiagnostics`], which drops every
//! entry; the code path is the same either way.

use super::mad::MadScoreBreakdown;
use crate::model::Pillar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One procedure considered by a procedure-cohort pillar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureDiagnostic {
    pub procedure_type_id: String,
    pub procedure_name: String,
    /// Surgeon's cases of this procedure in the window
    pub case_count: usize,
    /// Cases that produced a usable metric value
    pub valid_count: usize,
    /// Surgeon's raw metric for the procedure
    pub surgeon_value: Option<f64>,
    /// Peer surgeons' raw metrics for the same procedure
    pub peer_values: Vec<f64>,
    pub cohort: Option<MadScoreBreakdown>,
    pub score: Option<f64>,
    /// Why the procedure did not contribute
    pub skip_reason: Option<String>,
}

/// A surgeon-level metric considered by a case-scored pillar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDiagnostic {
    pub metric: String,
    /// Cases that could be scored for this metric
    pub scoreable_cases: usize,
    pub surgeon_value: Option<f64>,
    pub peer_values: Vec<f64>,
    pub cohort: Option<MadScoreBreakdown>,
    pub score: f64,
    /// Set when a neutral default was used
    pub note: Option<String>,
}

/// Everything recorded for one pillar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PillarDiagnostics {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub procedures: Vec<ProcedureDiagnostic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<MetricDiagnostic>,
    pub score: Option<u32>,
}

/// Diagnostics for one surgeon's scorecard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurgeonDiagnostics {
    pub pillars: BTreeMap<Pillar, PillarDiagnostics>,
}

impl SurgeonDiagnostics {
    pub fn pillar(&self, pillar: Pillar) -> Option<&PillarDiagnostics> {
        self.pillars.get(&pillar)
    }
}

/// Receives intermediate results from the pillar calculators
pub trait DiagnosticsSink {
    fn record_procedure(&mut self, _pillar: Pillar, _entry: ProcedureDiagnostic) {}

    fn record_metric(&mut self, _pillar: Pillar, _entry: MetricDiagnostic) {}

    fn record_pillar_score(&mut self, _pillar: Pillar, _score: u32) {}
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiagnostics;

impl DiagnosticsSink for NoDiagnostics {}

/// Sink that keeps everything for one surgeon
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    pillars: BTreeMap<Pillar, PillarDiagnostics>,
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> SurgeonDiagnostics {
        SurgeonDiagnostics {
            pillars: self.pillars,
        }
    }
}

impl DiagnosticsSink for DiagnosticsCollector {
    fn record_procedure(&mut self, pillar: Pillar, entry: ProcedureDiagnostic) {
        self.pillars.entry(pillar).or_default().procedures.push(entry);
    }

    fn record_metric(&mut self, pillar: Pillar, entry: MetricDiagnostic) {
        self.pillars.entry(pillar).or_default().metrics.push(entry);
    }

    fn record_pillar_score(&mut self, pillar: Pillar, score: u32) {
        self.pillars.entry(pillar).or_default().score = Some(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(score: f64) -> MetricDiagnostic {
        MetricDiagnostic {
            metric: "delay_rate".to_string(),
            scoreable_cases: 20,
            surgeon_value: Some(5.0),
            peer_values: vec![10.0, 15.0],
            cohort: None,
            score,
            note: None,
        }
    }

    #[test]
    fn test_collector_groups_by_pillar() {
        let mut collector = DiagnosticsCollector::new();
        collector.record_metric(Pillar::Availability, metric(60.0));
        collector.record_metric(Pillar::Availability, metric(40.0));
        collector.record_pillar_score(Pillar::Availability, 50);

        let diagnostics = collector.finish();
        let availability = diagnostics.pillar(Pillar::Availability).unwrap();
        assert_eq!(availability.metrics.len(), 2);
        assert_eq!(availability.score, Some(50));
        assert!(diagnostics.pillar(Pillar::Profitability).is_none());
    }

    #[test]
    fn test_no_diagnostics_discards() {
        let mut sink = NoDiagnostics;
        sink.record_metric(Pillar::Availability, metric(60.0));
        sink.record_pillar_score(Pillar::Availability, 60);
    }

    #[test]
    fn test_diagnostics_serialize_with_pillar_keys() {
        let mut collector = DiagnosticsCollector::new();
        collector.record_pillar_score(Pillar::SchedAdherence, 72);
        let json = serde_json::to_string(&collector.finish()).unwrap();
        assert!(json.contains("\"sched_adherence\""));
    }
}
