//! Pillar calculators
//!
//! Profitability and consistency score each procedure a surgeon performed
//! against the same procedure's peer cohort and blend by volume. Schedule
//! adherence and availability score individual cases first and compare the
//! surgeon-level aggregate against all peers.

pub mod adherence;
pub mod availability;
pub mod consistency;
pub mod profitability;

use super::context::{ProcedureSamples, ScoringContext, SurgeonProfile};
use super::diagnostics::{DiagnosticsSink, ProcedureDiagnostic};
use super::mad::{clamp_score, mad_score_detailed, NEUTRAL_SCORE};
use crate::model::{Pillar, PillarScores};
use tracing::debug;

/// Round and clamp a pillar score into [10, 100]
pub fn finalize_score(score: f64) -> u32 {
    clamp_score(score).round() as u32
}

/// Average of `(score, volume)` pairs weighted by volume
pub fn blend_volume_weighted(entries: &[(f64, usize)]) -> Option<f64> {
    let total: usize = entries.iter().map(|(_, volume)| volume).sum();
    if total == 0 {
        return None;
    }
    let weighted: f64 = entries
        .iter()
        .map(|(score, volume)| score * *volume as f64)
        .sum();
    Some(weighted / total as f64)
}

/// Score all four pillars for one surgeon
pub fn score_pillars(
    ctx: &ScoringContext,
    surgeon: &SurgeonProfile,
    sink: &mut dyn DiagnosticsSink,
) -> PillarScores {
    let scores = PillarScores {
        profitability: profitability::score(ctx, surgeon, sink),
        consistency: consistency::score(ctx, surgeon, sink),
        sched_adherence: adherence::score(ctx, surgeon, sink),
        availability: availability::score(ctx, surgeon, sink),
    };
    for pillar in Pillar::ALL {
        sink.record_pillar_score(pillar, scores.get(pillar));
    }
    debug!(
        "{}: profitability={} consistency={} adherence={} availability={}",
        surgeon.surgeon_id,
        scores.profitability,
        scores.consistency,
        scores.sched_adherence,
        scores.availability
    );
    scores
}

/// How a procedure-cohort pillar turns samples into one value
pub(crate) struct ProcedureMetric {
    pub pillar: Pillar,
    pub higher_is_better: bool,
    /// What a valid sample is, for skip reasons
    pub sample_label: &'static str,
    pub samples: fn(&ProcedureSamples) -> &[f64],
    pub summarize: fn(&[f64]) -> f64,
}

/// Shared calculator for procedure-cohort pillars
pub(crate) fn score_procedure_cohorts(
    ctx: &ScoringContext,
    surgeon: &SurgeonProfile,
    metric: &ProcedureMetric,
    sink: &mut dyn DiagnosticsSink,
) -> u32 {
    let min_cases = ctx.settings().min_procedure_cases;
    let mut scored: Vec<(f64, usize)> = Vec::new();

    for (procedure_id, samples) in &surgeon.procedures {
        let values = (metric.samples)(samples);

        if values.len() < min_cases {
            sink.record_procedure(
                metric.pillar,
                ProcedureDiagnostic {
                    procedure_type_id: procedure_id.clone(),
                    procedure_name: samples.procedure_name.clone(),
                    case_count: samples.case_count,
                    valid_count: values.len(),
                    surgeon_value: None,
                    peer_values: Vec::new(),
                    cohort: None,
                    score: None,
                    skip_reason: Some(format!(
                        "{} of {} required {}",
                        values.len(),
                        min_cases,
                        metric.sample_label
                    )),
                },
            );
            continue;
        }

        let surgeon_value = (metric.summarize)(values);
        let peer_values: Vec<f64> = ctx
            .peers(&surgeon.surgeon_id)
            .filter_map(|peer| peer.procedures.get(procedure_id))
            .map(metric.samples)
            .filter(|peer_samples| peer_samples.len() >= min_cases)
            .map(metric.summarize)
            .collect();

        let cohort = mad_score_detailed(surgeon_value, &peer_values, metric.higher_is_better);
        scored.push((cohort.score, samples.case_count));

        sink.record_procedure(
            metric.pillar,
            ProcedureDiagnostic {
                procedure_type_id: procedure_id.clone(),
                procedure_name: samples.procedure_name.clone(),
                case_count: samples.case_count,
                valid_count: values.len(),
                surgeon_value: Some(surgeon_value),
                peer_values,
                score: Some(cohort.score),
                cohort: Some(cohort),
                skip_reason: None,
            },
        );
    }

    finalize_score(blend_volume_weighted(&scored).unwrap_or(NEUTRAL_SCORE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_weighted_blend() {
        let blended = blend_volume_weighted(&[(80.0, 10), (20.0, 2)]).unwrap();
        assert_eq!(finalize_score(blended), 70);
    }

    #[test]
    fn test_blend_of_nothing() {
        assert_eq!(blend_volume_weighted(&[]), None);
        assert_eq!(blend_volume_weighted(&[(90.0, 0)]), None);
    }

    #[test]
    fn test_finalize_clamps() {
        assert_eq!(finalize_score(4.0), 10);
        assert_eq!(finalize_score(130.0), 100);
        assert_eq!(finalize_score(66.5), 67);
    }
}
