// Availability: prep-to-incision readiness and attributable delay rate, 50/50

use super::finalize_score;
use crate::model::{Case, Pillar, ScoringSettings};
use crate::scoring::context::{ScoringContext, SurgeonProfile};
use crate::scoring::decay::{graduated_case_score, minutes_over_grace};
use crate::scoring::diagnostics::{DiagnosticsSink, MetricDiagnostic};
use crate::scoring::mad::{mad_score_detailed, NEUTRAL_SCORE};
use crate::scoring::stats::mean;

pub const GAP_METRIC: &str = "prep_to_incision";
pub const DELAY_METRIC: &str = "delay_rate";

/// Gap cases a surgeon needs for the readiness sub-metric
pub const MIN_GAP_CASES: usize = 3;

/// Total cases a peer needs to join the delay-rate cohort
pub const MIN_DELAY_RATE_CASES: usize = 5;

const SUB_METRIC_WEIGHT: f64 = 0.5;

/// Graduated readiness score for one case, if both milestones were recorded
pub fn gap_case_score(case: &Case, settings: &ScoringSettings) -> Option<f64> {
    let gap = case.prep_to_incision_minutes()?;
    let over = minutes_over_grace(gap, settings.waiting_on_surgeon_minutes);
    Some(graduated_case_score(
        over,
        settings.waiting_on_surgeon_floor_minutes,
    ))
}

fn gap_value(surgeon: &SurgeonProfile) -> Option<f64> {
    if surgeon.gap_scores.len() < MIN_GAP_CASES {
        return None;
    }
    Some(mean(&surgeon.gap_scores) * 100.0)
}

/// Percent of the surgeon's cases carrying a delay flag
pub fn delay_rate(surgeon: &SurgeonProfile) -> f64 {
    let total = surgeon.case_count();
    if total == 0 {
        return 0.0;
    }
    100.0 * surgeon.delayed_cases as f64 / total as f64
}

fn readiness_score(
    ctx: &ScoringContext,
    surgeon: &SurgeonProfile,
    sink: &mut dyn DiagnosticsSink,
) -> f64 {
    let Some(surgeon_value) = gap_value(surgeon) else {
        sink.record_metric(
            Pillar::Availability,
            MetricDiagnostic {
                metric: GAP_METRIC.to_string(),
                scoreable_cases: surgeon.gap_scores.len(),
                surgeon_value: None,
                peer_values: Vec::new(),
                cohort: None,
                score: NEUTRAL_SCORE,
                note: Some(format!(
                    "{} of {} required cases with prep/drape complete and incision",
                    surgeon.gap_scores.len(),
                    MIN_GAP_CASES
                )),
            },
        );
        return NEUTRAL_SCORE;
    };

    let peer_values: Vec<f64> = ctx
        .peers(&surgeon.surgeon_id)
        .filter_map(gap_value)
        .collect();
    let cohort = mad_score_detailed(surgeon_value, &peer_values, true);
    let score = cohort.score;

    sink.record_metric(
        Pillar::Availability,
        MetricDiagnostic {
            metric: GAP_METRIC.to_string(),
            scoreable_cases: surgeon.gap_scores.len(),
            surgeon_value: Some(surgeon_value),
            peer_values,
            cohort: Some(cohort),
            score,
            note: None,
        },
    );
    score
}

fn delay_score(
    ctx: &ScoringContext,
    surgeon: &SurgeonProfile,
    sink: &mut dyn DiagnosticsSink,
) -> f64 {
    let surgeon_value = delay_rate(surgeon);
    let peer_values: Vec<f64> = ctx
        .peers(&surgeon.surgeon_id)
        .filter(|peer| peer.case_count() >= MIN_DELAY_RATE_CASES)
        .map(delay_rate)
        .collect();
    let cohort = mad_score_detailed(surgeon_value, &peer_values, false);
    let score = cohort.score;

    sink.record_metric(
        Pillar::Availability,
        MetricDiagnostic {
            metric: DELAY_METRIC.to_string(),
            scoreable_cases: surgeon.case_count(),
            surgeon_value: Some(surgeon_value),
            peer_values,
            cohort: Some(cohort),
            score,
            note: None,
        },
    );
    score
}

pub fn score(ctx: &ScoringContext, surgeon: &SurgeonProfile, sink: &mut dyn DiagnosticsSink) -> u32 {
    let readiness = readiness_score(ctx, surgeon, sink);
    let delays = delay_score(ctx, surgeon, sink);
    finalize_score(readiness * SUB_METRIC_WEIGHT + delays * (1.0 - SUB_METRIC_WEIGHT))
}
