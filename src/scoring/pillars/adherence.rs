// Schedule adherence: graduated on-time start score per case, then the
// surgeon's mean against every other surgeon's mean.

use super::finalize_score;
use crate::model::{Case, Pillar, ScoringSettings};
use crate::scoring::clock::{parse_clock_time, LocalClock};
use crate::scoring::context::{ScoringContext, SurgeonProfile};
use crate::scoring::decay::{graduated_case_score, minutes_over_grace};
use crate::scoring::diagnostics::{DiagnosticsSink, MetricDiagnostic};
use crate::scoring::mad::{mad_score_detailed, NEUTRAL_SCORE};
use crate::scoring::stats::mean;

pub const METRIC_NAME: &str = "on_time_start";

/// Graduated start score for one case, if it has a scheduled start and the
/// configured start milestone
pub fn case_score(case: &Case, settings: &ScoringSettings, clock: &dyn LocalClock) -> Option<f64> {
    let scheduled = parse_clock_time(case.start_time.as_deref()?)?;
    let actual = case.milestone(settings.start_time_milestone.milestone())?;

    let delta = clock.minutes_since_midnight(actual) as f64 - scheduled as f64;
    let over = minutes_over_grace(delta, settings.start_time_grace_minutes);
    Some(graduated_case_score(over, settings.start_time_floor_minutes))
}

/// Mean case score on a 0–100 scale
fn raw_value(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        None
    } else {
        Some(mean(scores) * 100.0)
    }
}

pub fn score(ctx: &ScoringContext, surgeon: &SurgeonProfile, sink: &mut dyn DiagnosticsSink) -> u32 {
    let Some(surgeon_value) = raw_value(&surgeon.adherence_scores) else {
        sink.record_metric(
            Pillar::SchedAdherence,
            MetricDiagnostic {
                metric: METRIC_NAME.to_string(),
                scoreable_cases: 0,
                surgeon_value: None,
                peer_values: Vec::new(),
                cohort: None,
                score: NEUTRAL_SCORE,
                note: Some("no cases with a scheduled start and start milestone".to_string()),
            },
        );
        return finalize_score(NEUTRAL_SCORE);
    };

    let peer_values: Vec<f64> = ctx
        .peers(&surgeon.surgeon_id)
        .filter_map(|peer| raw_value(&peer.adherence_scores))
        .collect();
    let cohort = mad_score_detailed(surgeon_value, &peer_values, true);
    let result = finalize_score(cohort.score);

    sink.record_metric(
        Pillar::SchedAdherence,
        MetricDiagnostic {
            metric: METRIC_NAME.to_string(),
            scoreable_cases: surgeon.adherence_scores.len(),
            surgeon_value: Some(surgeon_value),
            peer_values,
            score: cohort.score,
            cohort: Some(cohort),
            note: None,
        },
    );
    result
}
