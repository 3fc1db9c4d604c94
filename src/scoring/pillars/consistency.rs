// Consistency: coefficient of variation of case duration, lower is better

use super::{score_procedure_cohorts, ProcedureMetric};
use crate::model::Pillar;
use crate::scoring::context::{ProcedureSamples, ScoringContext, SurgeonProfile};
use crate::scoring::diagnostics::DiagnosticsSink;
use crate::scoring::stats::coefficient_of_variation;

fn durations(samples: &ProcedureSamples) -> &[f64] {
    &samples.durations
}

const METRIC: ProcedureMetric = ProcedureMetric {
    pillar: Pillar::Consistency,
    higher_is_better: false,
    sample_label: "cases with patient-in and patient-out",
    samples: durations,
    summarize: coefficient_of_variation,
};

pub fn score(ctx: &ScoringContext, surgeon: &SurgeonProfile, sink: &mut dyn DiagnosticsSink) -> u32 {
    score_procedure_cohorts(ctx, surgeon, &METRIC, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Case, DateRange, PeriodData, ScoringSettings};
    use crate::scoring::clock::FixedOffsetClock;
    use crate::scoring::diagnostics::{DiagnosticsCollector, NoDiagnostics};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn timed_cases(surgeon: &str, procedure: &str, minutes: &[i64]) -> Vec<Case> {
        minutes
            .iter()
            .enumerate()
            .map(|(i, &length)| {
                let day = i as u32 + 1;
                let start = Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).unwrap();
                let end = start + Duration::minutes(length);
                Case {
                    case_id: format!("{}-{}-{}", surgeon, procedure, i),
                    surgeon_id: surgeon.to_string(),
                    surgeon_name: surgeon.to_string(),
                    procedure_type_id: procedure.to_string(),
                    procedure_name: procedure.to_string(),
                    or_room_id: None,
                    scheduled_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
                    start_time: None,
                    patient_in_at: Some(start.to_rfc3339()),
                    incision_at: None,
                    prep_drape_complete_at: None,
                    closing_at: None,
                    patient_out_at: Some(end.to_rfc3339()),
                }
            })
            .collect()
    }

    fn build(cases: Vec<Case>) -> ScoringContext {
        let period = PeriodData {
            range: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            ),
            cases,
            financials: vec![],
            flags: vec![],
        };
        ScoringContext::build(&period, &ScoringSettings::default(), &FixedOffsetClock::utc())
    }

    #[test]
    fn test_steadier_than_peers_scores_high() {
        let mut cases = timed_cases("x", "hip", &[100, 100, 100, 100]);
        cases.extend(timed_cases("p1", "hip", &[80, 100, 120]));
        cases.extend(timed_cases("p2", "hip", &[80, 100, 120]));
        cases.extend(timed_cases("p3", "hip", &[70, 100, 130]));
        let ctx = build(cases);

        let x = ctx.surgeon("x").unwrap();
        let mut collector = DiagnosticsCollector::new();
        let result = score(&ctx, x, &mut collector);

        // CV 0 against peers 0.2/0.2/0.3: MAD is 0, the 5% floor makes it far below
        assert_eq!(result, 100);
        let diagnostics = collector.finish();
        let entry = &diagnostics.pillar(Pillar::Consistency).unwrap().procedures[0];
        assert_eq!(entry.surgeon_value, Some(0.0));
        assert_eq!(entry.peer_values.len(), 3);
    }

    #[test]
    fn test_erratic_surgeon_scores_low() {
        let mut cases = timed_cases("x", "hip", &[30, 100, 170]);
        cases.extend(timed_cases("p1", "hip", &[95, 100, 105]));
        cases.extend(timed_cases("p2", "hip", &[90, 100, 110]));
        cases.extend(timed_cases("p3", "hip", &[85, 100, 115]));
        let ctx = build(cases);

        let x = ctx.surgeon("x").unwrap();
        assert_eq!(score(&ctx, x, &mut NoDiagnostics), 10);
    }

    #[test]
    fn test_no_qualifying_procedure_is_neutral() {
        let ctx = build(timed_cases("x", "hip", &[100, 120]));
        let x = ctx.surgeon("x").unwrap();
        assert_eq!(score(&ctx, x, &mut NoDiagnostics), 50);
    }
}
