// Profitability: median margin per OR minute against procedure peers

use super::{score_procedure_cohorts, ProcedureMetric};
use crate::model::Pillar;
use crate::scoring::context::{ProcedureSamples, ScoringContext, SurgeonProfile};
use crate::scoring::diagnostics::DiagnosticsSink;
use crate::scoring::stats::median;

fn margins(samples: &ProcedureSamples) -> &[f64] {
    &samples.margins
}

const METRIC: ProcedureMetric = ProcedureMetric {
    pillar: Pillar::Profitability,
    higher_is_better: true,
    sample_label: "cases with profit and duration",
    samples: margins,
    summarize: median,
};

pub fn score(ctx: &ScoringContext, surgeon: &SurgeonProfile, sink: &mut dyn DiagnosticsSink) -> u32 {
    score_procedure_cohorts(ctx, surgeon, &METRIC, sink)
}
