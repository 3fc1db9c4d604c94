//! Scorecard assembly
//!
//! Groups the period's cases by surgeon, drops surgeons below the minimum
//! case volume, scores the rest and ranks them by composite.

use crate::model::{
    Case, PeriodData, ProcedureCount, Scorecard, ScoringInput, ScoringSettings, Trend,
    MIN_CASE_THRESHOLD,
};
use crate::scoring::clock::{FacilityClock, LocalClock};
use crate::scoring::composite::grade_pillars;
use crate::scoring::context::{ScoringContext, SurgeonProfile};
use crate::scoring::diagnostics::{DiagnosticsCollector, NoDiagnostics};
use crate::scoring::pillars::score_pillars;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Prior-period composites by surgeon id
pub type PriorComposites = BTreeMap<String, u32>;

/// Score every qualifying surgeon in the current period, best first
pub fn calculate_scores(input: &ScoringInput) -> Vec<Scorecard> {
    let clock = facility_clock(input);
    let previous = prior_composites(input.prior.as_ref(), &input.settings, &clock);
    let ctx = ScoringContext::build(&input.current, &input.settings, &clock);

    if ctx.surgeon_count() == 0 {
        warn!("No cases in {}, nothing to score", input.current.range);
        return Vec::new();
    }

    let mut scorecards: Vec<Scorecard> = qualifying(&ctx)
        .map(|surgeon| build_scorecard(&ctx, surgeon, &previous, input.enable_diagnostics))
        .collect();
    sort_scorecards(&mut scorecards);

    info!(
        "Scored {} of {} surgeons for {}",
        scorecards.len(),
        ctx.surgeon_count(),
        input.current.range
    );
    scorecards
}

/// The input's facility clock; an unresolvable timezone falls back to UTC
pub fn facility_clock(input: &ScoringInput) -> FacilityClock {
    FacilityClock::resolve(&input.timezone, input.utc_offset_minutes).unwrap_or_else(|e| {
        warn!("{}, scoring start times in UTC", e);
        FacilityClock::utc()
    })
}

/// Composites for the prior period, gated the same way as the current one
pub fn prior_composites(
    prior: Option<&PeriodData>,
    settings: &ScoringSettings,
    clock: &dyn LocalClock,
) -> PriorComposites {
    let Some(prior) = prior else {
        return PriorComposites::new();
    };
    let ctx = ScoringContext::build(prior, settings, clock);
    let composites: PriorComposites = qualifying(&ctx)
        .map(|surgeon| {
            let pillars = score_pillars(&ctx, surgeon, &mut NoDiagnostics);
            let (composite, _) = grade_pillars(&pillars);
            (surgeon.surgeon_id.clone(), composite)
        })
        .collect();
    debug!(
        "Prior period {}: {} qualifying surgeons",
        prior.range,
        composites.len()
    );
    composites
}

/// Surgeons at or above the case-volume gate
pub fn qualifying(ctx: &ScoringContext) -> impl Iterator<Item = &SurgeonProfile> {
    ctx.surgeons().filter(|surgeon| {
        let eligible = surgeon.case_count() >= MIN_CASE_THRESHOLD;
        if !eligible {
            debug!(
                "Skipping {}: {} cases, {} required",
                surgeon.surgeon_id,
                surgeon.case_count(),
                MIN_CASE_THRESHOLD
            );
        }
        eligible
    })
}

/// Full scorecard for one surgeon
pub fn build_scorecard(
    ctx: &ScoringContext,
    surgeon: &SurgeonProfile,
    previous: &PriorComposites,
    enable_diagnostics: bool,
) -> Scorecard {
    let (pillars, diagnostics) = if enable_diagnostics {
        let mut collector = DiagnosticsCollector::new();
        let pillars = score_pillars(ctx, surgeon, &mut collector);
        (pillars, Some(collector.finish()))
    } else {
        (score_pillars(ctx, surgeon, &mut NoDiagnostics), None)
    };

    let (composite, grade) = grade_pillars(&pillars);
    let previous_composite = previous.get(&surgeon.surgeon_id).copied();

    Scorecard {
        surgeon_id: surgeon.surgeon_id.clone(),
        surgeon_name: surgeon.surgeon_name.clone(),
        case_count: surgeon.case_count(),
        procedure_breakdown: procedure_breakdown(&surgeon.cases),
        flip_room: is_flip_room(&surgeon.cases),
        pillars,
        composite,
        grade,
        trend: Trend::between(composite, previous_composite),
        previous_composite,
        diagnostics,
    }
}

/// Case counts per procedure name, busiest first
pub fn procedure_breakdown(cases: &[Case]) -> Vec<ProcedureCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for case in cases {
        *counts.entry(case.procedure_name.as_str()).or_default() += 1;
    }
    let mut breakdown: Vec<ProcedureCount> = counts
        .into_iter()
        .map(|(name, count)| ProcedureCount {
            name: name.to_string(),
            count,
        })
        .collect();
    // stable sort keeps names ascending within equal counts
    breakdown.sort_by(|a, b| b.count.cmp(&a.count));
    breakdown
}

/// True if the surgeon worked more than one room on any single date
pub fn is_flip_room(cases: &[Case]) -> bool {
    let mut rooms: BTreeMap<NaiveDate, BTreeSet<&str>> = BTreeMap::new();
    for case in cases {
        if let Some(room) = case.or_room_id.as_deref() {
            rooms.entry(case.scheduled_date).or_default().insert(room);
        }
    }
    rooms.values().any(|day| day.len() > 1)
}

/// Composite descending; ties by name then id so output order is stable
pub fn sort_scorecards(scorecards: &mut [Scorecard]) {
    scorecards.sort_by(|a, b| {
        b.composite
            .cmp(&a.composite)
            .then_with(|| a.surgeon_name.cmp(&b.surgeon_name))
            .then_with(|| a.surgeon_id.cmp(&b.surgeon_id))
    });
}
