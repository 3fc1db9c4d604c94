use crate::engine::calculator::{
    build_scorecard, facility_clock, prior_composites, qualifying, sort_scorecards,
    PriorComposites,
};
use crate::model::{DateRange, Scorecard, ScoringInput};
use crate::scoring::context::ScoringContext;
use anyhow::Result;
use futures::future::try_join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::info;

/// Scores surgeons concurrently, one blocking task per surgeon.
///
/// Peer cohorts come from the shared, already-built context, so the result
/// is identical to [`crate::engine::calculate_scores`].
pub struct ScoringRunner {
    ctx: Arc<ScoringContext>,
    previous: Arc<PriorComposites>,
    period: DateRange,
    enable_diagnostics: bool,
}

impl ScoringRunner {
    /// Build the current and prior contexts up front
    pub fn new(input: &ScoringInput) -> Self {
        let clock = facility_clock(input);
        let previous = prior_composites(input.prior.as_ref(), &input.settings, &clock);
        let ctx = ScoringContext::build(&input.current, &input.settings, &clock);

        Self {
            ctx: Arc::new(ctx),
            previous: Arc::new(previous),
            period: input.current.range,
            enable_diagnostics: input.enable_diagnostics,
        }
    }

    /// Run the scoring
    pub async fn run(&self, parallelism: usize) -> Result<Vec<Scorecard>> {
        let surgeon_ids: Vec<String> = qualifying(&self.ctx)
            .map(|surgeon| surgeon.surgeon_id.clone())
            .collect();

        info!(
            "Scoring {} surgeons for {} with parallelism {}",
            surgeon_ids.len(),
            self.period,
            parallelism
        );

        let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));
        let mut handles = Vec::with_capacity(surgeon_ids.len());

        for surgeon_id in surgeon_ids {
            let permit = semaphore.clone().acquire_owned().await?;
            let ctx = Arc::clone(&self.ctx);
            let previous = Arc::clone(&self.previous);
            let enable_diagnostics = self.enable_diagnostics;

            let handle = tokio::task::spawn_blocking(move || {
                let scorecard = ctx
                    .surgeon(&surgeon_id)
                    .map(|surgeon| build_scorecard(&ctx, surgeon, &previous, enable_diagnostics));
                drop(permit);
                scorecard
            });

            handles.push(handle);
        }

        let mut scorecards: Vec<Scorecard> =
            try_join_all(handles).await?.into_iter().flatten().collect();
        sort_scorecards(&mut scorecards);

        info!("Scored {} surgeons", scorecards.len());
        Ok(scorecards)
    }
}
