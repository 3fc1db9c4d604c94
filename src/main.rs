use anyhow::{Context, Result};
use clap::Parser;
use orbit_score::cli::{self, load_dataset, Args, Command, ScoringConfig};
use orbit_score::engine::{ScoreReport, ScoringRunner};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let _subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match args.command {
        Command::Score(score_args) => {
            run_scoring(score_args).await?;
        }
        Command::Explain(explain_args) => {
            explain_surgeon(explain_args).await?;
        }
        Command::Init(init_args) => {
            generate_sample_config(init_args)?;
        }
    }

    Ok(())
}

/// Load config and datasets, then score the period
async fn score_period(
    config: &ScoringConfig,
    cases: &std::path::Path,
    prior: Option<&std::path::Path>,
    parallelism: usize,
) -> Result<ScoreReport> {
    config
        .validate()
        .context(format!("Invalid scoring config: {}", config.name))?;
    let current = load_dataset(cases)?;
    let prior = prior.map(load_dataset).transpose()?;
    let prior_period = prior.as_ref().map(|_| config.prior_range());
    let input = config.scoring_input(current, prior);

    let runner = ScoringRunner::new(&input);
    let scorecards = runner.run(parallelism).await?;

    Ok(ScoreReport::new(
        &config.name,
        config.period,
        prior_period,
        scorecards,
    ))
}

async fn run_scoring(args: cli::ScoreArgs) -> Result<()> {
    info!("Loading scoring config from {:?}", args.config);

    let mut config = ScoringConfig::load(&args.config)?;
    if args.diagnostics {
        config.enable_diagnostics = true;
    }

    let report = score_period(
        &config,
        &args.cases,
        args.prior.as_deref(),
        args.parallelism,
    )
    .await?;

    print_results(&report);

    // Save results
    let output_dir = args
        .output
        .unwrap_or_else(|| std::path::PathBuf::from(&report.report_id));
    std::fs::create_dir_all(&output_dir)
        .context(format!("Failed to create output directory: {:?}", output_dir))?;
    report.save_json(&output_dir.join(format!("{}.json", report.report_id)))?;
    std::fs::write(
        output_dir.join(format!("{}_report.md", report.report_id)),
        report.generate_report(),
    )?;

    println!("\nResults saved to: {:?}", output_dir);

    Ok(())
}

async fn explain_surgeon(args: cli::ExplainArgs) -> Result<()> {
    let mut config = ScoringConfig::load(&args.config)?;
    config.enable_diagnostics = true;

    let report = score_period(&config, &args.cases, args.prior.as_deref(), 1).await?;

    match report.explain(&args.surgeon) {
        Some(text) => println!("{}", text),
        None => println!(
            "No scorecard for {} (fewer than {} cases in {}?)",
            args.surgeon,
            orbit_score::model::MIN_CASE_THRESHOLD,
            report.period
        ),
    }

    Ok(())
}

fn print_results(report: &ScoreReport) {
    println!("\n{}", "=".repeat(60));
    println!("SCORING COMPLETE");
    println!("{}", "=".repeat(60));
    println!("\nSummary:");
    println!("  Period: {}", report.period);
    println!("  Surgeons scored: {}", report.summary.surgeons_scored);
    println!("  Cases scored: {}", report.summary.cases_scored);
    println!(
        "  Average composite: {:.1}",
        report.summary.average_composite
    );

    println!("\nRankings:");
    for (i, card) in report.scorecards.iter().enumerate() {
        println!(
            "  #{} {} - {} ({}) {} [P {} / C {} / S {} / A {}] {} cases",
            i + 1,
            card.surgeon_name,
            card.composite,
            card.grade,
            card.trend,
            card.pillars.profitability,
            card.pillars.consistency,
            card.pillars.sched_adherence,
            card.pillars.availability,
            card.case_count
        );
    }
}

fn generate_sample_config(args: cli::InitArgs) -> Result<()> {
    let config = ScoringConfig::sample();

    config.save(&args.output)?;
    println!("Generated sample config at: {:?}", args.output);

    Ok(())
}
