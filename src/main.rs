//! LEV Projection CLI
//!
//! Projects one individual and prints survival, biological age and health
//! milestones, the LEV outlook, and optionally the full yearly table.

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use lev_projection::{
    Assumptions, ModelConstants, ReferenceLifeTable, ScenarioRunner, Sex, SimulationParameters,
};
use lev_projection::model::LEV_NEVER;
use std::path::PathBuf;

/// Calendar year for the "LEV arrived by" line of the outlook
const LEV_CHECKPOINT_YEAR: i32 = 2050;

#[derive(Debug, Parser)]
#[command(name = "lev_projection", version, about = "Project survival and healthspan under accelerating medical progress")]
struct Args {
    /// Chronological age today
    #[arg(long, default_value_t = 40)]
    age: u32,

    /// male or female
    #[arg(long, default_value = "male")]
    sex: Sex,

    /// Longevity score today (1-99)
    #[arg(long, default_value_t = 50)]
    start_score: u32,

    /// Longevity score reached on protocol (defaults to the start score)
    #[arg(long)]
    target_score: Option<u32>,

    /// Last calendar year in which medical progress accrues (defaults to 100 years out)
    #[arg(long)]
    horizon: Option<i32>,

    /// Medical-progress speed in 10% steps, -10 (none) to 5 (+50%)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    optimism: i32,

    /// First projected calendar year (defaults to this year)
    #[arg(long)]
    current_year: Option<i32>,

    /// Follow the protocol: ramp to the target score and enable rejuvenation
    #[arg(long)]
    protocol: bool,

    /// Progress quantile: 5, 25, 50, 75 or 95
    #[arg(long, default_value_t = 50)]
    quantile: u32,

    /// Also project every progress quantile
    #[arg(long)]
    cone: bool,

    /// Print the full report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write all yearly rows to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Model constants JSON overriding the built-in calibration
    #[arg(long)]
    constants: Option<PathBuf>,

    /// Life table CSV (age,male,female) overriding the built-in table
    #[arg(long)]
    life_table: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut assumptions = Assumptions::default_calibration();
    if let Some(path) = &args.constants {
        assumptions.constants = ModelConstants::from_json_path(path)
            .with_context(|| format!("loading constants from {}", path.display()))?;
    }
    if let Some(path) = &args.life_table {
        assumptions.life_table = ReferenceLifeTable::from_csv_path(path)
            .with_context(|| format!("loading life table from {}", path.display()))?;
    }
    let max_age = assumptions.constants.max_simulated_age;

    let current_year = args.current_year.unwrap_or_else(|| chrono::Local::now().year());
    let params = SimulationParameters::new(args.age, args.sex, current_year)
        .with_scores(args.start_score, args.target_score.unwrap_or(args.start_score))
        .with_horizon(args.horizon.unwrap_or(current_year + 100))
        .with_optimism(args.optimism)
        .with_protocol(args.protocol)
        .with_quantile(args.quantile);
    params.validate(max_age).context("invalid projection inputs")?;

    let runner = ScenarioRunner::with_assumptions(assumptions);
    let report = runner.report(&params);
    let cone = args.cone.then(|| runner.run_cone(&params));

    if let Some(path) = &args.output {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        for row in report.projection.rows() {
            writer.serialize(row)?;
        }
        writer.flush()?;
        log::info!("Wrote {} rows to {}", report.projection.len(), path.display());
    }

    if args.json {
        let text = match &cone {
            Some(cone) => serde_json::to_string_pretty(&serde_json::json!({ "report": report, "cone": cone }))?,
            None => serde_json::to_string_pretty(&report)?,
        };
        println!("{}", text);
        return Ok(());
    }

    println!("LEV Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    println!("Individual:");
    println!("  Age: {} ({})", params.start_age, params.sex.as_str());
    println!("  Score: {} -> {}", params.start_score, params.target_score);
    println!("  Optimism: {:+}%", params.optimism * 10);
    println!("  Protocol: {}", if params.is_protocol { "yes" } else { "no" });
    println!("  Progress quantile: {}", params.progress_quantile);
    println!();

    println!("{:>5} {:>6} {:>10} {:>8} {:>7} {:>7}", "Age", "Year", "Survival", "BioAge", "Health", "Pace");
    println!("{}", "-".repeat(48));
    for row in report.projection.rows().step_by(10) {
        println!(
            "{:>5} {:>6} {:>10.6} {:>8.2} {:>7.3} {:>7.3}",
            row.age, row.year, row.survival, row.bio_age, row.health, row.pace
        );
    }

    let summary = report.projection.summary();
    let baseline = report.baseline.summary();
    println!("\nSummary:");
    println!("  Life expectancy: {:.1} years (baseline {:.1})", summary.life_expectancy, baseline.life_expectancy);
    println!("  Health expectancy: {:.1} years (baseline {:.1})", summary.health_expectancy, baseline.health_expectancy);
    match summary.median_death_age {
        Some(age) => println!("  Median age at death: {}", age),
        None => println!("  Median age at death: beyond {}", max_age),
    }
    if summary.is_indefinite {
        println!("  Rejuvenation is outpacing aging at the end of the projection");
    }

    println!("\nLEV outlook:");
    if report.lev.median_year >= LEV_NEVER {
        println!("  Median arrival: never (medical progress disabled)");
    } else {
        println!("  Median arrival: {:.0}", report.lev.median_year);
        for p in [0.5, 0.9] {
            if let Some(offset) = report.lev.offset_for_probability(p) {
                println!("  {:.0}% likely by: {}", p * 100.0, params.current_year + offset as i32);
            }
        }
        let offset = (LEV_CHECKPOINT_YEAR - params.current_year).max(0) as usize;
        println!(
            "  Arrived by {}: {:.1}%",
            params.current_year + offset as i32,
            report.lev.cumulative_by(offset) * 100.0
        );
    }
    println!("  Probability of reaching LEV: {:.1}%", report.lev_probability * 100.0);

    if let Some(cone) = &cone {
        println!("\nCone of uncertainty (life expectancy by progress quantile):");
        for (q, e) in cone.life_expectancies() {
            println!("  q{:>2}: {:.1}", q, e);
        }

        println!("\nSurvival envelope across quantiles:");
        println!("{:>5} {:>10} {:>10}", "Age", "Low", "High");
        for (i, (lo, hi)) in cone.survival_envelope().into_iter().enumerate().step_by(10) {
            println!("{:>5} {:>10.6} {:>10.6}", params.start_age as usize + i, lo, hi);
        }
    }

    Ok(())
}
