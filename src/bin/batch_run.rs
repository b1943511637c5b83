//! Project every parameter set in a CSV file
//!
//! Outputs one summary row per cohort (life/health expectancy, LEV outlook)

use anyhow::{Context, Result};
use clap::Parser;
use lev_projection::cohort::load_parameters;
use lev_projection::{Assumptions, ScenarioRunner};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "batch_run", about = "Project a CSV of parameter sets in parallel")]
struct Args {
    /// Parameter CSV (Id,Age,Sex,StartScore,TargetScore,HorizonYear,Optimism,CurrentYear,Protocol,Quantile)
    #[arg(default_value = "data/sample_cohorts.csv")]
    input: PathBuf,

    /// Summary CSV to write
    #[arg(long, default_value = "batch_summary.csv")]
    output: PathBuf,

    /// Assumptions directory (reference_life_table.csv, model_constants.json)
    #[arg(long)]
    assumptions: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    id: u32,
    age: u32,
    sex: &'static str,
    start_score: u32,
    target_score: u32,
    optimism: i32,
    protocol: bool,
    quantile: u32,
    life_expectancy: f64,
    health_expectancy: f64,
    is_indefinite: bool,
    median_death_age: Option<u32>,
    lev_median_year: f64,
    lev_year_50pct: Option<i32>,
    lev_probability: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();

    let assumptions = match &args.assumptions {
        Some(path) => Assumptions::from_path(path)
            .with_context(|| format!("loading assumptions from {}", path.display()))?,
        None => Assumptions::default_calibration(),
    };
    let max_age = assumptions.constants.max_simulated_age;
    let runner = ScenarioRunner::with_assumptions(assumptions);

    let loaded = load_parameters(&args.input)
        .with_context(|| format!("loading parameters from {}", args.input.display()))?;
    println!("Loaded {} parameter sets in {:?}", loaded.len(), start.elapsed());

    let cohorts: Vec<_> = loaded
        .into_iter()
        .filter(|(id, params)| match params.validate(max_age) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Skipping parameter set {}: {}", id, e);
                false
            }
        })
        .collect();

    let proj_start = Instant::now();
    let engine = runner.engine();

    let rows: Vec<SummaryRow> = cohorts
        .par_iter()
        .map(|(id, params)| {
            let result = engine.simulate_cohort(params);
            let lev = engine.lev_distribution(params);
            let lev_probability = engine.lev_probability(params, Some(result.survival.as_slice()));
            let summary = result.summary();

            SummaryRow {
                id: *id,
                age: params.start_age,
                sex: params.sex.as_str(),
                start_score: params.start_score,
                target_score: params.target_score,
                optimism: params.optimism,
                protocol: params.is_protocol,
                quantile: params.progress_quantile,
                life_expectancy: summary.life_expectancy,
                health_expectancy: summary.health_expectancy,
                is_indefinite: summary.is_indefinite,
                median_death_age: summary.median_death_age,
                lev_median_year: lev.median_year,
                lev_year_50pct: lev
                    .offset_for_probability(0.5)
                    .map(|offset| params.current_year + offset as i32),
                lev_probability,
            }
        })
        .collect();

    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
