//! Scenario runner for many cohorts at once
//!
//! Builds the engine once, then projects many parameter sets: the cone of
//! uncertainty across progress quantiles, comparisons across scores, and
//! arbitrary batches. Cohorts are independent, so batches run on the rayon
//! thread pool; every result is identical to a sequential run.

use rayon::prelude::*;
use serde::Serialize;

use crate::assumptions::{Assumptions, ReferenceLifeTable};
use crate::cohort::{SimulationParameters, MEDIAN_QUANTILE, QUANTILE_KEYS};
use crate::error::Result;
use crate::model::LevParams;
use crate::projection::{CohortEngine, SimulationResult};

/// Projections of one individual at every progress quantile
#[derive(Debug, Clone, Serialize)]
pub struct UncertaintyCone {
    /// (quantile key, result), pessimistic to optimistic
    pub quantiles: Vec<(u32, SimulationResult)>,
}

impl UncertaintyCone {
    pub fn get(&self, quantile_key: u32) -> Option<&SimulationResult> {
        self.quantiles
            .iter()
            .find(|(q, _)| *q == quantile_key)
            .map(|(_, r)| r)
    }

    pub fn median(&self) -> Option<&SimulationResult> {
        self.get(MEDIAN_QUANTILE)
    }

    /// Lowest and highest survival across quantiles, per year
    pub fn survival_envelope(&self) -> Vec<(f64, f64)> {
        let len = self.quantiles.iter().map(|(_, r)| r.len()).min().unwrap_or(0);
        (0..len)
            .map(|i| {
                self.quantiles.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, r)| {
                    (lo.min(r.survival[i]), hi.max(r.survival[i]))
                })
            })
            .collect()
    }

    /// Life expectancy per quantile
    pub fn life_expectancies(&self) -> Vec<(u32, f64)> {
        self.quantiles.iter().map(|(q, r)| (*q, r.life_expectancy)).collect()
    }
}

/// Everything the presentation layer shows for one individual
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionReport {
    pub parameters: SimulationParameters,

    /// Projection with the parameters as given
    pub projection: SimulationResult,

    /// Same individual off protocol at the start score
    pub baseline: SimulationResult,

    /// LEV arrival distribution for the target score
    pub lev: LevParams,

    /// Probability of being alive when LEV arrives
    pub lev_probability: f64,
}

/// Pre-built engine for batch projections
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: CohortEngine<ReferenceLifeTable>,
}

impl ScenarioRunner {
    /// Create runner with default in-memory assumptions
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner by loading assumptions from data/
    pub fn from_files() -> Result<Self> {
        Ok(Self::with_assumptions(Assumptions::from_files()?))
    }

    /// Create runner from a specific assumptions directory
    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        Ok(Self::with_assumptions(Assumptions::from_path(path)?))
    }

    /// Create runner with pre-built assumptions
    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            engine: CohortEngine::new(assumptions),
        }
    }

    pub fn engine(&self) -> &CohortEngine<ReferenceLifeTable> {
        &self.engine
    }

    /// Run a single projection
    pub fn run(&self, params: &SimulationParameters) -> SimulationResult {
        self.engine.simulate_cohort(params)
    }

    /// Run independent projections in parallel, results in input order
    pub fn run_batch(&self, params: &[SimulationParameters]) -> Vec<SimulationResult> {
        log::info!("Running batch of {} cohorts", params.len());
        params.par_iter().map(|p| self.engine.simulate_cohort(p)).collect()
    }

    /// Project the individual at every progress quantile
    pub fn run_cone(&self, params: &SimulationParameters) -> UncertaintyCone {
        let quantiles = QUANTILE_KEYS
            .par_iter()
            .map(|&q| {
                let p = params.clone().with_quantile(q);
                (q, self.engine.simulate_cohort(&p))
            })
            .collect();

        UncertaintyCone { quantiles }
    }

    /// Same individual at different (constant) scores
    pub fn compare_scores(&self, params: &SimulationParameters, scores: &[u32]) -> Vec<(u32, SimulationResult)> {
        scores
            .par_iter()
            .map(|&score| {
                let p = params.clone().with_scores(score, score);
                (score, self.engine.simulate_cohort(&p))
            })
            .collect()
    }

    /// Projection, baseline, LEV distribution and achievement probability
    pub fn report(&self, params: &SimulationParameters) -> ProjectionReport {
        let (projection, baseline) = rayon::join(
            || self.engine.simulate_cohort(params),
            || self.engine.simulate_cohort(&params.baseline()),
        );

        let lev = self.engine.lev_distribution(params);
        let lev_probability = self.engine.lev_probability(params, Some(projection.survival.as_slice()));

        ProjectionReport {
            parameters: params.clone(),
            projection,
            baseline,
            lev,
            lev_probability,
        }
    }
}
