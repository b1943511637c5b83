//! Year-by-year cohort projection
//!
//! Each simulated year:
//! 1. Effective score (ramping from start to target while on protocol)
//! 2. Pace of aging (with rejuvenation pull on protocol)
//! 3. Baseline hazard from the life table at the current biological age
//! 4. Hazard multiplier = frailty * progress (extra suppression while rejuvenating)
//! 5. Survival and biological age update

use crate::assumptions::{Assumptions, MortalityLookup, ReferenceLifeTable};
use crate::cohort::{SimulationParameters, MEDIAN_QUANTILE};
use crate::model::{h_to_q, q_to_h, LevModel, LevParams, LEV_NEVER};
use super::results::{SimulationResult, YearStep};
use super::state::CohortState;

/// Cohort projection engine over a baseline life table
#[derive(Debug, Clone)]
pub struct CohortEngine<L = ReferenceLifeTable> {
    model: LevModel,
    life_table: L,
}

impl CohortEngine<ReferenceLifeTable> {
    /// Create an engine from loaded assumptions
    pub fn new(assumptions: Assumptions) -> Self {
        Self {
            model: LevModel::new(assumptions.constants),
            life_table: assumptions.life_table,
        }
    }
}

impl Default for CohortEngine<ReferenceLifeTable> {
    fn default() -> Self {
        Self::new(Assumptions::default_calibration())
    }
}

impl<L: MortalityLookup> CohortEngine<L> {
    /// Create an engine over any life-table provider
    pub fn with_life_table(model: LevModel, life_table: L) -> Self {
        Self { model, life_table }
    }

    pub fn model(&self) -> &LevModel {
        &self.model
    }

    pub fn life_table(&self) -> &L {
        &self.life_table
    }

    /// Project survival, biological age and health for one individual
    pub fn simulate_cohort(&self, params: &SimulationParameters) -> SimulationResult {
        let c = self.model.constants();

        let quantile = if params.is_protocol {
            params.progress_quantile
        } else {
            MEDIAN_QUANTILE
        };

        let lev_median_year = if params.is_protocol {
            self.model
                .lev_distribution(params.target_score as f64, params.optimism, params.current_year)
                .median_year
        } else {
            LEV_NEVER
        };

        let mut result = SimulationResult::new(params, lev_median_year);
        let mut state = CohortState::initial(params, self.model.frailty_multiplier(params.start_score as f64));

        while state.age < c.max_simulated_age {
            let score = self.effective_score(params, state.year);

            let pace = if params.is_protocol {
                self.model.pace_of_aging(
                    state.year,
                    score,
                    quantile,
                    params.optimism,
                    params.horizon_year,
                    params.current_year,
                    lev_median_year,
                )
            } else {
                self.model.frailty_multiplier(score)
                    * self.model.progress_multiplier(
                        state.year,
                        score,
                        MEDIAN_QUANTILE,
                        params.optimism,
                        params.horizon_year,
                        params.current_year,
                    )
            };

            let base_q = self
                .life_table
                .death_probability(state.table_age(self.life_table.max_age()), params.sex);
            let base_hazard = q_to_h(base_q);

            let mut multiplier = self.model.frailty_multiplier(score)
                * self.model.progress_multiplier(
                    state.year,
                    score,
                    quantile,
                    params.optimism,
                    params.horizon_year,
                    params.current_year,
                );
            if params.is_protocol && pace < 0.0 {
                multiplier *= (c.rejuvenation_hazard_gain * pace).exp();
            }
            let multiplier = multiplier.clamp(c.hazard_multiplier_floor, c.hazard_multiplier_ceiling);

            let death_probability = h_to_q(base_hazard * multiplier).min(c.max_annual_death_probability);

            state.advance(death_probability, pace);

            result.push_year(YearStep {
                survival: state.survival,
                annual_survival: 1.0 - death_probability,
                bio_age: state.bio_age,
                health: self.model.bio_age_to_health(state.bio_age),
                pace,
            });
        }

        result.finalize(c, params.is_protocol);

        log::debug!(
            "Cohort age={} sex={} scores={}->{} protocol={} q={}: {} years, e={:.2}, he={:.2}, indefinite={}",
            params.start_age,
            params.sex.as_str(),
            params.start_score,
            params.target_score,
            params.is_protocol,
            quantile,
            result.len(),
            result.life_expectancy,
            result.health_expectancy,
            result.is_indefinite
        );

        result
    }

    /// Score in effect in `year`: ramps linearly from start to target over the
    /// protocol ramp, then holds at target. Off protocol it stays at start.
    pub fn effective_score(&self, params: &SimulationParameters, year: i32) -> f64 {
        let start = params.start_score as f64;
        if !params.is_protocol {
            return start;
        }

        let target = params.target_score as f64;
        let ramp = self.model.constants().protocol_ramp_years as i32;
        let elapsed = year - params.current_year;

        if elapsed < ramp {
            start + (target - start) * elapsed.max(0) as f64 / ramp as f64
        } else {
            target
        }
    }

    /// LEV arrival distribution for the individual's target score
    pub fn lev_distribution(&self, params: &SimulationParameters) -> LevParams {
        self.model
            .lev_distribution(params.target_score as f64, params.optimism, params.current_year)
    }

    /// Probability of reaching LEV at the target score.
    ///
    /// Without a reference survival curve, the curve of the same individual
    /// off protocol at that score (median progress) is used.
    pub fn lev_probability(&self, params: &SimulationParameters, ref_survival: Option<&[f64]>) -> f64 {
        let score = params.target_score as f64;

        match ref_survival {
            Some(survival) => self
                .model
                .lev_probability(score, params.optimism, params.current_year, survival),
            None => {
                let reference = SimulationParameters {
                    start_score: params.target_score,
                    is_protocol: false,
                    progress_quantile: MEDIAN_QUANTILE,
                    ..params.clone()
                };
                let survival = self.simulate_cohort(&reference).survival;
                self.model
                    .lev_probability(score, params.optimism, params.current_year, &survival)
            }
        }
    }
}
