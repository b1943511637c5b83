//! Output structures for cohort projections

use serde::{Deserialize, Serialize};

use crate::assumptions::ModelConstants;
use crate::cohort::SimulationParameters;

/// One simulated year, as recorded by the engine
#[derive(Debug, Clone, Copy)]
pub struct YearStep {
    pub survival: f64,
    pub annual_survival: f64,
    pub bio_age: f64,
    pub health: f64,
    pub pace: f64,
}

/// Flattened per-year output row for CSV export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearRow {
    pub age: u32,
    pub year: i32,
    pub survival: f64,
    pub annual_survival: f64,
    pub bio_age: f64,
    pub health: f64,
    pub alive_healthy: f64,
    pub pace: f64,
}

/// Year-by-year survival, biological age and health curves for one cohort.
///
/// All sequences are parallel; index `i` describes the end of the year that
/// starts at age `start_age + i` in calendar year `current_year + i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub start_age: u32,
    pub current_year: i32,

    /// Cumulative probability of being alive
    pub survival: Vec<f64>,

    /// One-year survival probability of each step
    pub annual_survival: Vec<f64>,

    /// Biological age after each step
    pub bio_age: Vec<f64>,

    /// Health index (0..1) after each step
    pub health: Vec<f64>,

    /// survival * health
    pub alive_healthy: Vec<f64>,

    /// Pace of aging applied in each step
    pub pace: Vec<f64>,

    pub life_expectancy: f64,
    pub health_expectancy: f64,

    /// Rejuvenation still outpacing aging with survivors left at the end
    pub is_indefinite: bool,

    /// LEV median year used for rejuvenation (sentinel when not on protocol)
    pub lev_median_year: f64,
}

impl SimulationResult {
    pub fn new(params: &SimulationParameters, lev_median_year: f64) -> Self {
        Self {
            start_age: params.start_age,
            current_year: params.current_year,
            survival: Vec::new(),
            annual_survival: Vec::new(),
            bio_age: Vec::new(),
            health: Vec::new(),
            alive_healthy: Vec::new(),
            pace: Vec::new(),
            life_expectancy: 0.0,
            health_expectancy: 0.0,
            is_indefinite: false,
            lev_median_year,
        }
    }

    /// Record one simulated year
    pub fn push_year(&mut self, step: YearStep) {
        self.survival.push(step.survival);
        self.annual_survival.push(step.annual_survival);
        self.bio_age.push(step.bio_age);
        self.health.push(step.health);
        self.alive_healthy.push(step.survival * step.health);
        self.pace.push(step.pace);
    }

    /// Compute expectancies and the indefinite flag once all years are recorded
    pub fn finalize(&mut self, constants: &ModelConstants, is_protocol: bool) {
        // Curtate sums with the usual half-year correction
        self.life_expectancy = self.survival.iter().sum::<f64>() - 0.5;

        let healthy_years: f64 = self
            .survival
            .iter()
            .zip(&self.health)
            .filter(|(_, &h)| h >= constants.healthspan_threshold)
            .map(|(s, _)| s)
            .sum();
        self.health_expectancy = healthy_years - 0.5;

        self.is_indefinite = match (self.pace.last(), self.survival.last()) {
            (Some(&pace), Some(&survival)) => {
                is_protocol
                    && pace < constants.indefinite_pace_threshold
                    && survival > constants.indefinite_survival_threshold
            }
            _ => false,
        };
    }

    pub fn len(&self) -> usize {
        self.survival.len()
    }

    pub fn is_empty(&self) -> bool {
        self.survival.is_empty()
    }

    /// Per-year rows for export
    pub fn rows(&self) -> impl Iterator<Item = YearRow> + '_ {
        (0..self.len()).map(move |i| YearRow {
            age: self.start_age + i as u32,
            year: self.current_year + i as i32,
            survival: self.survival[i],
            annual_survival: self.annual_survival[i],
            bio_age: self.bio_age[i],
            health: self.health[i],
            alive_healthy: self.alive_healthy[i],
            pace: self.pace[i],
        })
    }

    /// Chronological age at which survival first falls below `p`
    pub fn age_at_survival(&self, p: f64) -> Option<u32> {
        self.survival
            .iter()
            .position(|&s| s < p)
            .map(|i| self.start_age + i as u32 + 1)
    }

    /// Get summary statistics
    pub fn summary(&self) -> CohortSummary {
        CohortSummary {
            years_simulated: self.len(),
            life_expectancy: self.life_expectancy,
            health_expectancy: self.health_expectancy,
            is_indefinite: self.is_indefinite,
            final_survival: self.survival.last().copied().unwrap_or(1.0),
            final_bio_age: self.bio_age.last().copied().unwrap_or(self.start_age as f64),
            median_death_age: self.age_at_survival(0.5),
        }
    }
}

/// Summary statistics for a cohort projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortSummary {
    pub years_simulated: usize,
    pub life_expectancy: f64,
    pub health_expectancy: f64,
    pub is_indefinite: bool,
    pub final_survival: f64,
    pub final_bio_age: f64,
    pub median_death_age: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort::Sex;
    use approx::assert_relative_eq;

    fn step(survival: f64, health: f64, pace: f64) -> YearStep {
        YearStep {
            survival,
            annual_survival: 0.9,
            bio_age: 50.0,
            health,
            pace,
        }
    }

    #[test]
    fn test_expectancies() {
        let params = SimulationParameters::new(60, Sex::Male, 2024);
        let mut result = SimulationResult::new(&params, 2050.0);
        result.push_year(step(0.9, 0.9, 1.0));
        result.push_year(step(0.8, 0.75, 1.0));
        result.push_year(step(0.5, 0.6, 1.0));
        result.finalize(&ModelConstants::default(), false);

        assert_relative_eq!(result.life_expectancy, 2.2 - 0.5, max_relative = 1e-12);
        assert_relative_eq!(result.health_expectancy, 1.7 - 0.5, max_relative = 1e-12);
        assert_relative_eq!(result.alive_healthy[1], 0.6, max_relative = 1e-12);
        assert!(!result.is_indefinite);
    }

    #[test]
    fn test_no_healthy_years_keeps_half_year_correction() {
        let params = SimulationParameters::new(85, Sex::Male, 2024);
        let mut result = SimulationResult::new(&params, 2050.0);
        result.push_year(step(0.8, 0.3, 1.0));
        result.push_year(step(0.5, 0.2, 1.0));
        result.finalize(&ModelConstants::default(), false);

        assert_relative_eq!(result.life_expectancy, 0.8, max_relative = 1e-12);
        assert_eq!(result.health_expectancy, -0.5);
    }

    #[test]
    fn test_indefinite_flag() {
        let params = SimulationParameters::new(60, Sex::Male, 2024);
        let constants = ModelConstants::default();

        let mut result = SimulationResult::new(&params, 2040.0);
        result.push_year(step(0.4, 0.9, -0.3));
        result.finalize(&constants, true);
        assert!(result.is_indefinite);

        // Off protocol the flag never fires
        result.finalize(&constants, false);
        assert!(!result.is_indefinite);

        let mut collapsed = SimulationResult::new(&params, 2040.0);
        collapsed.push_year(step(0.005, 0.9, -0.3));
        collapsed.finalize(&constants, true);
        assert!(!collapsed.is_indefinite);
    }

    #[test]
    fn test_empty_result() {
        let params = SimulationParameters::new(60, Sex::Female, 2024);
        let mut result = SimulationResult::new(&params, 2040.0);
        result.finalize(&ModelConstants::default(), true);

        assert!(result.is_empty());
        assert_eq!(result.life_expectancy, -0.5);
        assert_eq!(result.health_expectancy, -0.5);
        assert!(!result.is_indefinite);
        assert_eq!(result.summary().median_death_age, None);
    }

    #[test]
    fn test_rows_and_median_age() {
        let params = SimulationParameters::new(60, Sex::Female, 2024);
        let mut result = SimulationResult::new(&params, 2040.0);
        result.push_year(step(0.9, 0.9, 1.0));
        result.push_year(step(0.45, 0.9, 1.0));

        let rows: Vec<YearRow> = result.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].age, 61);
        assert_eq!(rows[1].year, 2025);
        assert_eq!(result.age_at_survival(0.5), Some(62));
    }
}
