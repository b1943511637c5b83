//! Running state of a cohort during projection

use crate::cohort::SimulationParameters;

/// State of the projected individual at the start of a simulated year
#[derive(Debug, Clone)]
pub struct CohortState {
    /// Chronological age
    pub age: u32,

    /// Calendar year
    pub year: i32,

    /// Cumulative probability of being alive
    pub survival: f64,

    /// Biological age
    pub bio_age: f64,
}

impl CohortState {
    /// Initial state; biological age starts at chronological age scaled by frailty
    pub fn initial(params: &SimulationParameters, start_frailty: f64) -> Self {
        Self {
            age: params.start_age,
            year: params.current_year,
            survival: 1.0,
            bio_age: params.start_age as f64 * start_frailty,
        }
    }

    /// Life-table index for the current biological age, clamped to `[0, max_age]`
    pub fn table_age(&self, max_age: usize) -> usize {
        self.bio_age.floor().clamp(0.0, max_age as f64) as usize
    }

    /// Apply one year of mortality and aging, then move to the next year
    pub fn advance(&mut self, death_probability: f64, pace: f64) {
        self.survival *= 1.0 - death_probability;
        self.bio_age += pace;
        self.age += 1;
        self.year += 1;
    }
}
