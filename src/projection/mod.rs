//! Cohort projection engine for survival, biological age and health curves

mod state;
mod engine;
mod results;

pub use state::CohortState;
pub use engine::CohortEngine;
pub use results::{CohortSummary, SimulationResult, YearRow, YearStep};
