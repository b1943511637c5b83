//! LEV Projection - survival and healthspan projection under accelerating medical progress
//!
//! This library provides:
//! - Hazard, frailty and medical-progress multipliers with quantile uncertainty
//! - The LEV (longevity escape velocity) arrival distribution
//! - Pace-of-aging with post-LEV rejuvenation
//! - Year-by-year cohort projection of survival, biological age and health
//! - LEV achievement probability and multi-scenario runs

pub mod error;
pub mod cohort;
pub mod assumptions;
pub mod model;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{LevError, Result};
pub use cohort::{SimulationParameters, Sex};
pub use assumptions::{Assumptions, ModelConstants, MortalityLookup, ReferenceLifeTable};
pub use model::{LevModel, LevParams};
pub use projection::{CohortEngine, SimulationResult, CohortSummary};
pub use scenario::{ScenarioRunner, ProjectionReport, UncertaintyCone};
