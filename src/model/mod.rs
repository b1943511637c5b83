//! Stateless model primitives
//!
//! - Hazard conversion (probability <-> hazard rate)
//! - Frailty multiplier from the longevity score
//! - Medical-progress multiplier with quantile uncertainty
//! - LEV arrival distribution and achievement probability
//! - Pace of aging with post-LEV rejuvenation, and the health index
//!
//! Every method is a pure function of its arguments and the model constants,
//! so one `LevModel` can be shared freely across threads.

mod hazard;
mod frailty;
mod progress;
mod lev;
mod pace;

pub use hazard::{h_to_q, q_to_h, MAX_HAZARD};
pub use lev::{LevParams, LEV_NEVER};
pub use progress::quantile_z_score;

use crate::assumptions::ModelConstants;

/// One optimism step is 10% of medical-progress speed
pub(crate) const OPTIMISM_STEP: f64 = 0.1;

/// Model primitives bound to a fixed set of constants
#[derive(Debug, Clone, Default)]
pub struct LevModel {
    constants: ModelConstants,
}

impl LevModel {
    pub fn new(constants: ModelConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &ModelConstants {
        &self.constants
    }
}
