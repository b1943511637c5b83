//! Score-driven frailty adjustment

use super::LevModel;

impl LevModel {
    /// Multiplicative hazard adjustment for a longevity score.
    ///
    /// Score 50 is neutral (1.0); higher scores lower the hazard.
    pub fn frailty_multiplier(&self, score: f64) -> f64 {
        let p = score / 100.0;
        (self.constants.frailty_steepness * (0.5 - p)).exp()
    }
}
