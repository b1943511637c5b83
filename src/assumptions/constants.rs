//! Calibration constants for the longevity model
//!
//! Every tunable number of the model lives here. The defaults reproduce the
//! reference calibration; a JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{LevError, Result};

/// Immutable set of model constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConstants {
    /// Frailty steepness: multiplier = exp(A * (0.5 - score/100))
    pub frailty_steepness: f64,

    /// Width of the uptake sigmoid around score 50
    pub uptake_width: f64,

    /// Annual log-hazard reduction from medical progress at optimism 0
    pub base_progress_rate: f64,

    /// Progress volatility per sqrt(year)
    pub progress_sigma0: f64,

    /// Clamp for the progress multiplier
    pub progress_floor: f64,
    pub progress_ceiling: f64,

    /// Un-adjusted 95th-percentile LEV calendar year
    pub lev_reference_year: i32,

    /// Logistic steepness of the LEV arrival CDF (ln 4 / 5: ~10 years from 50% to 95%)
    pub lev_steepness: f64,

    /// Years after the current year covered by the LEV PMF
    pub lev_window_years: u32,

    /// Extra rejuvenation pull on top of the pace at LEV
    pub rejuvenation_extra: f64,

    /// Time constant (years) of the post-LEV rejuvenation ramp
    pub rejuvenation_tau: f64,

    /// Clamp for the annual pace of aging
    pub pace_floor: f64,
    pub pace_ceiling: f64,

    /// Hazard suppression exp(gain * pace) while pace is negative
    pub rejuvenation_hazard_gain: f64,

    /// Clamp for the combined hazard multiplier
    pub hazard_multiplier_floor: f64,
    pub hazard_multiplier_ceiling: f64,

    /// Cap on the one-year death probability
    pub max_annual_death_probability: f64,

    /// Health index: 1 / (1 + exp((bio_age - midpoint) / steepness))
    pub health_midpoint: f64,
    pub health_steepness: f64,

    /// Health index at or above which a year counts towards healthspan
    pub healthspan_threshold: f64,

    /// Irreducible cap on the LEV achievement probability
    pub fundamental_limit: f64,

    /// Scores below this are penalised by (score / threshold)^2
    pub low_score_penalty_threshold: f64,

    /// Exclusive upper bound of the simulated age loop
    pub max_simulated_age: u32,

    /// Years over which the protocol moves the score from start to target
    pub protocol_ramp_years: u32,

    /// Terminal pace and survival thresholds for the indefinite flag
    pub indefinite_pace_threshold: f64,
    pub indefinite_survival_threshold: f64,

    /// Optimism at or below which medical progress is disabled
    pub progress_disabled_optimism: i32,
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            frailty_steepness: 0.65,
            uptake_width: 0.12,
            base_progress_rate: 0.018,
            progress_sigma0: 0.030,
            progress_floor: 0.01,
            progress_ceiling: 1.20,
            lev_reference_year: 2040,
            lev_steepness: 4f64.ln() / 5.0,
            lev_window_years: 120,
            rejuvenation_extra: 0.20,
            rejuvenation_tau: 6.0,
            pace_floor: -0.50,
            pace_ceiling: 2.00,
            rejuvenation_hazard_gain: 2.0,
            hazard_multiplier_floor: 0.05,
            hazard_multiplier_ceiling: 2.5,
            max_annual_death_probability: 0.999,
            health_midpoint: 72.0,
            health_steepness: 9.0,
            healthspan_threshold: 0.70,
            fundamental_limit: 0.90,
            low_score_penalty_threshold: 20.0,
            max_simulated_age: 200,
            protocol_ramp_years: 10,
            indefinite_pace_threshold: -0.10,
            indefinite_survival_threshold: 0.01,
            progress_disabled_optimism: -10,
        }
    }
}

impl ModelConstants {
    /// Load constants from a JSON file; missing fields keep their defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let constants: Self = serde_json::from_str(&text)?;
        constants.validate()?;
        log::info!("Loaded model constants from {}", path.display());
        Ok(constants)
    }

    /// Reject constants that would make the model degenerate
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("frailty_steepness", self.frailty_steepness),
            ("base_progress_rate", self.base_progress_rate),
            ("progress_sigma0", self.progress_sigma0),
            ("rejuvenation_extra", self.rejuvenation_extra),
            ("rejuvenation_hazard_gain", self.rejuvenation_hazard_gain),
            ("health_midpoint", self.health_midpoint),
            ("indefinite_pace_threshold", self.indefinite_pace_threshold),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(name, format!("{} is not finite", value)));
            }
        }

        let positive = [
            ("uptake_width", self.uptake_width),
            ("lev_steepness", self.lev_steepness),
            ("rejuvenation_tau", self.rejuvenation_tau),
            ("health_steepness", self.health_steepness),
            ("low_score_penalty_threshold", self.low_score_penalty_threshold),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(name, format!("{} must be positive", value)));
            }
        }

        let ranges = [
            ("progress_floor", self.progress_floor, self.progress_ceiling),
            ("pace_floor", self.pace_floor, self.pace_ceiling),
            (
                "hazard_multiplier_floor",
                self.hazard_multiplier_floor,
                self.hazard_multiplier_ceiling,
            ),
        ];
        for (name, low, high) in ranges {
            if !(low.is_finite() && high.is_finite() && low <= high) {
                return Err(invalid(name, format!("[{}, {}] is not an ordered range", low, high)));
            }
        }

        let probabilities = [
            ("max_annual_death_probability", self.max_annual_death_probability),
            ("healthspan_threshold", self.healthspan_threshold),
            ("fundamental_limit", self.fundamental_limit),
            ("indefinite_survival_threshold", self.indefinite_survival_threshold),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(name, format!("{} is not a probability", value)));
            }
        }

        if self.max_simulated_age == 0 {
            return Err(invalid("max_simulated_age", "must be positive".to_string()));
        }

        Ok(())
    }
}

fn invalid(name: &'static str, reason: String) -> LevError {
    LevError::InvalidConstant { name, reason }
}
