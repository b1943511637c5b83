//! Simulation parameters for a single projected individual

use serde::{Deserialize, Serialize};

use crate::error::{LevError, Result};

/// Progress-uncertainty quantile keys, pessimistic to optimistic
pub const QUANTILE_KEYS: [u32; 5] = [5, 25, 50, 75, 95];

/// Median progress quantile
pub const MEDIAN_QUANTILE: u32 = 50;

/// Optimism range in 10% steps of medical-progress speed (-100% .. +50%)
pub const MIN_OPTIMISM: i32 = -10;
pub const MAX_OPTIMISM: i32 = 5;

/// Sex of the projected individual, selects the life-table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = LevError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(LevError::InvalidParameter {
                field: "sex",
                value: s.to_string(),
                reason: "expected male or female",
            }),
        }
    }
}

/// Inputs for one cohort projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Chronological age at the start of the projection
    pub start_age: u32,

    /// Sex for the baseline life table
    pub sex: Sex,

    /// Longevity score today (1-99, 50 = median)
    pub start_score: u32,

    /// Longevity score reached after the protocol ramp (1-99)
    pub target_score: u32,

    /// Calendar year after which medical progress stops accruing
    pub horizon_year: i32,

    /// Medical-progress speed in 10% steps (-10 = no progress, +5 = +50%)
    pub optimism: i32,

    /// Calendar year of the first projected step
    pub current_year: i32,

    /// Enables the score ramp and rejuvenation coupling
    pub is_protocol: bool,

    /// One of `QUANTILE_KEYS`
    pub progress_quantile: u32,
}

impl SimulationParameters {
    /// Neutral parameters: median score, no protocol, median progress
    pub fn new(start_age: u32, sex: Sex, current_year: i32) -> Self {
        Self {
            start_age,
            sex,
            start_score: 50,
            target_score: 50,
            horizon_year: current_year + 100,
            optimism: 0,
            current_year,
            is_protocol: false,
            progress_quantile: MEDIAN_QUANTILE,
        }
    }

    pub fn with_scores(mut self, start_score: u32, target_score: u32) -> Self {
        self.start_score = start_score;
        self.target_score = target_score;
        self
    }

    pub fn with_optimism(mut self, optimism: i32) -> Self {
        self.optimism = optimism;
        self
    }

    pub fn with_horizon(mut self, horizon_year: i32) -> Self {
        self.horizon_year = horizon_year;
        self
    }

    pub fn with_protocol(mut self, is_protocol: bool) -> Self {
        self.is_protocol = is_protocol;
        self
    }

    pub fn with_quantile(mut self, progress_quantile: u32) -> Self {
        self.progress_quantile = progress_quantile;
        self
    }

    /// Same individual without the protocol, at today's score
    pub fn baseline(&self) -> Self {
        Self {
            target_score: self.start_score,
            is_protocol: false,
            progress_quantile: MEDIAN_QUANTILE,
            ..self.clone()
        }
    }

    /// Check the caller-side preconditions of the engine.
    ///
    /// The engine does not call this; it is meant for input layers (CLI,
    /// batch loader) before parameters reach the model.
    pub fn validate(&self, max_age: u32) -> Result<()> {
        check_score("start_score", self.start_score)?;
        check_score("target_score", self.target_score)?;

        if !(MIN_OPTIMISM..=MAX_OPTIMISM).contains(&self.optimism) {
            return Err(LevError::InvalidParameter {
                field: "optimism",
                value: self.optimism.to_string(),
                reason: "must be between -10 and 5",
            });
        }
        if !QUANTILE_KEYS.contains(&self.progress_quantile) {
            return Err(LevError::InvalidParameter {
                field: "progress_quantile",
                value: self.progress_quantile.to_string(),
                reason: "must be one of 5, 25, 50, 75, 95",
            });
        }
        if self.start_age >= max_age {
            return Err(LevError::InvalidParameter {
                field: "start_age",
                value: self.start_age.to_string(),
                reason: "must be below the maximum simulated age",
            });
        }
        if self.current_year < 0 {
            return Err(LevError::InvalidParameter {
                field: "current_year",
                value: self.current_year.to_string(),
                reason: "must be non-negative",
            });
        }
        if self.horizon_year < self.current_year {
            return Err(LevError::InvalidParameter {
                field: "horizon_year",
                value: self.horizon_year.to_string(),
                reason: "must not precede the current year",
            });
        }
        Ok(())
    }
}

fn check_score(field: &'static str, score: u32) -> Result<()> {
    if (1..=99).contains(&score) {
        Ok(())
    } else {
        Err(LevError::InvalidParameter {
            field,
            value: score.to_string(),
            reason: "must be between 1 and 99",
        })
    }
}
