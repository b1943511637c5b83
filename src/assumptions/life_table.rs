//! Baseline one-year death probabilities by age and sex
//!
//! The table is built from a sparse set of anchor ages:
//! - between anchors, log-hazard is interpolated linearly
//! - past the last anchor, a two-point Gompertz fit (log-hazard linear in age)
//!   anchored at ages 90 and 110 extrapolates out to age 150
//!
//! The projection engine only sees the `MortalityLookup` trait.

use crate::cohort::Sex;
use crate::error::{LevError, Result};
use crate::model::{h_to_q, q_to_h};

/// Last age stored in the dense table
pub const MAX_TABLE_AGE: usize = 150;

/// Probability used when a lookup has no usable value
pub const MISSING_DEATH_PROBABILITY: f64 = 0.99;

/// Anchor ages of the Gompertz extrapolation
const EXTRAPOLATION_ANCHORS: (usize, usize) = (90, 110);

/// Hazard floor so zero probabilities survive the log transform
const MIN_HAZARD: f64 = 1e-9;

/// Source of baseline one-year death probabilities
pub trait MortalityLookup {
    /// One-year death probability at an integer age
    fn death_probability(&self, age: usize, sex: Sex) -> f64;

    /// Largest age with a defined probability
    fn max_age(&self) -> usize;
}

/// Dense life table for ages 0..=150, one column per sex
#[derive(Debug, Clone)]
pub struct ReferenceLifeTable {
    male: Vec<f64>,
    female: Vec<f64>,
}

impl ReferenceLifeTable {
    /// Period life table shipped with the crate
    pub fn standard() -> Self {
        let anchors = Self::standard_anchors();
        let male: Vec<(usize, f64)> = anchors.iter().map(|&(age, m, _)| (age, m)).collect();
        let female: Vec<(usize, f64)> = anchors.iter().map(|&(age, _, f)| (age, f)).collect();

        Self {
            male: expand_anchors(&male),
            female: expand_anchors(&female),
        }
    }

    /// Build from sparse `(age, male_q, female_q)` anchors
    pub fn from_anchors(anchors: &[(usize, f64, f64)]) -> Result<Self> {
        if anchors.is_empty() {
            return Err(LevError::InvalidLifeTable("no rows".to_string()));
        }

        for pair in anchors.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(LevError::InvalidLifeTable(format!(
                    "ages must be strictly increasing (age {} follows {})",
                    pair[1].0, pair[0].0
                )));
            }
        }

        for &(age, male, female) in anchors {
            if age > MAX_TABLE_AGE {
                return Err(LevError::InvalidLifeTable(format!(
                    "age {} beyond {}",
                    age, MAX_TABLE_AGE
                )));
            }
            for q in [male, female] {
                if !(0.0..=1.0).contains(&q) {
                    return Err(LevError::InvalidLifeTable(format!(
                        "probability {} at age {} outside [0, 1]",
                        q, age
                    )));
                }
            }
        }

        let male: Vec<(usize, f64)> = anchors.iter().map(|&(age, m, _)| (age, m)).collect();
        let female: Vec<(usize, f64)> = anchors.iter().map(|&(age, _, f)| (age, f)).collect();

        Ok(Self {
            male: expand_anchors(&male),
            female: expand_anchors(&female),
        })
    }

    /// Load from a CSV with header `age,male,female`
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self> {
        let anchors = super::loader::load_life_table_anchors(path)?;
        Self::from_anchors(&anchors)
    }

    /// Full column for one sex (index = age)
    pub fn column(&self, sex: Sex) -> &[f64] {
        match sex {
            Sex::Male => &self.male,
            Sex::Female => &self.female,
        }
    }

    /// Reference anchors: (age, male_q, female_q)
    fn standard_anchors() -> Vec<(usize, f64, f64)> {
        vec![
            (0, 0.00590, 0.00490),
            (1, 0.00042, 0.00034),
            (5, 0.00013, 0.00011),
            (10, 0.00011, 0.00009),
            (15, 0.00045, 0.00020),
            (20, 0.00130, 0.00048),
            (25, 0.00160, 0.00060),
            (30, 0.00190, 0.00080),
            (35, 0.00230, 0.00105),
            (40, 0.00290, 0.00155),
            (45, 0.00390, 0.00230),
            (50, 0.00560, 0.00340),
            (55, 0.00850, 0.00510),
            (60, 0.01200, 0.00740),
            (65, 0.01650, 0.01050),
            (70, 0.02400, 0.01600),
            (75, 0.03700, 0.02550),
            (80, 0.05900, 0.04200),
            (85, 0.09700, 0.07200),
            (90, 0.16000, 0.12800),
            (95, 0.25000, 0.21000),
            (100, 0.35000, 0.31000),
            (105, 0.45000, 0.42000),
            (110, 0.55000, 0.52000),
        ]
    }
}

impl Default for ReferenceLifeTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl MortalityLookup for ReferenceLifeTable {
    fn death_probability(&self, age: usize, sex: Sex) -> f64 {
        let column = self.column(sex);
        let idx = age.min(column.len().saturating_sub(1));

        match column.get(idx).copied() {
            Some(q) if q.is_finite() => q,
            _ => {
                log::warn!("No death probability at age {} ({}), using {}", age, sex.as_str(), MISSING_DEATH_PROBABILITY);
                MISSING_DEATH_PROBABILITY
            }
        }
    }

    fn max_age(&self) -> usize {
        MAX_TABLE_AGE
    }
}

/// Expand sorted sparse anchors into a dense 0..=MAX_TABLE_AGE column
fn expand_anchors(anchors: &[(usize, f64)]) -> Vec<f64> {
    let mut log_h = vec![f64::NAN; MAX_TABLE_AGE + 1];

    let Some(&(first_age, first_q)) = anchors.first() else {
        return vec![MISSING_DEATH_PROBABILITY; MAX_TABLE_AGE + 1];
    };
    let (last_age, _) = anchors[anchors.len() - 1];

    // Below the first anchor: flat
    for slot in log_h.iter_mut().take(first_age + 1) {
        *slot = log_hazard(first_q);
    }

    // Between anchors: linear in log-hazard
    for pair in anchors.windows(2) {
        let (a0, q0) = pair[0];
        let (a1, q1) = pair[1];
        let (l0, l1) = (log_hazard(q0), log_hazard(q1));
        let span = (a1 - a0) as f64;
        for age in a0..=a1 {
            let w = (age - a0) as f64 / span;
            log_h[age] = l0 + (l1 - l0) * w;
        }
    }

    // Beyond the last anchor: Gompertz through the two extrapolation anchors
    if last_age < MAX_TABLE_AGE {
        let (lo, hi) = if last_age >= EXTRAPOLATION_ANCHORS.1 {
            EXTRAPOLATION_ANCHORS
        } else {
            (last_age.saturating_sub(20), last_age)
        };
        let slope = if hi > lo {
            ((log_h[hi] - log_h[lo]) / (hi - lo) as f64).max(0.0)
        } else {
            0.0
        };
        let base = log_h[last_age];
        for age in (last_age + 1)..=MAX_TABLE_AGE {
            log_h[age] = base + slope * (age - last_age) as f64;
        }
    }

    log_h
        .into_iter()
        .map(|l| if l.is_finite() { h_to_q(l.exp()).min(1.0) } else { MISSING_DEATH_PROBABILITY })
        .collect()
}

fn log_hazard(q: f64) -> f64 {
    q_to_h(q).max(MIN_HAZARD).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_anchor_ages_reproduced() {
        let table = ReferenceLifeTable::standard();

        assert_relative_eq!(table.death_probability(40, Sex::Male), 0.0029, max_relative = 1e-9);
        assert_relative_eq!(table.death_probability(90, Sex::Female), 0.128, max_relative = 1e-9);
        assert_relative_eq!(table.death_probability(110, Sex::Male), 0.55, max_relative = 1e-9);
    }

    #[test]
    fn test_interpolation_between_anchors() {
        let table = ReferenceLifeTable::standard();

        let q70 = table.death_probability(70, Sex::Male);
        let q72 = table.death_probability(72, Sex::Male);
        let q75 = table.death_probability(75, Sex::Male);
        assert!(q70 < q72 && q72 < q75);

        let q87 = table.death_probability(87, Sex::Female);
        assert!(q87 > 0.072 && q87 < 0.128);
    }

    #[test]
    fn test_extrapolation_to_150() {
        let table = ReferenceLifeTable::standard();

        let column = table.column(Sex::Male);
        assert_eq!(column.len(), MAX_TABLE_AGE + 1);
        for age in 110..MAX_TABLE_AGE {
            assert!(column[age + 1] >= column[age], "not increasing at age {}", age);
        }
        assert!(column[MAX_TABLE_AGE] > 0.99 && column[MAX_TABLE_AGE] <= 1.0);
    }

    #[test]
    fn test_lookup_clamps_beyond_table() {
        let table = ReferenceLifeTable::standard();
        assert_eq!(
            table.death_probability(180, Sex::Female),
            table.death_probability(MAX_TABLE_AGE, Sex::Female)
        );
    }

    #[test]
    fn test_from_anchors_validation() {
        assert!(ReferenceLifeTable::from_anchors(&[]).is_err());
        assert!(ReferenceLifeTable::from_anchors(&[(10, 0.01, 0.01), (5, 0.02, 0.02)]).is_err());
        assert!(ReferenceLifeTable::from_anchors(&[(10, 1.5, 0.01)]).is_err());

        let table = ReferenceLifeTable::from_anchors(&[(0, 0.001, 0.001), (100, 0.3, 0.25)]).unwrap();
        assert_relative_eq!(table.death_probability(0, Sex::Male), 0.001, max_relative = 1e-9);
        assert!(table.death_probability(120, Sex::Male) > 0.3);
    }

    #[test]
    fn test_load_default_csv() {
        let from_csv = ReferenceLifeTable::from_csv_path(std::path::Path::new("data/reference_life_table.csv"))
            .expect("Failed to load life table");
        let standard = ReferenceLifeTable::standard();

        for age in [0, 33, 77, 104, 130] {
            assert_relative_eq!(
                from_csv.death_probability(age, Sex::Male),
                standard.death_probability(age, Sex::Male),
                max_relative = 1e-12
            );
        }
    }
}
