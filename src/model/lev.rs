//! LEV arrival distribution and achievement probability
//!
//! Arrival of longevity escape velocity for an individual is modelled as a
//! logistic distribution over calendar years, centred on a median year that
//! is pushed back by an adoption lag (lower scores wait longer) and scaled by
//! the optimism setting.

use serde::{Deserialize, Serialize};

use super::{LevModel, OPTIMISM_STEP};

/// Median year sentinel meaning LEV never arrives
pub const LEV_NEVER: f64 = 9999.0;

/// Lower bound of the speed factor, keeps the delay division finite
const SPEED_FACTOR_FLOOR: f64 = 0.001;

/// Adoption-lag bands: (lower score, upper score, lag at lower, lag at upper)
const ADOPTION_LAG_BANDS: [(f64, f64, f64, f64); 3] = [
    (75.0, 95.0, 9.0, 0.0),
    (50.0, 75.0, 15.0, 9.0),
    (1.0, 50.0, 60.0, 15.0),
];

/// Score at and above which there is no adoption lag
const NO_LAG_SCORE: f64 = 95.0;

/// LEV arrival distribution for one individual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevParams {
    /// Median arrival calendar year (fractional), or `LEV_NEVER`
    pub median_year: f64,

    /// Arrival probability per year; index 0 is the current year
    pub prob_mass: Vec<f64>,
}

impl LevParams {
    pub fn never() -> Self {
        Self {
            median_year: LEV_NEVER,
            prob_mass: Vec::new(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.median_year < LEV_NEVER && !self.prob_mass.is_empty()
    }

    /// Probability that LEV has arrived by the end of year `current_year + offset`
    pub fn cumulative_by(&self, offset: usize) -> f64 {
        self.prob_mass.iter().take(offset + 1).sum()
    }

    /// First year offset at which the cumulative arrival probability reaches `p`
    pub fn offset_for_probability(&self, p: f64) -> Option<usize> {
        let mut cumulative = 0.0;
        for (i, mass) in self.prob_mass.iter().enumerate() {
            cumulative += mass;
            if cumulative >= p {
                return Some(i);
            }
        }
        None
    }
}

impl LevModel {
    /// Years of adoption lag for a target score, piecewise linear by band
    pub fn adoption_lag(&self, target_score: f64) -> f64 {
        if target_score >= NO_LAG_SCORE {
            return 0.0;
        }
        for (low, high, lag_low, lag_high) in ADOPTION_LAG_BANDS {
            if target_score >= low {
                let w = (target_score - low) / (high - low);
                return lag_low + (lag_high - lag_low) * w;
            }
        }
        // Below score 1: continue the lowest band
        let (low, high, lag_low, lag_high) = ADOPTION_LAG_BANDS[ADOPTION_LAG_BANDS.len() - 1];
        lag_low + (lag_high - lag_low) * (target_score - low) / (high - low)
    }

    /// Median LEV year and discretised arrival PMF over the window
    /// `current_year ..= current_year + lev_window_years`.
    ///
    /// The PMF is rescaled to sum to 1 over the window when it has any mass.
    /// The logistic mass that falls before `current_year` or after the window
    /// is spread over the window proportionally, so `lev_probability` reads a
    /// few percent higher than the raw logistic differences would give when
    /// the median year is close to `current_year`.
    pub fn lev_distribution(&self, target_score: f64, optimism: i32, current_year: i32) -> LevParams {
        let c = &self.constants;

        if optimism <= c.progress_disabled_optimism {
            return LevParams::never();
        }

        let shift = self.adoption_lag(target_score);
        let speed_factor = (1.0 + OPTIMISM_STEP * optimism as f64).max(SPEED_FACTOR_FLOOR);
        let base_delay_95 = (c.lev_reference_year - current_year).max(0) as f64;
        let adjusted_delay = (base_delay_95 + shift) / speed_factor;
        let median_year = current_year as f64 + adjusted_delay;

        let cdf = |t: f64| 1.0 / (1.0 + (-c.lev_steepness * (t - median_year)).exp());

        let mut prob_mass: Vec<f64> = (0..=c.lev_window_years as i32)
            .map(|offset| {
                let year = (current_year + offset) as f64;
                cdf(year) - cdf(year - 1.0)
            })
            .collect();

        let total: f64 = prob_mass.iter().sum();
        if total > 0.0 {
            for mass in &mut prob_mass {
                *mass /= total;
            }
        } else {
            log::warn!(
                "LEV median year {:.1} leaves no mass in the {}-year window",
                median_year,
                c.lev_window_years
            );
        }

        log::debug!(
            "LEV distribution: score={} optimism={} lag={:.2} median={:.2}",
            target_score,
            optimism,
            shift,
            median_year
        );

        LevParams { median_year, prob_mass }
    }

    /// Probability of being alive when LEV arrives.
    ///
    /// `ref_survival[i]` is the probability of being alive in year
    /// `current_year + i`. The result is capped by the fundamental limit and
    /// penalised quadratically for scores below the penalty threshold, so it
    /// always lies in `[0, fundamental_limit]`.
    pub fn lev_probability(&self, score: f64, optimism: i32, current_year: i32, ref_survival: &[f64]) -> f64 {
        let c = &self.constants;
        let lev = self.lev_distribution(score, optimism, current_year);

        let weighted: f64 = ref_survival
            .iter()
            .zip(&lev.prob_mass)
            .map(|(s, m)| s * m)
            .sum();

        let mut probability = weighted * c.fundamental_limit;
        if score < c.low_score_penalty_threshold {
            probability *= (score.max(0.0) / c.low_score_penalty_threshold).powi(2);
        }

        probability.clamp(0.0, c.fundamental_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::{prop_assert, proptest};

    #[test]
    fn test_adoption_lag_band_endpoints() {
        let model = LevModel::default();
        assert_eq!(model.adoption_lag(99.0), 0.0);
        assert_eq!(model.adoption_lag(95.0), 0.0);
        assert_eq!(model.adoption_lag(75.0), 9.0);
        assert_eq!(model.adoption_lag(50.0), 15.0);
        assert_eq!(model.adoption_lag(1.0), 60.0);
        assert_relative_eq!(model.adoption_lag(85.0), 4.5, max_relative = 1e-12);
        assert_relative_eq!(model.adoption_lag(62.5), 12.0, max_relative = 1e-12);
    }

    #[test]
    fn test_adoption_lag_decreasing() {
        let model = LevModel::default();
        for score in 1..99 {
            assert!(model.adoption_lag(score as f64 + 1.0) <= model.adoption_lag(score as f64));
        }
    }

    #[test]
    fn test_top_score_median_at_reference_year() {
        let model = LevModel::default();
        let lev = model.lev_distribution(95.0, 0, 2024);
        assert_abs_diff_eq!(lev.median_year, 2040.0, epsilon = 1e-9);
        assert_eq!(lev.prob_mass.len(), 121);
    }

    #[test]
    fn test_median_score_lag() {
        let model = LevModel::default();
        let lev = model.lev_distribution(50.0, 0, 2024);
        assert_abs_diff_eq!(lev.median_year, 2055.0, epsilon = 1e-9);
    }

    #[test]
    fn test_disabled_progress_never_reaches_lev() {
        let model = LevModel::default();
        for score in [1.0, 50.0, 99.0] {
            let lev = model.lev_distribution(score, -10, 2031);
            assert_eq!(lev.median_year, LEV_NEVER);
            assert!(lev.prob_mass.is_empty());
            assert!(!lev.is_reachable());
        }
    }

    #[test]
    fn test_optimism_pulls_median_forward() {
        let model = LevModel::default();
        let slow = model.lev_distribution(70.0, -3, 2024);
        let fast = model.lev_distribution(70.0, 3, 2024);
        assert!(fast.median_year < slow.median_year);
    }

    #[test]
    fn test_reference_year_in_past() {
        let model = LevModel::default();
        let lev = model.lev_distribution(95.0, 0, 2050);
        assert_abs_diff_eq!(lev.median_year, 2050.0, epsilon = 1e-9);
    }

    #[test]
    fn test_left_tail_rescaled_into_window() {
        let model = LevModel::default();
        let k = model.constants().lev_steepness;
        let cdf = |t: f64| 1.0 / (1.0 + (-k * (t - 2050.0)).exp());

        // Median at the current year: half the logistic mass lies before the window
        let lev = model.lev_distribution(95.0, 0, 2050);
        let raw: Vec<f64> = (0..=120).map(|i| cdf(2050.0 + i as f64) - cdf(2049.0 + i as f64)).collect();
        let raw_total: f64 = raw.iter().sum();

        assert!(raw_total < 0.6);
        assert_abs_diff_eq!(lev.cumulative_by(120), 1.0, epsilon = 1e-12);
        assert_relative_eq!(lev.prob_mass[0], raw[0] / raw_total, max_relative = 1e-12);
        assert!(lev.prob_mass[0] > raw[0]);
    }

    #[test]
    fn test_pmf_peaks_near_median() {
        let model = LevModel::default();
        let lev = model.lev_distribution(95.0, 0, 2024);
        let peak = lev
            .prob_mass
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!(peak == 16 || peak == 17, "peak at offset {}", peak);

        let half = lev.offset_for_probability(0.5).unwrap();
        assert!((15..=17).contains(&half));
        assert!(lev.cumulative_by(120) > 0.999);
    }

    #[test]
    fn test_lev_probability_with_certain_survival() {
        let model = LevModel::default();
        let survival = vec![1.0; 121];
        let p = model.lev_probability(80.0, 0, 2024, &survival);
        assert_relative_eq!(p, 0.90, max_relative = 1e-9);
    }

    #[test]
    fn test_low_score_penalty() {
        let model = LevModel::default();
        let survival = vec![1.0; 121];
        let p = model.lev_probability(10.0, 0, 2024, &survival);
        assert_relative_eq!(p, 0.90 * 0.25, max_relative = 1e-9);
    }

    #[test]
    fn test_lev_probability_zero_when_disabled() {
        let model = LevModel::default();
        let survival = vec![1.0; 121];
        assert_eq!(model.lev_probability(80.0, -10, 2024, &survival), 0.0);
    }

    #[test]
    fn test_short_survival_curve_uses_overlap() {
        let model = LevModel::default();
        let full = model.lev_probability(95.0, 0, 2024, &vec![1.0; 121]);
        let short = model.lev_probability(95.0, 0, 2024, &vec![1.0; 10]);
        assert!(short < full);
        assert!(short > 0.0);
    }

    proptest! {
        #[test]
        fn prop_pmf_normalised(score in 1u32..100, optimism in -9i32..=5, current_year in 1990i32..2100) {
            let model = LevModel::default();
            let lev = model.lev_distribution(score as f64, optimism, current_year);
            let total: f64 = lev.prob_mass.iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-3);
            prop_assert!(lev.prob_mass.iter().all(|&m| m >= 0.0));
        }

        #[test]
        fn prop_lev_probability_bounded(
            score in 1u32..100,
            optimism in -10i32..=5,
            survival in proptest::collection::vec(0.0f64..=1.0, 0..150),
        ) {
            let model = LevModel::default();
            let p = model.lev_probability(score as f64, optimism, 2024, &survival);
            prop_assert!((0.0..=0.90).contains(&p));
        }
    }
}
