//! Pace of aging, rejuvenation pull, and the health index

use super::LevModel;
use crate::cohort::MEDIAN_QUANTILE;

impl LevModel {
    /// Signed annual change of biological age in `year`.
    ///
    /// Before LEV the pace is frailty times the quantile's progress
    /// multiplier. From the LEV median year on, a rejuvenation pull ramps in
    /// with time constant `rejuvenation_tau`. Its strength is set from the
    /// median (50th percentile) progress trajectory at the LEV year,
    /// whichever quantile is being projected.
    #[allow(clippy::too_many_arguments)]
    pub fn pace_of_aging(
        &self,
        year: i32,
        score: f64,
        quantile_key: u32,
        optimism: i32,
        horizon_year: i32,
        current_year: i32,
        lev_median_year: f64,
    ) -> f64 {
        let c = &self.constants;

        let y_lev = lev_median_year.round() as i32;
        let z = self.frailty_multiplier(score);

        let r_q = self.progress_multiplier(year, score, quantile_key, optimism, horizon_year, current_year);
        let r_lev_median =
            self.progress_multiplier(y_lev, score, MEDIAN_QUANTILE, optimism, horizon_year, current_year);

        let pace_base_at_lev = z * r_lev_median;
        let lambda = pace_base_at_lev + c.rejuvenation_extra;

        let pull = if year >= y_lev && optimism > c.progress_disabled_optimism {
            lambda * (1.0 - (-((year - y_lev) as f64) / c.rejuvenation_tau).exp())
        } else {
            0.0
        };

        (z * r_q - pull).clamp(c.pace_floor, c.pace_ceiling)
    }

    /// Health index in (0, 1) from biological age; decreasing sigmoid
    pub fn bio_age_to_health(&self, bio_age: f64) -> f64 {
        let c = &self.constants;
        1.0 / (1.0 + ((bio_age - c.health_midpoint) / c.health_steepness).exp())
    }
}
