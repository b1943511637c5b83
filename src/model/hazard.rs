//! Conversion between one-year death probability and hazard rate

/// Hazard returned for certain death (q >= 1) instead of infinity
pub const MAX_HAZARD: f64 = 100.0;

/// Death probability to hazard: h = -ln(1 - q)
pub fn q_to_h(q: f64) -> f64 {
    if q >= 1.0 {
        MAX_HAZARD
    } else {
        -(-q).ln_1p()
    }
}

/// Hazard to death probability: q = 1 - exp(-h)
pub fn h_to_q(h: f64) -> f64 {
    -(-h).exp_m1()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::{prop_assert, proptest};

    #[test]
    fn test_known_values() {
        assert_eq!(q_to_h(0.0), 0.0);
        assert_abs_diff_eq!(q_to_h(0.5), 2f64.ln(), epsilon = 1e-15);
        assert_abs_diff_eq!(h_to_q(2f64.ln()), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_certain_death_is_finite() {
        assert_eq!(q_to_h(1.0), MAX_HAZARD);
        assert_eq!(q_to_h(1.5), MAX_HAZARD);
        assert!(h_to_q(MAX_HAZARD) < 1.0 + 1e-12);
    }

    proptest! {
        #[test]
        fn prop_round_trip(q in 0.0f64..1.0) {
            prop_assert!((h_to_q(q_to_h(q)) - q).abs() <= 1e-9);
        }
    }
}
