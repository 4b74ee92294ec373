//! Property-based tests for axis normalization.

use hidstick_calibration::{AxisRange, LOGICAL_MAXIMUM, LOGICAL_MINIMUM, map_range};
use proptest::prelude::*;

fn distinct_bounds() -> impl Strategy<Value = (i16, i16)> {
    (any::<i16>(), any::<i16>()).prop_filter("bounds must differ", |(a, b)| a != b)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Output always lies inside the logical report range.
    #[test]
    fn prop_output_within_logical_range((min, max) in distinct_bounds(), value in any::<i16>()) {
        let range = AxisRange::new(min, max).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let out = range.normalize(value);
        prop_assert!((LOGICAL_MINIMUM..=LOGICAL_MAXIMUM).contains(&out));
    }

    /// Physical minimum maps to the logical minimum and physical maximum to
    /// the logical maximum, for both orientations.
    #[test]
    fn prop_endpoints_exact((min, max) in distinct_bounds()) {
        let range = AxisRange::new(min, max).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(range.normalize(min), LOGICAL_MINIMUM);
        prop_assert_eq!(range.normalize(max), LOGICAL_MAXIMUM);
    }

    /// Non-decreasing for a normal range, non-increasing for an inverted one.
    #[test]
    fn prop_monotonic(
        (min, max) in distinct_bounds(),
        a in any::<i16>(),
        b in any::<i16>(),
    ) {
        let range = AxisRange::new(min, max).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let (lo, hi) = (a.min(b), a.max(b));
        let (out_lo, out_hi) = (range.normalize(lo), range.normalize(hi));
        if range.is_inverted() {
            prop_assert!(out_lo >= out_hi, "inverted: f({lo})={out_lo} < f({hi})={out_hi}");
        } else {
            prop_assert!(out_lo <= out_hi, "normal: f({lo})={out_lo} > f({hi})={out_hi}");
        }
    }

    /// Mirroring the bounds mirrors the output around zero.
    #[test]
    fn prop_inversion_mirrors((min, max) in distinct_bounds(), value in any::<i16>()) {
        let normal = AxisRange::new(min.min(max), min.max(max))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let inverted = AxisRange::new(min.max(max), min.min(max))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let (lo, hi) = normal.real_bounds();
        let reflected = i16::try_from(i32::from(hi) - i32::from(value.clamp(lo, hi)) + i32::from(lo))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(inverted.normalize(value), normal.normalize(reflected));
    }

    /// Normalization agrees with the general range mapper on clamped input.
    #[test]
    fn prop_matches_map_range((min, max) in distinct_bounds(), value in any::<i16>()) {
        let lo = min.min(max);
        let hi = min.max(max);
        let range = AxisRange::new(lo, hi).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let expected = map_range(
            i64::from(value.clamp(lo, hi)),
            i64::from(lo),
            i64::from(hi),
            i64::from(LOGICAL_MINIMUM),
            i64::from(LOGICAL_MAXIMUM),
        ).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(i64::from(range.normalize(value)), expected);
    }
}
