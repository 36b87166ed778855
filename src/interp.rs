// src/interp.rs
//
// Small numeric helpers used wherever the planner clamps or interpolates.
// All of them are total over finite inputs: no panics, no division.

/// Piecewise-linear interpolation of `x` over the table (`xp`, `fp`).
///
/// `xp` must be non-empty, strictly increasing, and the same length as `fp`.
/// Below the first breakpoint the first value is returned, above the last
/// breakpoint the last value. Querying exactly at a breakpoint returns the
/// table value bit-for-bit.
pub fn interp(x: f32, xp: &[f32], fp: &[f32]) -> f32 {
    debug_assert!(!xp.is_empty(), "interp table must not be empty");
    debug_assert_eq!(xp.len(), fp.len(), "interp table length mismatch");
    debug_assert!(
        xp.windows(2).all(|w| w[0] < w[1]),
        "interp breakpoints must be strictly increasing"
    );

    // Number of breakpoints <= x
    let idx = xp.partition_point(|&bp| bp <= x);

    if idx == 0 {
        return fp[0];
    }
    if idx == xp.len() {
        return fp[fp.len() - 1];
    }

    let lo = idx - 1;
    if x == xp[lo] {
        return fp[lo];
    }

    let t = (x - xp[lo]) / (xp[idx] - xp[lo]);
    fp[lo] + (fp[idx] - fp[lo]) * t
}

/// Clip `value` into `[lo, hi]` as `min(max(value, lo), hi)`.
///
/// Unlike `f32::clamp` this never panics: when `lo > hi` the result is `hi`.
/// Callers relying on the lower bound (e.g. the follow-gap offset floor of 1)
/// guarantee `lo <= hi` themselves.
#[inline]
pub fn clip(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f32>() / values.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BP: [f32; 4] = [0.0, 10.0, 25.0, 40.0];
    const VALS: [f32; 4] = [1.6, 1.2, 0.8, 0.6];

    #[test]
    fn test_interp_exact_at_breakpoints() {
        for (bp, val) in BP.iter().zip(VALS.iter()) {
            assert_eq!(interp(*bp, &BP, &VALS), *val, "breakpoint {} must be exact", bp);
        }
    }

    #[test]
    fn test_interp_clamps_outside_table() {
        assert_eq!(interp(-5.0, &BP, &VALS), 1.6);
        assert_eq!(interp(100.0, &BP, &VALS), 0.6);
    }

    #[test]
    fn test_interp_midpoint() {
        let v = interp(5.0, &BP, &VALS);
        assert!((v - 1.4).abs() < 1e-6, "midpoint should be 1.4, got {}", v);
    }

    #[test]
    fn test_interp_single_point_table() {
        assert_eq!(interp(3.0, &[1.0], &[7.0]), 7.0);
        assert_eq!(interp(-3.0, &[1.0], &[7.0]), 7.0);
    }

    #[test]
    fn test_clip_inverted_bounds_returns_hi() {
        assert_eq!(clip(3.0, 5.0, 4.0), 4.0);
        assert_eq!(clip(-4.5, 1.0, 11.0), 1.0);
        assert_eq!(clip(20.0, 1.0, 11.0), 11.0);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 3.0]), Some(2.0));
    }

    proptest! {
        /// Property: result stays within the table's value range
        #[test]
        fn prop_interp_within_value_range(x in -50.0f32..100.0f32) {
            let v = interp(x, &BP, &VALS);
            prop_assert!(v <= 1.6 + 1e-6 && v >= 0.6 - 1e-6);
        }

        /// Property: clip with ordered bounds lands inside them
        #[test]
        fn prop_clip_in_bounds(v in -100.0f32..100.0f32, lo in -10.0f32..0.0f32, span in 0.0f32..20.0f32) {
            let hi = lo + span;
            let c = clip(v, lo, hi);
            prop_assert!(c >= lo && c <= hi);
        }
    }
}
