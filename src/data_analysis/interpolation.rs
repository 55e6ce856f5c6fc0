// src/data_analysis/interpolation.rs

/// Linear interpolation of `fp` (sampled at non-decreasing `xp`) at `x`.
/// Values outside `[xp[0], xp[last]]` clamp to the end samples. Returns NaN for
/// empty input or a non-finite `x`.
pub fn interp_clamped(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 || !x.is_finite() {
        return f64::NAN;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }

    // First sample strictly greater than x. NaN samples in `xp` break the
    // ordering, so the result is clamped to a valid bracket.
    let upper = xp[..n].partition_point(|&t| t <= x).clamp(1, n - 1);
    let lower = upper - 1;
    let span = xp[upper] - xp[lower];
    if span <= 0.0 {
        return fp[upper];
    }
    let frac = (x - xp[lower]) / span;
    fp[lower] + frac * (fp[upper] - fp[lower])
}

/// Resamples `fp` at every timestamp in `xs`.
pub fn interp_many(xs: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    xs.iter().map(|&x| interp_clamped(x, xp, fp)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interior_point() {
        let xp = [0.0, 1.0, 2.0];
        let fp = [0.0, 10.0, 30.0];
        assert_relative_eq!(interp_clamped(0.5, &xp, &fp), 5.0);
        assert_relative_eq!(interp_clamped(1.5, &xp, &fp), 20.0);
        assert_relative_eq!(interp_clamped(1.0, &xp, &fp), 10.0);
    }

    #[test]
    fn test_clamps_at_boundaries() {
        let xp = [1.0, 2.0];
        let fp = [4.0, 8.0];
        assert_relative_eq!(interp_clamped(-5.0, &xp, &fp), 4.0);
        assert_relative_eq!(interp_clamped(50.0, &xp, &fp), 8.0);
    }

    #[test]
    fn test_repeated_timestamps_do_not_divide_by_zero() {
        let xp = [0.0, 1.0, 1.0, 2.0];
        let fp = [0.0, 1.0, 5.0, 5.0];
        let v = interp_clamped(1.5, &xp, &fp);
        assert!(v.is_finite());
        assert_relative_eq!(v, 5.0);
    }

    #[test]
    fn test_empty_is_nan() {
        assert!(interp_clamped(0.0, &[], &[]).is_nan());
    }

    #[test]
    fn test_non_finite_query_is_nan() {
        let xp = [0.0, 1.0, 2.0];
        let fp = [0.0, 10.0, 30.0];
        assert!(interp_clamped(f64::NAN, &xp, &fp).is_nan());
        assert!(interp_clamped(f64::INFINITY, &xp, &fp).is_nan());
    }

    #[test]
    fn test_nan_sample_time_does_not_panic() {
        let xp = [0.0, 1.0, f64::NAN, 3.0, 4.0, 5.0];
        let fp = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        for x in [0.5, 1.5, 2.5, 3.5, 4.5] {
            let _ = interp_clamped(x, &xp, &fp);
        }
        assert_relative_eq!(interp_clamped(4.5, &xp, &fp), 4.5);
    }

    #[test]
    fn test_interp_many() {
        let out = interp_many(&[0.25, 0.75], &[0.0, 1.0], &[0.0, 4.0]);
        assert_eq!(out.len(), 2);
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], 3.0);
    }
}
