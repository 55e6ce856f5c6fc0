// src/data_analysis/smoothing.rs

use crate::types::SpeedEstimate;

/// Single-pole IIR low-pass: `out[0] = in[0]`,
/// `out[i] = alpha * in[i] + (1 - alpha) * out[i - 1]`.
pub fn exponential_smooth(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut filtered = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return filtered;
    };

    let mut state = first;
    filtered.push(state);
    for &v in &values[1..] {
        state = alpha * v + (1.0 - alpha) * state;
        filtered.push(state);
    }
    filtered
}

/// Smooths the speed values of an estimate stream, keeping its timestamps.
pub fn smooth_estimates(estimates: &[SpeedEstimate], alpha: f64) -> Vec<SpeedEstimate> {
    let speeds: Vec<f64> = estimates.iter().map(|e| e.speed).collect();
    estimates
        .iter()
        .zip(exponential_smooth(&speeds, alpha))
        .map(|(e, speed)| SpeedEstimate { time: e.time, speed })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_alpha_one_is_identity() {
        let input = vec![3.0, -1.0, 7.5, 2.25, 0.0];
        assert_eq!(exponential_smooth(&input, 1.0), input);
    }

    #[test]
    fn test_first_sample_initializes_state() {
        let out = exponential_smooth(&[10.0, 20.0], 0.25);
        assert_relative_eq!(out[0], 10.0);
        assert_relative_eq!(out[1], 12.5);
    }

    #[test]
    fn test_converges_to_constant_input() {
        for alpha in [0.01, 0.05, 0.5, 0.9] {
            let mut input = vec![0.0];
            input.extend(std::iter::repeat(100.0).take(5000));
            let out = exponential_smooth(&input, alpha);

            let errors: Vec<f64> = out.iter().map(|v| (100.0 - v).abs()).collect();
            assert!(errors
                .windows(2)
                .filter(|w| w[0] > 1e-9)
                .all(|w| w[1] <= w[0]));
            assert!(errors.last().copied().unwrap_or(f64::MAX) < 1e-6);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(exponential_smooth(&[], 0.05).is_empty());
        assert!(smooth_estimates(&[], 0.05).is_empty());
    }

    #[test]
    fn test_smooth_estimates_keeps_timestamps() {
        let estimates = vec![
            SpeedEstimate { time: 0.1, speed: 100.0 },
            SpeedEstimate { time: 0.2, speed: 200.0 },
        ];
        let out = smooth_estimates(&estimates, 0.5);
        assert_relative_eq!(out[1].time, 0.2);
        assert_relative_eq!(out[1].speed, 150.0);
    }
}
