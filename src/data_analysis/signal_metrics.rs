// src/data_analysis/signal_metrics.rs

use ndarray::{s, Array1, ArrayView1};

use crate::constants::{
    MIN_INTERVAL_S, MIN_MECH_SPEED_RAD_S, MIN_RMS_CURRENT_A, PHASE_POWER_FACTOR,
    TPA_MIN_CYCLE_FREQ_HZ, TPA_MIN_CYCLE_SAMPLES, TPA_MIN_WINDOW_SAMPLES,
};

/// Torque-per-amp statistics over one time window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TpaStats {
    pub kt_mean: f64, // |T / I_rms| over the whole window (N*m/A rms)
    pub kt_std: f64,  // Spread of per-cycle ratios, 0 with fewer than 3 cycles
    pub cycles: usize,
    pub samples: usize,
}

/// Estimates the median sample rate (Hz) from a time vector.
pub fn estimate_sample_rate(time: &[f64]) -> Option<f64> {
    let mut deltas: Vec<f64> = time
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|dt| dt.is_finite() && *dt > 0.0)
        .collect();
    if deltas.is_empty() {
        return None;
    }
    deltas.sort_by(|a, b| a.total_cmp(b));
    let median = deltas[deltas.len() / 2];
    if median < MIN_INTERVAL_S {
        None
    } else {
        Some(1.0 / median)
    }
}

/// Fundamental frequency from sign changes of the mean-removed signal.
/// Consecutive crossings are half a period apart.
pub fn estimate_zero_crossing_frequency(time: &[f64], signal: &[f64]) -> Option<f64> {
    let n = time.len().min(signal.len());
    if n < 2 {
        return None;
    }
    let mean = ArrayView1::from(&signal[..n]).mean()?;
    let sign = |v: f64| {
        let c = v - mean;
        if c > 0.0 {
            1
        } else if c < 0.0 {
            -1
        } else {
            0
        }
    };

    let crossing_times: Vec<f64> = (0..n - 1)
        .filter(|&i| sign(signal[i]) != sign(signal[i + 1]))
        .map(|i| time[i])
        .collect();
    if crossing_times.len() < 2 {
        return None;
    }

    let spacing: Array1<f64> = crossing_times.windows(2).map(|w| w[1] - w[0]).collect();
    let half_period = spacing.mean()?;
    if half_period < MIN_INTERVAL_S {
        return None;
    }
    Some(1.0 / (2.0 * half_period))
}

/// First sample strictly above `threshold`, as (index, time).
pub fn first_threshold_crossing(time: &[f64], signal: &[f64], threshold: f64) -> Option<(usize, f64)> {
    signal
        .iter()
        .zip(time.iter())
        .position(|(v, _)| *v > threshold)
        .map(|idx| (idx, time[idx]))
}

/// Negative-to-positive zero crossings with linearly interpolated times.
/// Crossings closer than half of `1 / min_freq` to the previous one are
/// ignored to reject switching ripple.
pub fn find_rising_zero_crossings(time: &[f64], signal: &[f64], min_freq: f64) -> Vec<(usize, f64)> {
    let n = time.len().min(signal.len());
    let min_period = 1.0 / min_freq;
    let mut last_t = -min_period;
    let mut crossings = Vec::new();

    for i in 0..n.saturating_sub(1) {
        if signal[i] <= 0.0 && signal[i + 1] > 0.0 && time[i] - last_t > min_period * 0.5 {
            let frac = -signal[i] / (signal[i + 1] - signal[i]);
            let t_cross = time[i] + frac * (time[i + 1] - time[i]);
            crossings.push((i, t_cross));
            last_t = t_cross;
        }
    }
    crossings
}

/// Torque per RMS ampere from phase power: `P = 3 * mean(e * i)`,
/// `w_m = mean(w_r) / pole_pairs`, `T = P / w_m`, `Kt = |T / I_rms|`.
/// Guarded divisions yield 0 instead of infinities.
fn kt_ratio(i_a: ArrayView1<f64>, e_a: ArrayView1<f64>, omega_r: ArrayView1<f64>, pole_pairs: u32) -> Option<f64> {
    let i_rms = i_a.mapv(|i| i * i).mean()?.sqrt();
    let p_avg = PHASE_POWER_FACTOR * (&e_a * &i_a).mean()?;
    let w_m = omega_r.mean()? / f64::from(pole_pairs.max(1));

    let torque = if w_m.abs() > MIN_MECH_SPEED_RAD_S { p_avg / w_m } else { 0.0 };
    let ratio = if i_rms > MIN_RMS_CURRENT_A { torque / i_rms } else { 0.0 };
    Some(ratio.abs())
}

/// Torque-per-amp statistics of the samples with `start_s <= t <= start_s + duration_s`.
/// Windows with too few samples yield all-zero stats.
pub fn torque_per_amp(
    time: &[f64],
    i_a: &[f64],
    e_a: &[f64],
    omega_r: &[f64],
    pole_pairs: u32,
    start_s: f64,
    duration_s: f64,
) -> TpaStats {
    let n = time.len().min(i_a.len()).min(e_a.len()).min(omega_r.len());
    let end_s = start_s + duration_s;
    let in_window: Vec<usize> = (0..n).filter(|&k| time[k] >= start_s && time[k] <= end_s).collect();
    if in_window.len() <= TPA_MIN_WINDOW_SAMPLES {
        return TpaStats::default();
    }

    let pick = |src: &[f64]| -> Array1<f64> { in_window.iter().map(|&k| src[k]).collect() };
    let t_win = pick(time);
    let i_win = pick(i_a);
    let e_win = pick(e_a);
    let w_win = pick(omega_r);

    let kt_mean = kt_ratio(i_win.view(), e_win.view(), w_win.view(), pole_pairs).unwrap_or(0.0);

    let t_slice = t_win.as_slice().unwrap_or(&[]);
    let i_slice = i_win.as_slice().unwrap_or(&[]);
    let cycles = find_rising_zero_crossings(t_slice, i_slice, TPA_MIN_CYCLE_FREQ_HZ);

    let mut cycle_ratios = Vec::new();
    for pair in cycles.windows(2) {
        let (start, end) = (pair[0].0, pair[1].0);
        if end - start <= TPA_MIN_CYCLE_SAMPLES {
            continue;
        }
        let cycle_ratio = kt_ratio(
            i_win.slice(s![start..end]),
            e_win.slice(s![start..end]),
            w_win.slice(s![start..end]),
            pole_pairs,
        );
        if let Some(ratio) = cycle_ratio {
            if ratio > 0.0 {
                cycle_ratios.push(ratio);
            }
        }
    }

    let cycles = cycle_ratios.len();
    let kt_std = if cycles > 2 { Array1::from(cycle_ratios).std(0.0) } else { 0.0 };

    TpaStats {
        kt_mean,
        kt_std,
        cycles,
        samples: in_window.len(),
    }
}
