// src/data_analysis/fft_utils.rs

use ndarray::Array1;
use realfft::num_complex::Complex64;
use realfft::RealFftPlanner;

/// One-sided spectrum (`n / 2 + 1` bins) of a real signal. Empty input gives
/// an empty spectrum; a planner failure is reported and yields zeros.
pub fn fft_forward(data: &[f64]) -> Array1<Complex64> {
    let n = data.len();
    if n == 0 {
        return Array1::zeros(0);
    }
    let fft = RealFftPlanner::<f64>::new().plan_fft_forward(n);
    let mut input = data.to_vec();
    let mut output = fft.make_output_vec();
    if let Err(e) = fft.process(&mut input, &mut output) {
        eprintln!("  Warning: FFT of {n} samples failed: {e}");
        return Array1::zeros(n / 2 + 1);
    }
    Array1::from(output)
}

/// Calculates the bin frequencies for a real FFT of length `n` sampled every `d` seconds.
pub fn fft_rfftfreq(n: usize, d: f64) -> Array1<f64> {
    if n == 0 || d <= 0.0 {
        return Array1::zeros(0);
    }
    let num_freqs = n / 2 + 1;
    Array1::from_iter((0..num_freqs).map(|i| i as f64 / (n as f64 * d)))
}

/// Frequency (Hz) of the largest non-DC spectral peak of a uniformly sampled
/// signal. The mean is removed first. Returns `None` for fewer than 4 samples,
/// an invalid sample rate, or a flat spectrum.
pub fn dominant_frequency(signal: &[f64], sample_rate: f64) -> Option<f64> {
    if signal.len() < 4 || !sample_rate.is_finite() || sample_rate <= 0.0 {
        return None;
    }
    let mean = signal.iter().sum::<f64>() / signal.len() as f64;
    let centered: Vec<f64> = signal.iter().map(|v| v - mean).collect();

    let spectrum = fft_forward(&centered);
    let freqs = fft_rfftfreq(signal.len(), 1.0 / sample_rate);

    let (peak_bin, peak_mag) = spectrum
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, c)| (i, c.norm()))
        .fold((0, 0.0_f64), |best, cur| if cur.1 > best.1 { cur } else { best });

    if peak_bin == 0 || peak_mag <= 1e-9 {
        return None;
    }
    freqs.get(peak_bin).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fft_forward_bin_count() {
        assert_eq!(fft_forward(&[0.0; 10]).len(), 6);
        assert_eq!(fft_forward(&[0.0; 9]).len(), 5);
        assert!(fft_forward(&[]).is_empty());
    }

    #[test]
    fn test_rfftfreq_spacing() {
        let freqs = fft_rfftfreq(8, 0.25);
        assert_eq!(freqs.len(), 5);
        assert_abs_diff_eq!(freqs[1], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(freqs[4], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dominant_frequency_of_sine() {
        let fs = 10_000.0;
        let signal: Vec<f64> = (0..10_000)
            .map(|i| (2.0 * std::f64::consts::PI * 120.0 * i as f64 / fs).sin() + 0.3)
            .collect();
        let f = dominant_frequency(&signal, fs).unwrap();
        assert_abs_diff_eq!(f, 120.0, epsilon = 1.0);
    }

    #[test]
    fn test_dominant_frequency_rejects_flat_or_short() {
        assert!(dominant_frequency(&[1.0; 64], 1000.0).is_none());
        assert!(dominant_frequency(&[1.0, 2.0], 1000.0).is_none());
        assert!(dominant_frequency(&[1.0, 2.0, 1.0, 2.0], 0.0).is_none());
    }
}
