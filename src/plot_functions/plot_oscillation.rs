// src/plot_functions/plot_oscillation.rs

use std::error::Error;
use std::ops::Range;

use crate::analysis::CaseAnalysis;
use crate::config::CaseConfig;
use crate::constants::{
    COLOR_CONFIGURED_LUT, COLOR_IDEAL_LUT, COLOR_REAL_SPEED, LINE_WIDTH_EMPHASIS, LINE_WIDTH_REFERENCE,
    MAX_PLOT_POINTS, ZOOM_Y_MARGIN_FRACTION,
};
use crate::data_analysis::speed_estimation::to_series;
use crate::data_input::sim_data::SimulationData;
use crate::plot_framework::{
    draw_stacked_plot, finite_bounds, sampled_series, series_ranges, step_post, PlotConfig, PlotSeries,
};
use crate::types::SpeedEstimate;

/// Time window of `intervals` estimates starting at the middle of the
/// configured-LUT stream, cut short at the last estimate.
fn zoom_window(estimates: &[SpeedEstimate], intervals: usize) -> Option<(f64, f64)> {
    if estimates.len() < 2 {
        return None;
    }
    let start = estimates.len() / 2;
    let end = (start + intervals.max(1)).min(estimates.len() - 1);
    let (t0, t1) = (estimates[start].time, estimates[end].time);
    (t1 > t0).then_some((t0, t1))
}

/// Value band for the zoom panel, padded by a fraction of its span so that
/// negative speeds keep `lo < hi`. A flat band is padded by its magnitude.
fn zoom_y_range(lo: f64, hi: f64) -> Range<f64> {
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * ZOOM_Y_MARGIN_FRACTION
    } else {
        lo.abs().max(1.0) * ZOOM_Y_MARGIN_FRACTION
    };
    lo - pad..hi + pad
}

fn oscillation_series(
    data: &SimulationData,
    configured: &[SpeedEstimate],
    corrected: &[SpeedEstimate],
    window: Option<(f64, f64)>,
) -> Vec<PlotSeries> {
    let in_window = |t: f64| window.map_or(true, |(t0, t1)| t >= t0 && t <= t1);
    let real: Vec<(f64, f64)> = sampled_series(&data.time, &data.omega_r, MAX_PLOT_POINTS)
        .into_iter()
        .filter(|p| in_window(p.0))
        .collect();
    let clip = |estimates: &[SpeedEstimate]| -> Vec<(f64, f64)> {
        step_post(&to_series(estimates))
            .into_iter()
            .filter(|p| in_window(p.0))
            .collect()
    };

    vec![
        PlotSeries::line(real, "Real speed", *COLOR_REAL_SPEED, LINE_WIDTH_REFERENCE),
        PlotSeries::line(clip(configured), "Configured LUT", *COLOR_CONFIGURED_LUT, LINE_WIDTH_EMPHASIS),
        PlotSeries::line(clip(corrected), "Corrected LUT", *COLOR_IDEAL_LUT, LINE_WIDTH_EMPHASIS),
    ]
}

/// Speed ripple with the configured table vs the reconstructed one, over the
/// whole run and zoomed into a window of `zoom_intervals` intervals.
pub fn plot_oscillation(
    data: &SimulationData,
    case: &CaseConfig,
    analysis: &CaseAnalysis,
    zoom_intervals: usize,
    output_file: &str,
) -> Result<(), Box<dyn Error>> {
    let configured = analysis.best_estimates();
    let corrected = &analysis.corrected;
    let zoom = zoom_window(configured, zoom_intervals);

    draw_stacked_plot(
        output_file,
        &case.name,
        "Oscillation",
        &["Full run", "Zoom"],
        |panel_index| {
            let (window, title) = match panel_index {
                0 => (None, "Speed oscillation: configured vs corrected LUT".to_string()),
                _ => (zoom, format!("Zoom: {zoom_intervals} intervals from mid-run")),
            };
            if panel_index > 0 && window.is_none() {
                return None;
            }

            let series = oscillation_series(data, configured, corrected, window);
            let (x_range, mut y_range) = series_ranges(&series)?;
            if window.is_some() {
                // Tight band around the estimates so the ripple is visible.
                let (lo, hi) = finite_bounds(series.iter().skip(1).flat_map(|s| s.data.iter().map(|p| p.1)))?;
                y_range = zoom_y_range(lo, hi);
            }
            Some(PlotConfig {
                title,
                x_range,
                y_range,
                series,
                x_label: "Time (s)".to_string(),
                y_label: "Electrical speed (rad/s)".to_string(),
                reference_lines: Vec::new(),
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(n: usize) -> Vec<SpeedEstimate> {
        (0..n)
            .map(|i| SpeedEstimate {
                time: i as f64 * 0.01,
                speed: 100.0,
            })
            .collect()
    }

    #[test]
    fn test_zoom_window_starts_at_middle() {
        let (t0, t1) = zoom_window(&stream(200), 60).unwrap();
        assert!((t0 - 1.00).abs() < 1e-9);
        assert!((t1 - 1.60).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_window_clamps_to_stream() {
        let (t0, t1) = zoom_window(&stream(10), 60).unwrap();
        assert!((t0 - 0.05).abs() < 1e-9);
        assert!((t1 - 0.09).abs() < 1e-9);
        assert!(zoom_window(&stream(1), 60).is_none());
    }

    #[test]
    fn test_zoom_y_range_keeps_order_for_negative_speeds() {
        let range = zoom_y_range(-120.0, -100.0);
        assert!((range.start - -121.0).abs() < 1e-9);
        assert!((range.end - -99.0).abs() < 1e-9);

        let range = zoom_y_range(100.0, 120.0);
        assert!((range.start - 99.0).abs() < 1e-9);
        assert!((range.end - 121.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_y_range_pads_flat_band() {
        let range = zoom_y_range(-200.0, -200.0);
        assert!(range.start < -200.0 && range.end > -200.0);
        let range = zoom_y_range(0.0, 0.0);
        assert!(range.start < 0.0 && range.end > 0.0);
    }
}
