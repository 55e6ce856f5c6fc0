// src/plot_functions/plot_logged_estimate.rs

use std::error::Error;

use crate::config::CaseConfig;
use crate::constants::{
    COLOR_LOGGED_ESTIMATE, COLOR_MARKER, COLOR_REAL_SPEED, LINE_WIDTH_EMPHASIS, LINE_WIDTH_REFERENCE,
    MAX_PLOT_POINTS,
};
use crate::data_input::sim_data::SimulationData;
use crate::plot_framework::{draw_stacked_plot, sampled_series, series_ranges, PlotConfig, PlotSeries, ReferenceLine};

/// Estimator output logged by the model (`omega_sw`) against the real speed.
/// `threshold_crossing` marks when the rotor first passed the speed threshold.
pub fn plot_logged_estimate(
    data: &SimulationData,
    omega_sw: &[f64],
    case: &CaseConfig,
    threshold_crossing: Option<f64>,
    output_file: &str,
) -> Result<(), Box<dyn Error>> {
    draw_stacked_plot(output_file, &case.name, "Logged estimate", &["Logged estimate"], |_| {
        let series = vec![
            PlotSeries::line(
                sampled_series(&data.time, &data.omega_r, MAX_PLOT_POINTS),
                "Real speed (omega_r)",
                *COLOR_REAL_SPEED,
                LINE_WIDTH_REFERENCE,
            ),
            PlotSeries::line(
                sampled_series(&data.time, omega_sw, MAX_PLOT_POINTS),
                "Logged estimate (omega_sw)",
                *COLOR_LOGGED_ESTIMATE,
                LINE_WIDTH_EMPHASIS,
            ),
        ];
        let (x_range, y_range) = series_ranges(&series)?;
        let reference_lines = threshold_crossing
            .map(|t| ReferenceLine::Vertical {
                x: t,
                color: *COLOR_MARKER,
                label: format!("Threshold crossed at {t:.4} s"),
            })
            .into_iter()
            .collect();

        Some(PlotConfig {
            title: "Logged speed estimate vs real speed".to_string(),
            x_range,
            y_range,
            series,
            x_label: "Time (s)".to_string(),
            y_label: "Electrical speed (rad/s)".to_string(),
            reference_lines,
        })
    })
}
