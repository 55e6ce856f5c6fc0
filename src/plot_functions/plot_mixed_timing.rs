// src/plot_functions/plot_mixed_timing.rs

use std::error::Error;

use crate::analysis::MixedTiming;
use crate::config::CaseConfig;
use crate::constants::{COLOR_REAL_SPEED, LINE_WIDTH_PLOT, LINE_WIDTH_REFERENCE, MAX_PLOT_POINTS, SECTOR_COUNT};
use crate::data_analysis::speed_estimation::to_series;
use crate::data_input::sim_data::SimulationData;
use crate::plot_framework::{
    draw_stacked_plot, palette_color, sampled_series, series_ranges, step_post, PlotConfig, PlotSeries,
};

/// Hardware-to-software edge estimates for every LUT shift against the real
/// speed. MSE per shift goes into the legend.
pub fn plot_mixed_timing(
    data: &SimulationData,
    case: &CaseConfig,
    mixed: &MixedTiming,
    output_file: &str,
) -> Result<(), Box<dyn Error>> {
    draw_stacked_plot(output_file, &case.name, "Mixed timing", &["Mixed timing"], |_| {
        let mut series = vec![PlotSeries::line(
            sampled_series(&data.time, &data.omega_r, MAX_PLOT_POINTS),
            "Real speed",
            *COLOR_REAL_SPEED,
            LINE_WIDTH_REFERENCE,
        )];
        for (shift, estimates) in mixed.estimates.iter().enumerate() {
            let label = match mixed.errors[shift] {
                Some(mse) => format!("Shift {shift}: MSE = {mse:.2}"),
                None => format!("Shift {shift}: no estimates"),
            };
            series.push(PlotSeries::line(
                step_post(&to_series(estimates)),
                label,
                palette_color(shift, SECTOR_COUNT),
                LINE_WIDTH_PLOT,
            ));
        }

        let (x_range, y_range) = series_ranges(&series)?;
        Some(PlotConfig {
            title: format!("Mixed timing (hardware -> software edge), LUT {}", case.lut),
            x_range,
            y_range,
            series,
            x_label: "Time (s)".to_string(),
            y_label: "Electrical speed (rad/s)".to_string(),
            reference_lines: Vec::new(),
        })
    })
}
