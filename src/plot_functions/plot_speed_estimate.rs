// src/plot_functions/plot_speed_estimate.rs

use std::error::Error;

use crate::analysis::CaseAnalysis;
use crate::config::CaseConfig;
use crate::constants::{
    COLOR_BEST_SHIFT, COLOR_CONFIGURED_LUT, COLOR_FIXED_BENCHMARK, COLOR_IDEAL_LUT, COLOR_NOMINAL_SECTOR,
    COLOR_REAL_SPEED, LINE_WIDTH_EMPHASIS, LINE_WIDTH_PLOT, LINE_WIDTH_REFERENCE, MAX_PLOT_POINTS,
    NOMINAL_SECTOR_DEG, SECTOR_COUNT,
};
use crate::data_analysis::speed_estimation::to_series;
use crate::data_input::sim_data::SimulationData;
use crate::plot_framework::{
    calculate_range, draw_stacked_plot, finite_bounds, palette_color, sampled_series, series_ranges, step_post,
    Marker, PlotConfig, PlotSeries, ReferenceLine,
};

fn speed_panel(data: &SimulationData, analysis: &CaseAnalysis) -> Option<PlotConfig> {
    let mut series = vec![PlotSeries::line(
        sampled_series(&data.time, &data.omega_r, MAX_PLOT_POINTS),
        "Real speed",
        *COLOR_REAL_SPEED,
        LINE_WIDTH_REFERENCE,
    )];
    series.push(PlotSeries::line(
        to_series(&analysis.fixed_smoothed),
        "Fixed 60° (smoothed)",
        *COLOR_FIXED_BENCHMARK,
        LINE_WIDTH_EMPHASIS,
    ));

    for (shift, estimates) in analysis.shift_estimates.iter().enumerate() {
        let mse = analysis.search.errors[shift].map_or_else(|| "n/a".to_string(), |e| format!("{e:.1}"));
        series.push(
            PlotSeries::line(
                step_post(&to_series(estimates)),
                format!("Shift {shift} (MSE {mse})"),
                palette_color(shift, SECTOR_COUNT),
                LINE_WIDTH_PLOT,
            )
            .with_opacity(0.5),
        );
    }

    series.push(PlotSeries::line(
        step_post(&to_series(analysis.best_estimates())),
        format!("Best shift {}", analysis.search.best_shift),
        *COLOR_BEST_SHIFT,
        LINE_WIDTH_EMPHASIS,
    ));

    let (x_range, y_range) = series_ranges(&series)?;
    Some(PlotConfig {
        title: "Speed estimate: LUT shifts vs real speed".to_string(),
        x_range,
        y_range,
        series,
        x_label: "Time (s)".to_string(),
        y_label: "Electrical speed (rad/s)".to_string(),
        reference_lines: Vec::new(),
    })
}

fn lut_panel(case: &CaseConfig, analysis: &CaseAnalysis) -> Option<PlotConfig> {
    let configured: Vec<(f64, f64)> = analysis
        .comparison
        .iter()
        .map(|row| (row.index as f64, row.configured_deg))
        .collect();
    let ideal: Vec<(f64, f64)> = analysis
        .comparison
        .iter()
        .filter_map(|row| row.ideal_deg.map(|deg| (row.index as f64, deg)))
        .collect();

    let (y_min, y_max) = finite_bounds(
        configured
            .iter()
            .chain(ideal.iter())
            .map(|p| p.1)
            .chain(std::iter::once(NOMINAL_SECTOR_DEG)),
    )?;
    let (y_lo, y_hi) = calculate_range(y_min, y_max);

    Some(PlotConfig {
        title: format!("Sector angles: {} vs ideal (shift {})", case.lut, analysis.search.best_shift),
        x_range: -0.5..(SECTOR_COUNT as f64 - 0.5),
        y_range: y_lo..y_hi,
        series: vec![
            PlotSeries::line(configured, "Configured LUT", *COLOR_CONFIGURED_LUT, LINE_WIDTH_EMPHASIS)
                .with_marker(Marker::Circle),
            PlotSeries::line(ideal, "Ideal (aligned)", *COLOR_IDEAL_LUT, LINE_WIDTH_EMPHASIS)
                .with_marker(Marker::Cross),
        ],
        x_label: "LUT index".to_string(),
        y_label: "Angle (deg)".to_string(),
        reference_lines: vec![ReferenceLine::Horizontal {
            y: NOMINAL_SECTOR_DEG,
            color: *COLOR_NOMINAL_SECTOR,
            label: "Nominal 60°".to_string(),
        }],
    })
}

/// Speed traces for every LUT shift against the real speed, plus the sector
/// table comparison.
pub fn plot_speed_estimate(
    data: &SimulationData,
    case: &CaseConfig,
    analysis: &CaseAnalysis,
    output_file: &str,
) -> Result<(), Box<dyn Error>> {
    draw_stacked_plot(
        output_file,
        &case.name,
        "Speed estimate",
        &["Speed", "Sector table"],
        |panel_index| match panel_index {
            0 => speed_panel(data, analysis),
            _ => lut_panel(case, analysis),
        },
    )
}
