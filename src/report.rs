// src/report.rs

use std::fs;
use std::path::Path;

use crate::analysis::CaseAnalysis;
use crate::config::{AnalysisConfig, CaseConfig};
use crate::constants::SECTOR_COUNT;
use crate::data_input::sim_data::SimulationData;
use crate::error::Result;

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.precision$}"))
}

/// Plain-text summary of one analysed case.
pub fn render_report(
    data: &SimulationData,
    case: &CaseConfig,
    config: &AnalysisConfig,
    analysis: &CaseAnalysis,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("Case: {}", case.name));
    lines.push(format!("Input: {}", case.input.display()));
    lines.push(format!("Samples: {}", data.len()));
    if let Some((t0, t1)) = data.time_range() {
        lines.push(format!("Time span: {t0:.6} s .. {t1:.6} s"));
    }
    lines.push(format!("Hardware edges: {}", analysis.hardware_edges.len()));
    if let Some(mixed) = &analysis.mixed {
        lines.push(format!("Software edges: {}", mixed.software_edges));
    }
    lines.push(format!("Smoothing alpha: {}", config.smoothing_alpha));
    lines.push(String::new());

    lines.push("--- Shift Search ---".to_string());
    lines.push(format!("Configured LUT (deg): {}", case.lut));
    lines.push(format!("LUT sum: {:.3} deg", case.lut.total_deg()));
    lines.push(format!(
        "Best shift: {} (MSE {:.4})",
        analysis.search.best_shift, analysis.search.best_error
    ));
    lines.push(format!("{:>5} | {:>14}", "Shift", "MSE"));
    for shift in 0..SECTOR_COUNT {
        let marker = if shift == analysis.search.best_shift { " *" } else { "" };
        lines.push(format!(
            "{shift:>5} | {:>14}{marker}",
            fmt_opt(analysis.search.errors[shift], 4)
        ));
    }
    if let Some(mixed) = &analysis.mixed {
        lines.push("Mixed timing MSE per shift:".to_string());
        for (shift, error) in mixed.errors.iter().enumerate() {
            lines.push(format!("{shift:>5} | {:>14}", fmt_opt(*error, 4)));
        }
    }
    lines.push(String::new());

    lines.push("--- Sector Table Comparison ---".to_string());
    lines.push(format!(
        "{:>5} | {:>10} | {:>10} | {:>10}",
        "Index", "Configured", "Ideal", "Diff"
    ));
    for row in &analysis.comparison {
        lines.push(format!(
            "{:>5} | {:>10.3} | {:>10} | {:>10}",
            row.index,
            row.configured_deg,
            fmt_opt(row.ideal_deg, 3),
            fmt_opt(row.diff_deg(), 3)
        ));
    }
    let ideal_sum: f64 = analysis.ideal.iter().flatten().sum();
    let ideal_count = analysis.ideal.iter().flatten().count();
    lines.push(format!(
        "Ideal sum: {ideal_sum:.3} deg over {ideal_count} of {SECTOR_COUNT} sectors"
    ));
    lines.push(format!("Corrected LUT (deg): {}", analysis.corrected_table));
    lines.push(format!("Corrected LUT MSE: {}", fmt_opt(analysis.corrected_error, 4)));
    lines.push(String::new());

    lines.push("--- Signal Metrics ---".to_string());
    match analysis.threshold_crossing {
        Some(t) => lines.push(format!(
            "Speed first exceeds {:.1} rad/s at {t:.6} s",
            config.speed_threshold
        )),
        None => lines.push(format!(
            "Speed never exceeds {:.1} rad/s (max {} rad/s)",
            config.speed_threshold,
            fmt_opt(analysis.omega_r_max, 2)
        )),
    }
    match &analysis.current_frequency {
        Some(freq) => {
            lines.push(format!("Sample rate: {} Hz", fmt_opt(freq.sample_rate_hz, 1)));
            lines.push(format!("Phase current frequency (zero crossings): {} Hz", fmt_opt(freq.zero_crossing_hz, 3)));
            lines.push(format!("Phase current frequency (FFT peak): {} Hz", fmt_opt(freq.fft_peak_hz, 3)));
        }
        None => lines.push("Phase current: not available".to_string()),
    }
    if analysis.tpa.is_empty() {
        lines.push("Torque per amp: not available (needs i_a and e_a)".to_string());
    }
    for (window, stats) in &analysis.tpa {
        lines.push(format!(
            "Torque per amp [{}] {:.3} s + {:.3} s: Kt = {:.5} ± {:.5} N*m/A ({} cycles, {} samples)",
            window.label, window.start_s, window.duration_s, stats.kt_mean, stats.kt_std, stats.cycles, stats.samples
        ));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Writes [`render_report`] output to `path`.
pub fn write_report(
    path: &Path,
    data: &SimulationData,
    case: &CaseConfig,
    config: &AnalysisConfig,
    analysis: &CaseAnalysis,
) -> Result<()> {
    fs::write(path, render_report(data, case, config, analysis))?;
    println!("  Report saved as '{}'.", path.display());
    Ok(())
}
