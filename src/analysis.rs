// src/analysis.rs

//! Runs the numeric core over one loaded trace and collects everything the
//! plots and the report need.

use crate::config::{AnalysisConfig, CaseConfig, TpaWindow};
use crate::constants::{SECTOR_COUNT, TPA_DEFAULT_WINDOW_S};
use crate::data_analysis::calibration::{
    compare_tables, ideal_sector_angles, mean_squared_error, search_best_shift, SectorComparison, ShiftSearch,
};
use crate::data_analysis::edge_detection::find_rising_edges;
use crate::data_analysis::fft_utils::dominant_frequency;
use crate::data_analysis::signal_metrics::{
    estimate_sample_rate, estimate_zero_crossing_frequency, first_threshold_crossing, torque_per_amp, TpaStats,
};
use crate::data_analysis::smoothing::smooth_estimates;
use crate::data_analysis::speed_estimation::{estimate_speed, estimate_speed_mixed, AngleSource};
use crate::data_input::sim_data::SimulationData;
use crate::error::{AnalysisError, Result};
use crate::types::{SectorAngles, SectorTable, ShiftErrors, SpeedEstimate};

/// Mixed hardware/software timing estimates, one stream per shift.
#[derive(Debug, Clone)]
pub struct MixedTiming {
    pub software_edges: usize,
    pub estimates: Vec<Vec<SpeedEstimate>>,
    pub errors: ShiftErrors,
}

/// Phase-current frequency from two independent methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyEstimates {
    pub sample_rate_hz: Option<f64>,
    pub zero_crossing_hz: Option<f64>,
    pub fft_peak_hz: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CaseAnalysis {
    pub hardware_edges: Vec<usize>,
    pub fixed: Vec<SpeedEstimate>,
    pub fixed_smoothed: Vec<SpeedEstimate>,
    pub shift_estimates: Vec<Vec<SpeedEstimate>>,
    pub search: ShiftSearch,
    /// Ideal angles indexed by LUT slot for the best shift.
    pub ideal: SectorAngles,
    pub corrected_table: SectorTable,
    pub corrected: Vec<SpeedEstimate>,
    pub corrected_error: Option<f64>,
    pub comparison: Vec<SectorComparison>,
    pub mixed: Option<MixedTiming>,
    /// First time the rotor speed exceeds the configured threshold.
    pub threshold_crossing: Option<f64>,
    pub omega_r_max: Option<f64>,
    pub current_frequency: Option<FrequencyEstimates>,
    pub tpa: Vec<(TpaWindow, TpaStats)>,
}

impl CaseAnalysis {
    /// Estimates for the best LUT shift.
    pub fn best_estimates(&self) -> &[SpeedEstimate] {
        &self.shift_estimates[self.search.best_shift]
    }
}

fn mixed_timing(data: &SimulationData, hardware_edges: &[usize], table: &SectorTable) -> Option<MixedTiming> {
    let software_isr = data.software_isr.as_ref()?;
    let software_edges = find_rising_edges(software_isr);
    if software_edges.len() < 2 {
        println!("  Warning: software_ISR has fewer than 2 edges; mixed timing skipped.");
        return None;
    }

    let mut errors: ShiftErrors = [None; SECTOR_COUNT];
    let estimates: Vec<Vec<SpeedEstimate>> = (0..SECTOR_COUNT)
        .map(|shift| {
            let stream = estimate_speed_mixed(
                &data.time,
                hardware_edges,
                &software_edges,
                AngleSource::Table { table, shift },
            );
            errors[shift] = mean_squared_error(&stream, &data.time, &data.omega_r);
            stream
        })
        .collect();

    Some(MixedTiming {
        software_edges: software_edges.len(),
        estimates,
        errors,
    })
}

fn current_frequency(data: &SimulationData) -> Option<FrequencyEstimates> {
    let i_a = data.i_a.as_ref()?;
    let sample_rate_hz = estimate_sample_rate(&data.time);
    Some(FrequencyEstimates {
        sample_rate_hz,
        zero_crossing_hz: estimate_zero_crossing_frequency(&data.time, i_a),
        fft_peak_hz: sample_rate_hz.and_then(|fs| dominant_frequency(i_a, fs)),
    })
}

/// Configured windows, or the last `TPA_DEFAULT_WINDOW_S` of the trace.
fn tpa_windows(data: &SimulationData, config: &AnalysisConfig) -> Vec<TpaWindow> {
    if !config.tpa_windows.is_empty() {
        return config.tpa_windows.clone();
    }
    match data.time_range() {
        Some((t0, t1)) => vec![TpaWindow {
            label: "final".to_string(),
            start_s: (t1 - TPA_DEFAULT_WINDOW_S).max(t0),
            duration_s: TPA_DEFAULT_WINDOW_S,
        }],
        None => Vec::new(),
    }
}

fn torque_per_amp_windows(data: &SimulationData, config: &AnalysisConfig) -> Vec<(TpaWindow, TpaStats)> {
    let (Some(i_a), Some(e_a)) = (&data.i_a, &data.e_a) else {
        return Vec::new();
    };
    tpa_windows(data, config)
        .into_iter()
        .map(|window| {
            let stats = torque_per_amp(
                &data.time,
                i_a,
                e_a,
                &data.omega_r,
                config.pole_pairs,
                window.start_s,
                window.duration_s,
            );
            (window, stats)
        })
        .collect()
}

/// Full analysis of one case. Fails only when the trace has too few hardware
/// edges or no shift produced a finite error against the rotor speed.
pub fn analyze_case(data: &SimulationData, case: &CaseConfig, config: &AnalysisConfig) -> Result<CaseAnalysis> {
    let hardware_edges = find_rising_edges(&data.hardware_isr);
    println!("  Hardware edges: {}", hardware_edges.len());
    if hardware_edges.len() < config.min_edges {
        return Err(AnalysisError::insufficient_edges(hardware_edges.len(), config.min_edges));
    }

    let fixed = estimate_speed(&data.time, &hardware_edges, AngleSource::Fixed);
    let fixed_smoothed = smooth_estimates(&fixed, config.smoothing_alpha);

    let shift_estimates: Vec<Vec<SpeedEstimate>> = (0..SECTOR_COUNT)
        .map(|shift| {
            estimate_speed(
                &data.time,
                &hardware_edges,
                AngleSource::Table {
                    table: &case.lut,
                    shift,
                },
            )
        })
        .collect();
    let search = search_best_shift(&data.time, &hardware_edges, &case.lut, &data.omega_r)
        .ok_or(AnalysisError::NoFiniteShift { estimates: fixed.len() })?;
    println!("  Best shift: {} (MSE {:.3})", search.best_shift, search.best_error);

    let ideal = ideal_sector_angles(&data.time, &hardware_edges, &data.omega_r, search.best_shift);
    if ideal.iter().any(Option::is_none) {
        println!("  Warning: some sectors had no usable interval; configured angles kept for them.");
    }
    let corrected_table = SectorTable::from_ideal(&ideal, &case.lut);
    let corrected = estimate_speed(
        &data.time,
        &hardware_edges,
        AngleSource::Table {
            table: &corrected_table,
            shift: search.best_shift,
        },
    );
    let corrected_error = mean_squared_error(&corrected, &data.time, &data.omega_r);
    let comparison = compare_tables(&case.lut, &ideal);

    let mixed = mixed_timing(data, &hardware_edges, &case.lut);
    let threshold_crossing =
        first_threshold_crossing(&data.time, &data.omega_r, config.speed_threshold).map(|(_, t)| t);
    let omega_r_max = data.omega_r.iter().copied().filter(|v| v.is_finite()).reduce(f64::max);

    Ok(CaseAnalysis {
        hardware_edges,
        fixed,
        fixed_smoothed,
        shift_estimates,
        search,
        ideal,
        corrected_table,
        corrected,
        corrected_error,
        comparison,
        mixed,
        threshold_crossing,
        omega_r_max,
        current_frequency: current_frequency(data),
        tpa: torque_per_amp_windows(data, config),
    })
}
