// tests/speed_estimation_test.rs

use approx::{assert_abs_diff_eq, assert_relative_eq};
use std::f64::consts::FRAC_PI_3;
use std::io::Write;

use hall_lut_analysis::analysis::analyze_case;
use hall_lut_analysis::config::{AnalysisConfig, CaseConfig};
use hall_lut_analysis::data_analysis::calibration::{ideal_sector_angles, search_best_shift};
use hall_lut_analysis::data_analysis::edge_detection::find_rising_edges;
use hall_lut_analysis::data_analysis::smoothing::exponential_smooth;
use hall_lut_analysis::data_analysis::speed_estimation::{estimate_speed, AngleSource};
use hall_lut_analysis::data_input::load_simulation;
use hall_lut_analysis::error::AnalysisError;
use hall_lut_analysis::report::render_report;
use hall_lut_analysis::types::SectorTable;

const SAMPLE_DT: f64 = 1e-5;
const SPEED_DEG_PER_S: f64 = 1e5; // One degree per sample

/// Trace of a rotor turning at constant speed past sectors of the given
/// physical widths (whole degrees), with physical sector `(k + shift) % 6`
/// crossed during interval `k`.
struct PlantedTrace {
    time: Vec<f64>,
    isr: Vec<f64>,
    omega: Vec<f64>,
}

fn planted_trace(physical_deg: [usize; 6], shift: usize, revolutions: usize) -> PlantedTrace {
    let mut edges = vec![10_usize];
    for k in 0..revolutions * 6 {
        let last = *edges.last().unwrap();
        edges.push(last + physical_deg[(k + shift) % 6]);
    }
    let n = edges.last().unwrap() + 10;
    let mut isr = vec![0.0; n];
    for &e in &edges {
        isr[e] = 1.0;
    }
    PlantedTrace {
        time: (0..n).map(|i| i as f64 * SAMPLE_DT).collect(),
        isr,
        omega: vec![SPEED_DEG_PER_S.to_radians(); n],
    }
}

#[test]
fn test_edge_detector_transitions() {
    assert_eq!(find_rising_edges(&[0.0, 1.0, 1.0, 0.0, 1.0]), vec![1, 4]);
    assert_eq!(find_rising_edges(&[0.5, 0.51]), vec![1]);
    assert!(find_rising_edges(&[1.0, 1.0, 1.0]).is_empty());
    assert!(find_rising_edges(&[]).is_empty());
}

#[test]
fn test_end_to_end_two_edges() {
    let time = [0.0, 0.001, 0.002, 0.003, 0.004];
    let edges = find_rising_edges(&[0.0, 1.0, 0.0, 1.0, 0.0]);
    assert_eq!(edges, vec![1, 3]);

    let estimates = estimate_speed(&time, &edges, AngleSource::Fixed);
    assert_eq!(estimates.len(), 1);
    assert_relative_eq!(estimates[0].time, 0.003);
    assert_relative_eq!(estimates[0].speed, 523.5987755982989, max_relative = 1e-9);
}

#[test]
fn test_uniform_spacing_yields_equal_speeds() {
    let time: Vec<f64> = (0..101).map(|i| i as f64 * 1e-4).collect();
    let edges: Vec<usize> = (0..=10).map(|k| k * 10).collect();
    let estimates = estimate_speed(&time, &edges, AngleSource::Fixed);
    assert_eq!(estimates.len(), 10);
    for e in &estimates {
        assert_relative_eq!(e.speed, FRAC_PI_3 / 1e-3, max_relative = 1e-9);
    }
}

#[test]
fn test_smoothing_identity_and_convergence() {
    let values = [3.0, -1.0, 7.5, 2.0];
    assert_eq!(exponential_smooth(&values, 1.0), values.to_vec());

    let constant = exponential_smooth(&[42.0; 50], 0.05);
    assert!(constant.iter().all(|v| (*v - 42.0).abs() < 1e-12));
}

#[test]
fn test_planted_shift_is_recovered() {
    let physical = [50, 55, 60, 65, 70, 60];
    let trace = planted_trace(physical, 3, 5);
    let edges = find_rising_edges(&trace.isr);
    assert_eq!(edges.len(), 31);

    let table = SectorTable::from_degrees(physical.map(|d| d as f64));
    let search = search_best_shift(&trace.time, &edges, &table, &trace.omega).unwrap();
    assert_eq!(search.best_shift, 3);
    assert_abs_diff_eq!(search.best_error, 0.0, epsilon = 1e-6);
    for (shift, error) in search.errors.iter().enumerate() {
        if shift != 3 {
            assert!(error.unwrap() > 1.0, "shift {shift} should not fit");
        }
    }
}

#[test]
fn test_uniform_table_ties_resolve_to_first_shift() {
    // Every rotation of a uniform table is the same table, so all shifts fit
    // equally well and the earliest one is kept.
    let trace = planted_trace([60; 6], 3, 5);
    let edges = find_rising_edges(&trace.isr);
    let search = search_best_shift(&trace.time, &edges, &SectorTable::nominal(), &trace.omega).unwrap();
    assert_eq!(search.best_shift, 0);
    let first = search.errors[0].unwrap();
    assert!(search.errors.iter().all(|e| *e == Some(first)));
}

#[test]
fn test_ideal_angles_recover_physical_table() {
    let physical = [50, 55, 60, 65, 70, 60];
    let trace = planted_trace(physical, 3, 4);
    let edges = find_rising_edges(&trace.isr);

    let ideal = ideal_sector_angles(&trace.time, &edges, &trace.omega, 3);
    for (sector, angle) in ideal.iter().enumerate() {
        assert_relative_eq!(angle.unwrap(), physical[sector] as f64, max_relative = 1e-6);
    }
}

#[test]
fn test_analysis_corrects_misconfigured_table() {
    let physical = [50, 55, 60, 65, 70, 60];
    let trace = planted_trace(physical, 3, 6);
    let data = hall_lut_analysis::data_input::sim_data::SimulationData::aligned(
        trace.time,
        trace.omega,
        trace.isr,
        None,
        None,
        None,
        None,
    );
    let configured = SectorTable::from_degrees([52.0, 56.0, 61.0, 63.0, 68.0, 60.0]);
    let case = CaseConfig::from_path(std::path::Path::new("planted.mat"), configured);
    let analysis = analyze_case(&data, &case, &AnalysisConfig::default()).unwrap();

    assert_eq!(analysis.search.best_shift, 3);
    let corrected_error = analysis.corrected_error.unwrap();
    assert!(corrected_error < analysis.search.best_error);
    assert_abs_diff_eq!(corrected_error, 0.0, epsilon = 1e-6);
}

#[test]
fn test_csv_trace_through_full_pipeline() {
    let mut csv = String::from("time,omega_r,hardware_ISR,software_ISR\n");
    let omega = FRAC_PI_3 / 1e-3;
    for i in 0..=200 {
        let hw = if i > 0 && i % 10 == 0 { 1 } else { 0 };
        let sw = if i > 2 && (i - 2) % 10 == 0 { 1 } else { 0 };
        csv.push_str(&format!("{},{},{},{}\n", i as f64 * 1e-4, omega, hw, sw));
    }
    let path = std::env::temp_dir().join(format!("hall_lut_pipeline_{}.csv", std::process::id()));
    std::fs::File::create(&path).unwrap().write_all(csv.as_bytes()).unwrap();

    let data = load_simulation(&path).unwrap();
    let case = CaseConfig::from_path(&path, SectorTable::nominal());
    let config = AnalysisConfig::default();
    let analysis = analyze_case(&data, &case, &config).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(analysis.hardware_edges.len(), 20);
    let mixed = analysis.mixed.as_ref().unwrap();
    assert_eq!(mixed.software_edges, 19);
    // hw[i-1] -> sw[i] spans 12 samples.
    assert_relative_eq!(mixed.estimates[0][0].speed, FRAC_PI_3 / 1.2e-3, max_relative = 1e-6);

    let report = render_report(&data, &case, &config, &analysis);
    assert!(report.contains("Software edges: 19"));
    assert!(report.contains("Mixed timing MSE per shift:"));
}

/// CSV trace at constant speed with the `time` cell of `nan_row` set to NaN.
fn write_trace_with_nan_time(nan_row: usize) -> std::path::PathBuf {
    let mut csv = String::from("time,omega_r,hardware_ISR\n");
    let omega = FRAC_PI_3 / 1e-3;
    for i in 0..=200 {
        let hw = if i > 0 && i % 10 == 0 { 1 } else { 0 };
        let time = if i == nan_row { "NaN".to_string() } else { (i as f64 * 1e-4).to_string() };
        csv.push_str(&format!("{time},{omega},{hw}\n"));
    }
    let path = std::env::temp_dir().join(format!("hall_lut_nan_{}_{}.csv", nan_row, std::process::id()));
    std::fs::File::create(&path).unwrap().write_all(csv.as_bytes()).unwrap();
    path
}

#[test]
fn test_nan_time_in_csv_does_not_abort_case() {
    // Row 20 closes an interval, row 10 opens the first one.
    for nan_row in [20, 10] {
        let path = write_trace_with_nan_time(nan_row);
        let data = load_simulation(&path).unwrap();
        let case = CaseConfig::from_path(&path, SectorTable::nominal());
        let result = analyze_case(&data, &case, &AnalysisConfig::default());
        std::fs::remove_file(&path).ok();

        let analysis = result.unwrap();
        assert_eq!(analysis.hardware_edges.len(), 20);
        assert!(analysis.fixed.iter().all(|e| e.time.is_finite()));
        assert_eq!(analysis.search.best_shift, 0);
        assert_abs_diff_eq!(analysis.search.best_error, 0.0, epsilon = 1e-6);
    }
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let err = load_simulation(std::path::Path::new("trace.txt")).unwrap_err();
    assert!(matches!(err, AnalysisError::UnsupportedFormat(_)));
}
