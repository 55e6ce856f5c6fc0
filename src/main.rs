// src/main.rs

use std::env;
use std::error::Error;
use std::fs;

use hall_lut_analysis::analysis::{analyze_case, CaseAnalysis};
use hall_lut_analysis::config::{AnalysisConfig, CaseConfig, CliCommand, USAGE};
use hall_lut_analysis::crate_version;
use hall_lut_analysis::data_input::load_simulation;
use hall_lut_analysis::data_input::sim_data::SimulationData;
use hall_lut_analysis::plot_functions::plot_logged_estimate::plot_logged_estimate;
use hall_lut_analysis::plot_functions::plot_mixed_timing::plot_mixed_timing;
use hall_lut_analysis::plot_functions::plot_oscillation::plot_oscillation;
use hall_lut_analysis::plot_functions::plot_speed_estimate::plot_speed_estimate;
use hall_lut_analysis::report::write_report;

/// Renders every plot the case has data for. A failing plot is reported and
/// the remaining plots are still attempted.
fn generate_plots(data: &SimulationData, case: &CaseConfig, config: &AnalysisConfig, analysis: &CaseAnalysis) {
    let output = |suffix: &str| config.output_path(case, suffix).to_string_lossy().into_owned();

    println!("\n--- Generating Speed Estimate Plot ---");
    if let Err(e) = plot_speed_estimate(data, case, analysis, &output("speed_estimate.png")) {
        eprintln!("  Error generating speed estimate plot: {e}");
    }

    println!("\n--- Generating Oscillation Plot ---");
    if let Err(e) = plot_oscillation(data, case, analysis, config.zoom_intervals, &output("oscillation.png")) {
        eprintln!("  Error generating oscillation plot: {e}");
    }

    println!("\n--- Generating Mixed Timing Plot ---");
    match &analysis.mixed {
        Some(mixed) => {
            if let Err(e) = plot_mixed_timing(data, case, mixed, &output("mixed_timing.png")) {
                eprintln!("  Error generating mixed timing plot: {e}");
            }
        }
        None => println!("  Skipping Mixed Timing Plot: software_ISR not available."),
    }

    println!("\n--- Generating Logged Estimate Plot ---");
    match &data.omega_sw {
        Some(omega_sw) => {
            let result = plot_logged_estimate(
                data,
                omega_sw,
                case,
                analysis.threshold_crossing,
                &output("logged_estimate.png"),
            );
            if let Err(e) = result {
                eprintln!("  Error generating logged estimate plot: {e}");
            }
        }
        None => println!("  Skipping Logged Estimate Plot: omega_sw not available."),
    }
}

fn process_case(case: &CaseConfig, config: &AnalysisConfig) -> Result<(), Box<dyn Error>> {
    println!("\n=== Case '{}' ({}) ===", case.name, case.input.display());
    println!("\n--- Loading Simulation Data ---");
    let data = load_simulation(&case.input)?;
    println!("  Loaded {} samples.", data.len());

    println!("\n--- Estimating Speed ---");
    let analysis = analyze_case(&data, case, config)?;

    generate_plots(&data, case, config, &analysis);

    println!("\n--- Writing Report ---");
    write_report(&config.output_path(case, "report.txt"), &data, case, config, &analysis)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // --- Argument Parsing ---
    let args: Vec<String> = env::args().skip(1).collect();
    let config = match AnalysisConfig::from_args(&args) {
        Ok(CliCommand::Run(config)) => config,
        Ok(CliCommand::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Ok(CliCommand::Version) => {
            println!("hall_lut_analysis {}", crate_version());
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {e}\n\n{USAGE}");
            std::process::exit(1);
        }
    };

    fs::create_dir_all(&config.output_dir)?;

    let mut failed = 0;
    for case in &config.cases {
        if let Err(e) = process_case(case, &config) {
            eprintln!("  Skipping case '{}': {e}", case.name);
            failed += 1;
        }
    }

    println!(
        "\nProcessed {} case(s), {} skipped. Output in '{}'.",
        config.cases.len(),
        failed,
        config.output_dir.display()
    );
    Ok(())
}
