// src/lib.rs - Library interface for the analysis pipeline and its tests

pub mod analysis;
pub mod config;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod error;
pub mod plot_framework;
pub mod plot_functions;
pub mod report;
pub mod types;

// Git describe string when the build provides one, else the package version.
pub fn crate_version() -> &'static str {
    option_env!("HALL_LUT_ANALYSIS_GIT_DESCRIBE").unwrap_or(env!("CARGO_PKG_VERSION"))
}
