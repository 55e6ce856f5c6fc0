// src/data_input/mod.rs

pub mod csv_loader;
pub mod mat_loader;
pub mod sim_data;

use std::path::Path;

use crate::error::{AnalysisError, Result};
use sim_data::SimulationData;

/// Loads a simulation trace, choosing the reader from the file extension.
pub fn load_simulation(path: &Path) -> Result<SimulationData> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("mat") => mat_loader::load_mat_file(path),
        Some("csv") => csv_loader::load_csv_file(path),
        _ => Err(AnalysisError::UnsupportedFormat(path.to_path_buf())),
    }
}

// src/data_input/mod.rs
