// src/data_input/mat_loader.rs

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use matfile::{MatFile, NumericData};

use crate::data_input::sim_data::{
    SimulationData, KEY_BACK_EMF, KEY_HARDWARE_ISR, KEY_OMEGA_R, KEY_OMEGA_R_ALIAS, KEY_OMEGA_SW,
    KEY_PHASE_CURRENT, KEY_SOFTWARE_ISR, KEY_TIME,
};
use crate::error::{AnalysisError, Result};

/// Flattens any numeric MAT array (real part) into `f64` samples.
/// Logical arrays are stored as `uint8` and come out as 0.0 / 1.0.
fn numeric_to_f64(data: &NumericData) -> Vec<f64> {
    match data {
        NumericData::Double { real, .. } => real.clone(),
        NumericData::Single { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::Int8 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::UInt8 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::Int16 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::UInt16 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::Int32 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::UInt32 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::Int64 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::UInt64 { real, .. } => real.iter().map(|&v| v as f64).collect(),
    }
}

fn find_array(mat: &MatFile, name: &str) -> Option<Vec<f64>> {
    mat.find_by_name(name).map(|array| numeric_to_f64(array.data()))
}

fn require_array(mat: &MatFile, name: &str, path: &Path) -> Result<Vec<f64>> {
    let values = find_array(mat, name).ok_or_else(|| AnalysisError::missing_array(name, path))?;
    if values.is_empty() {
        return Err(AnalysisError::EmptyArray(name.to_string()));
    }
    Ok(values)
}

/// Reads a MAT level-5 simulation output file.
///
/// Requires `time`, `omega_r` (or `rotor_speed`) and `hardware_ISR`; the
/// remaining signals are picked up when present. Multi-dimensional arrays are
/// flattened in storage order.
pub fn load_mat_file(path: &Path) -> Result<SimulationData> {
    if !path.exists() {
        return Err(AnalysisError::MissingFile(path.to_path_buf()));
    }
    let reader = BufReader::new(File::open(path)?);
    let mat = MatFile::parse(reader).map_err(|e| AnalysisError::MatParse(format!("{e:?}")))?;

    let names: Vec<&str> = mat.arrays().iter().map(|a| a.name()).collect();
    println!("  Arrays found in MAT file: {:?}", names);

    let time = require_array(&mat, KEY_TIME, path)?;
    let omega_r = match find_array(&mat, KEY_OMEGA_R) {
        Some(values) => values,
        None => require_array(&mat, KEY_OMEGA_R_ALIAS, path)
            .map_err(|_| AnalysisError::missing_array(KEY_OMEGA_R, path))?,
    };
    let hardware_isr = require_array(&mat, KEY_HARDWARE_ISR, path)?;

    Ok(SimulationData::aligned(
        time,
        omega_r,
        hardware_isr,
        find_array(&mat, KEY_SOFTWARE_ISR),
        find_array(&mat, KEY_OMEGA_SW),
        find_array(&mat, KEY_PHASE_CURRENT),
        find_array(&mat, KEY_BACK_EMF),
    ))
}
