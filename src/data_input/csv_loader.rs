// src/data_input/csv_loader.rs

use csv::ReaderBuilder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::data_input::sim_data::{
    SimulationData, KEY_BACK_EMF, KEY_HARDWARE_ISR, KEY_OMEGA_R, KEY_OMEGA_R_ALIAS, KEY_OMEGA_SW,
    KEY_PHASE_CURRENT, KEY_SOFTWARE_ISR, KEY_TIME,
};
use crate::error::{AnalysisError, Result};

// Column order of `target_headers` below.
const COL_TIME: usize = 0;
const COL_OMEGA_R: usize = 1;
const COL_HARDWARE_ISR: usize = 2;
const COL_SOFTWARE_ISR: usize = 3;
const COL_OMEGA_SW: usize = 4;
const COL_PHASE_CURRENT: usize = 5;
const COL_BACK_EMF: usize = 6;
const COLUMN_COUNT: usize = 7;

/// Reads a CSV export of a simulation run. The header row names the same
/// signals as the MAT containers (`time`, `omega_r`, `hardware_ISR`, ...).
/// Rows with an unparseable time are skipped; other unparseable cells end
/// that column at the previous row so all columns stay index-aligned.
pub fn load_csv_file(path: &Path) -> Result<SimulationData> {
    if !path.exists() {
        return Err(AnalysisError::MissingFile(path.to_path_buf()));
    }

    let target_headers = [
        KEY_TIME,          // 0
        KEY_OMEGA_R,       // 1
        KEY_HARDWARE_ISR,  // 2
        KEY_SOFTWARE_ISR,  // 3
        KEY_OMEGA_SW,      // 4
        KEY_PHASE_CURRENT, // 5
        KEY_BACK_EMF,      // 6
    ];

    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let header_record = reader.headers()?.clone();
    let header_indices: Vec<Option<usize>> = target_headers
        .iter()
        .enumerate()
        .map(|(i, &target)| {
            header_record.iter().position(|h| {
                let h = h.trim();
                h == target || (i == COL_OMEGA_R && h == KEY_OMEGA_R_ALIAS)
            })
        })
        .collect();

    println!("  Header mapping status:");
    for (name, idx) in target_headers.iter().zip(header_indices.iter()) {
        println!("    '{}': {}", name, if idx.is_some() { "Found" } else { "Not Found" });
    }
    for required in [COL_TIME, COL_OMEGA_R, COL_HARDWARE_ISR] {
        if header_indices[required].is_none() {
            return Err(AnalysisError::missing_array(target_headers[required], path));
        }
    }

    let mut columns: [Vec<f64>; COLUMN_COUNT] = Default::default();
    let mut column_open = [true; COLUMN_COUNT];

    for (row_index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                eprintln!("  Warning: Skipping row {} due to CSV read error: {}", row_index + 1, e);
                continue;
            }
        };

        let parse_f64_by_target_idx = |target_idx: usize| -> Option<f64> {
            header_indices[target_idx]
                .and_then(|csv_idx| record.get(csv_idx))
                .and_then(|val_str| val_str.parse::<f64>().ok())
        };

        if parse_f64_by_target_idx(COL_TIME).is_none() {
            eprintln!("  Warning: Skipping row {} due to missing or invalid 'time'", row_index + 1);
            continue;
        }

        for col in 0..COLUMN_COUNT {
            if !column_open[col] || header_indices[col].is_none() {
                continue;
            }
            match parse_f64_by_target_idx(col) {
                Some(v) => columns[col].push(v),
                None => column_open[col] = false,
            }
        }
    }

    let [time, omega_r, hardware_isr, software_isr, omega_sw, i_a, e_a] = columns;
    println!("  Finished reading {} data rows.", time.len());
    if time.is_empty() {
        return Err(AnalysisError::EmptyArray(KEY_TIME.to_string()));
    }

    let optional = |idx: usize, values: Vec<f64>| header_indices[idx].map(|_| values);
    Ok(SimulationData::aligned(
        time,
        omega_r,
        hardware_isr,
        optional(COL_SOFTWARE_ISR, software_isr),
        optional(COL_OMEGA_SW, omega_sw),
        optional(COL_PHASE_CURRENT, i_a),
        optional(COL_BACK_EMF, e_a),
    ))
}
