// src/config.rs

//! Per-run configuration. Defaults come from `constants.rs`; the CLI overrides
//! them and hands the result to the analysis instead of the analysis reading
//! literals directly.

use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_LUT_DEG, DEFAULT_POLE_PAIRS, DEFAULT_SMOOTHING_ALPHA, DEFAULT_SPEED_THRESHOLD_RAD_S,
    MIN_EDGES_FOR_ANALYSIS, SECTOR_COUNT, TPA_DEFAULT_WINDOW_S, ZOOM_INTERVAL_COUNT,
};
use crate::error::{AnalysisError, Result};
use crate::types::SectorTable;

/// Time window for torque-per-amp statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct TpaWindow {
    pub label: String,
    pub start_s: f64,
    pub duration_s: f64,
}

/// One input trace together with the LUT the model was configured with.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseConfig {
    pub name: String,
    pub input: PathBuf,
    pub lut: SectorTable,
}

impl CaseConfig {
    /// Case named after the input file stem.
    pub fn from_path(input: &Path, lut: SectorTable) -> Self {
        let name = input
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        Self {
            name,
            input: input.to_path_buf(),
            lut,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub cases: Vec<CaseConfig>,
    pub output_dir: PathBuf,
    pub smoothing_alpha: f64,
    pub pole_pairs: u32,
    pub speed_threshold: f64,
    pub min_edges: usize,
    pub zoom_intervals: usize,
    pub tpa_windows: Vec<TpaWindow>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cases: Vec::new(),
            output_dir: PathBuf::from("."),
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            pole_pairs: DEFAULT_POLE_PAIRS,
            speed_threshold: DEFAULT_SPEED_THRESHOLD_RAD_S,
            min_edges: MIN_EDGES_FOR_ANALYSIS,
            zoom_intervals: ZOOM_INTERVAL_COUNT,
            tpa_windows: Vec::new(),
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Run(AnalysisConfig),
    Help,
    Version,
}

pub const USAGE: &str = "\
Usage: hall_lut_analysis [options] <input.mat|input.csv> [[options] <input> ...]

Options:
  --lut d0,d1,d2,d3,d4,d5       LUT in degrees for the inputs that follow
  --lut-rad r0,r1,r2,r3,r4,r5   LUT in radians for the inputs that follow
  --alpha <A>                   Smoothing coefficient, 0 < A <= 1 (default 0.05)
  --output-dir <DIR>            Directory for plots and reports (default .)
  --pole-pairs <N>              Pole pairs for mechanical speed (default 4)
  --speed-threshold <W>         Speed for the crossing-time report (default 600 rad/s)
  --tpa-window <START:DUR[:LABEL]>  Torque-per-amp window, repeatable
  -h, --help                    Show this help
  -V, --version                 Show version";

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| AnalysisError::invalid_config(format!("{flag}: cannot parse '{value}'")))
}

fn parse_table(flag: &str, value: &str) -> Result<[f64; SECTOR_COUNT]> {
    let values: Vec<f64> = value
        .split(',')
        .map(|v| parse_number::<f64>(flag, v))
        .collect::<Result<_>>()?;
    let table: [f64; SECTOR_COUNT] = values.as_slice().try_into().map_err(|_| {
        AnalysisError::invalid_config(format!(
            "{flag}: expected {SECTOR_COUNT} values, got {}",
            values.len()
        ))
    })?;
    if table.iter().any(|a| !a.is_finite() || *a <= 0.0) {
        return Err(AnalysisError::invalid_config(format!("{flag}: angles must be positive")));
    }
    Ok(table)
}

fn parse_tpa_window(value: &str) -> Result<TpaWindow> {
    let mut parts = value.splitn(3, ':');
    let start_s = parse_number::<f64>("--tpa-window", parts.next().unwrap_or(""))?;
    let duration_s = match parts.next() {
        Some(d) => parse_number::<f64>("--tpa-window", d)?,
        None => TPA_DEFAULT_WINDOW_S,
    };
    if duration_s <= 0.0 {
        return Err(AnalysisError::invalid_config("--tpa-window: duration must be positive"));
    }
    let label = parts
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| format!("t={start_s:.3}s"));
    Ok(TpaWindow {
        label,
        start_s,
        duration_s,
    })
}

impl AnalysisConfig {
    /// Parses command-line arguments (without the program name).
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<CliCommand> {
        let mut config = AnalysisConfig::default();
        let mut current_lut = SectorTable::from_degrees(DEFAULT_LUT_DEG);
        let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
        let mut iter = args.iter().copied();

        while let Some(arg) = iter.next() {
            let mut value_for = |flag: &str| {
                iter.next()
                    .ok_or_else(|| AnalysisError::invalid_config(format!("{flag} requires a value")))
            };
            match arg {
                "-h" | "--help" => return Ok(CliCommand::Help),
                "-V" | "--version" => return Ok(CliCommand::Version),
                "--lut" => current_lut = SectorTable::from_degrees(parse_table(arg, value_for(arg)?)?),
                "--lut-rad" => current_lut = SectorTable::from_radians(parse_table(arg, value_for(arg)?)?),
                "--alpha" => config.smoothing_alpha = parse_number(arg, value_for(arg)?)?,
                "--output-dir" => config.output_dir = PathBuf::from(value_for(arg)?),
                "--pole-pairs" => config.pole_pairs = parse_number(arg, value_for(arg)?)?,
                "--speed-threshold" => config.speed_threshold = parse_number(arg, value_for(arg)?)?,
                "--tpa-window" => config.tpa_windows.push(parse_tpa_window(value_for(arg)?)?),
                flag if flag.starts_with('-') => {
                    return Err(AnalysisError::invalid_config(format!("unknown option '{flag}'")));
                }
                input => config.cases.push(CaseConfig::from_path(Path::new(input), current_lut)),
            }
        }

        config.validate()?;
        Ok(CliCommand::Run(config))
    }

    pub fn validate(&self) -> Result<()> {
        if self.cases.is_empty() {
            return Err(AnalysisError::invalid_config("no input files given"));
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(AnalysisError::invalid_config(format!(
                "smoothing alpha must be in (0, 1], got {}",
                self.smoothing_alpha
            )));
        }
        if self.pole_pairs == 0 {
            return Err(AnalysisError::invalid_config("pole pairs must be at least 1"));
        }
        Ok(())
    }

    /// Output path `<output_dir>/<case>_<suffix>`.
    pub fn output_path(&self, case: &CaseConfig, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{}", case.name, suffix))
    }
}
