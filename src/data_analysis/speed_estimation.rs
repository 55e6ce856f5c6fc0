// src/data_analysis/speed_estimation.rs

use std::f64::consts::FRAC_PI_3;

use crate::constants::{MIN_INTERVAL_S, SECTOR_COUNT};
use crate::types::{SectorTable, SpeedEstimate};

/// Angular displacement assumed for each commutation interval.
#[derive(Debug, Clone, Copy)]
pub enum AngleSource<'a> {
    /// Idealized 60 degree sector (pi/3 rad) for every interval.
    Fixed,
    /// Per-sector table rotated by `shift`.
    Table { table: &'a SectorTable, shift: usize },
}

impl AngleSource<'_> {
    /// Angle in radians for the interval with zero-based ordinal `interval`.
    pub fn angle_rad(&self, interval: usize) -> f64 {
        match self {
            AngleSource::Fixed => FRAC_PI_3,
            AngleSource::Table { table, shift } => table.radians(sector_index(interval, *shift)),
        }
    }
}

/// LUT index used for the interval with zero-based ordinal `interval`.
pub fn sector_index(interval: usize, shift: usize) -> usize {
    (interval + shift) % SECTOR_COUNT
}

/// Converts consecutive edge pairs into speed estimates.
///
/// The interval between `edges[i - 1]` and `edges[i]` uses sector ordinal
/// `i - 1` and is timestamped at `time[edges[i]]`. Intervals shorter than
/// `MIN_INTERVAL_S` are dropped without shifting the sector ordinal of later
/// intervals. Edges that index past the end of `time` end the stream.
pub fn estimate_speed(time: &[f64], edges: &[usize], angle: AngleSource) -> Vec<SpeedEstimate> {
    let mut estimates = Vec::with_capacity(edges.len().saturating_sub(1));

    for i in 1..edges.len() {
        let (prev, curr) = (edges[i - 1], edges[i]);
        let (Some(&t_prev), Some(&t_curr)) = (time.get(prev), time.get(curr)) else {
            break;
        };
        if let Some(estimate) = interval_estimate(t_prev, t_curr, angle.angle_rad(i - 1)) {
            estimates.push(estimate);
        }
    }

    estimates
}

/// Speed estimate where each interval runs from hardware edge `hw[i - 1]` to
/// the software-timed edge `sw[i]`, modelling ISR latency on the closing edge.
/// Only the first `min(hw.len(), sw.len())` edges of each stream are paired.
pub fn estimate_speed_mixed(
    time: &[f64],
    hw_edges: &[usize],
    sw_edges: &[usize],
    angle: AngleSource,
) -> Vec<SpeedEstimate> {
    let n_edges = hw_edges.len().min(sw_edges.len());
    let mut estimates = Vec::with_capacity(n_edges.saturating_sub(1));

    for i in 1..n_edges {
        let (Some(&t_start), Some(&t_end)) = (time.get(hw_edges[i - 1]), time.get(sw_edges[i])) else {
            break;
        };
        if let Some(estimate) = interval_estimate(t_start, t_end, angle.angle_rad(i - 1)) {
            estimates.push(estimate);
        }
    }

    estimates
}

fn interval_estimate(t_start: f64, t_end: f64, angle_rad: f64) -> Option<SpeedEstimate> {
    let dt = t_end - t_start;
    // Also rejects NaN from corrupt timestamps.
    if !(dt >= MIN_INTERVAL_S) {
        return None;
    }
    Some(SpeedEstimate {
        time: t_end,
        speed: angle_rad / dt,
    })
}

/// Splits an estimate stream into plot-ready (time, speed) pairs.
pub fn to_series(estimates: &[SpeedEstimate]) -> Vec<(f64, f64)> {
    estimates.iter().map(|e| (e.time, e.speed)).collect()
}
