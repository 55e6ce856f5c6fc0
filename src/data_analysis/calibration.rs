// src/data_analysis/calibration.rs

use ndarray::{Array1, ArrayView1};

use crate::constants::{MIN_INTERVAL_S, NOMINAL_SECTOR_DEG, SECTOR_COUNT};
use crate::data_analysis::interpolation::interp_many;
use crate::data_analysis::speed_estimation::{estimate_speed, sector_index, AngleSource};
use crate::types::{SectorAngles, SectorTable, ShiftErrors, SpeedEstimate};

/// Outcome of the brute-force LUT phase-shift search.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftSearch {
    pub best_shift: usize,
    pub best_error: f64,
    /// MSE per shift; `None` where the shift produced no estimates.
    pub errors: ShiftErrors,
}

/// One row of the configured vs reconstructed table comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorComparison {
    pub index: usize,
    pub configured_deg: f64,
    pub ideal_deg: Option<f64>,
    pub nominal_deg: f64,
}

impl SectorComparison {
    pub fn diff_deg(&self) -> Option<f64> {
        self.ideal_deg.map(|ideal| ideal - self.configured_deg)
    }
}

/// Mean squared error between an estimate stream and the reference signal
/// (sampled on `time`) linearly interpolated at the estimate timestamps.
/// Non-finite residuals (NaN samples in the trace) are left out. `None` when
/// no finite residual remains.
pub fn mean_squared_error(estimates: &[SpeedEstimate], time: &[f64], reference: &[f64]) -> Option<f64> {
    if estimates.is_empty() || time.is_empty() || reference.is_empty() {
        return None;
    }
    let timestamps: Vec<f64> = estimates.iter().map(|e| e.time).collect();
    let expected = Array1::from(interp_many(&timestamps, time, reference));
    let actual: Array1<f64> = estimates.iter().map(|e| e.speed).collect();
    let squared: Array1<f64> = (actual - expected)
        .iter()
        .map(|d| d * d)
        .filter(|sq| sq.is_finite())
        .collect();
    squared.mean()
}

/// Evaluates `estimator` for every shift in `0..SECTOR_COUNT` and keeps the
/// first shift with the lowest MSE against `reference`.
pub fn search_best_shift_with<F>(estimator: F, time: &[f64], reference: &[f64]) -> Option<ShiftSearch>
where
    F: Fn(usize) -> Vec<SpeedEstimate>,
{
    let mut errors: ShiftErrors = [None; SECTOR_COUNT];
    let mut best: Option<(usize, f64)> = None;

    for shift in 0..SECTOR_COUNT {
        let estimates = estimator(shift);
        let error = mean_squared_error(&estimates, time, reference);
        errors[shift] = error;
        if let Some(err) = error {
            // Strict comparison keeps the earliest shift on ties.
            if best.map_or(true, |(_, best_err)| err < best_err) {
                best = Some((shift, err));
            }
        }
    }

    best.map(|(best_shift, best_error)| ShiftSearch {
        best_shift,
        best_error,
        errors,
    })
}

/// Finds the LUT rotation whose speed estimate best matches `reference`.
pub fn search_best_shift(
    time: &[f64],
    edges: &[usize],
    table: &SectorTable,
    reference: &[f64],
) -> Option<ShiftSearch> {
    search_best_shift_with(
        |shift| estimate_speed(time, edges, AngleSource::Table { table, shift }),
        time,
        reference,
    )
}

/// Reconstructs the sector widths that would make the LUT estimate match the
/// reference speed exactly.
///
/// For each interval the reference is averaged over samples
/// `edges[i - 1]..=edges[i]`, multiplied by the interval duration and filed
/// under the LUT index the interval uses with `shift`. Sectors that received
/// no interval stay `None`.
pub fn ideal_sector_angles(time: &[f64], edges: &[usize], reference: &[f64], shift: usize) -> SectorAngles {
    let mut sums = [0.0_f64; SECTOR_COUNT];
    let mut counts = [0_usize; SECTOR_COUNT];
    let n = time.len().min(reference.len());

    for i in 1..edges.len() {
        let (prev, curr) = (edges[i - 1], edges[i]);
        if curr >= n || prev > curr {
            break;
        }
        let dt = time[curr] - time[prev];
        if !(dt >= MIN_INTERVAL_S) {
            continue;
        }
        let Some(w_avg) = ArrayView1::from(&reference[prev..=curr]).mean().filter(|w| w.is_finite()) else {
            continue;
        };
        let sector = sector_index(i - 1, shift);
        sums[sector] += (w_avg * dt).to_degrees();
        counts[sector] += 1;
    }

    let mut ideal: SectorAngles = [None; SECTOR_COUNT];
    for sector in 0..SECTOR_COUNT {
        if counts[sector] > 0 {
            ideal[sector] = Some(sums[sector] / counts[sector] as f64);
        }
    }
    ideal
}

/// Pairs each configured LUT entry with its reconstructed ideal value.
pub fn compare_tables(configured: &SectorTable, ideal: &SectorAngles) -> Vec<SectorComparison> {
    (0..SECTOR_COUNT)
        .map(|index| SectorComparison {
            index,
            configured_deg: configured[index],
            ideal_deg: ideal[index],
            nominal_deg: NOMINAL_SECTOR_DEG,
        })
        .collect()
}
