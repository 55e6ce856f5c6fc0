// src/types.rs

use std::fmt;
use std::ops::Index;

use crate::constants::{NOMINAL_SECTOR_DEG, SECTOR_COUNT};

/// One speed sample produced at the closing edge of a commutation interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedEstimate {
    pub time: f64,  // Closing edge time (s)
    pub speed: f64, // Electrical angular speed (rad/s)
}

/// Per-sector angular widths of one electrical revolution, in degrees.
///
/// The table always has exactly [`SECTOR_COUNT`] entries, so the shift search
/// over it stays bounded. Values are expected to be positive and to sum to
/// roughly 360 degrees; neither is enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorTable {
    angles_deg: [f64; SECTOR_COUNT],
}

impl SectorTable {
    pub const fn from_degrees(angles_deg: [f64; SECTOR_COUNT]) -> Self {
        Self { angles_deg }
    }

    pub fn from_radians(angles_rad: [f64; SECTOR_COUNT]) -> Self {
        Self {
            angles_deg: angles_rad.map(f64::to_degrees),
        }
    }

    /// Idealized table with every sector at 60 degrees.
    pub const fn nominal() -> Self {
        Self::from_degrees([NOMINAL_SECTOR_DEG; SECTOR_COUNT])
    }

    /// Builds a table from reconstructed ideal angles, keeping `fallback`
    /// entries for sectors that had no usable interval.
    pub fn from_ideal(ideal: &[Option<f64>; SECTOR_COUNT], fallback: &SectorTable) -> Self {
        let mut angles_deg = fallback.angles_deg;
        for (slot, value) in angles_deg.iter_mut().zip(ideal.iter()) {
            if let Some(v) = value {
                *slot = *v;
            }
        }
        Self { angles_deg }
    }

    pub fn degrees(&self) -> &[f64; SECTOR_COUNT] {
        &self.angles_deg
    }

    pub fn radians(&self, sector: usize) -> f64 {
        self.angles_deg[sector % SECTOR_COUNT].to_radians()
    }

    pub fn total_deg(&self) -> f64 {
        self.angles_deg.iter().sum()
    }
}

impl Default for SectorTable {
    fn default() -> Self {
        Self::nominal()
    }
}

impl Index<usize> for SectorTable {
    type Output = f64;

    fn index(&self, sector: usize) -> &f64 {
        &self.angles_deg[sector]
    }
}

impl fmt::Display for SectorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.angles_deg.iter().map(|a| format!("{a:.3}")).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

// Per-sector results, `None` where a sector had no data
pub type SectorAngles = [Option<f64>; SECTOR_COUNT];
pub type ShiftErrors = [Option<f64>; SECTOR_COUNT];
