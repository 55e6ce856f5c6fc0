// src/constants.rs

// Import specific colors needed
use plotters::style::colors::full_palette::{BLUE, GREEN, GREY, ORANGE, RED};
use plotters::style::colors::BLACK;
use plotters::style::RGBColor;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1920;
pub const PLOT_HEIGHT: u32 = 1440;

// --- Hall edge / speed estimation ---
pub const SECTOR_COUNT: usize = 6;
pub const EDGE_THRESHOLD: f64 = 0.5; // low <= threshold < high
pub const MIN_INTERVAL_S: f64 = 1e-6; // Shorter intervals are duplicate-edge jitter
pub const NOMINAL_SECTOR_DEG: f64 = 60.0;
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.05;
pub const MIN_EDGES_FOR_ANALYSIS: usize = 10;

// Default LUT (degrees) measured on the reference motor.
pub const DEFAULT_LUT_DEG: [f64; SECTOR_COUNT] = [55.998, 57.995, 65.991, 55.998, 57.994, 65.990];

// --- Signal metrics ---
pub const DEFAULT_POLE_PAIRS: u32 = 4;
pub const DEFAULT_SPEED_THRESHOLD_RAD_S: f64 = 600.0;
pub const MIN_MECH_SPEED_RAD_S: f64 = 1e-3;
pub const MIN_RMS_CURRENT_A: f64 = 0.01;
pub const TPA_MIN_WINDOW_SAMPLES: usize = 100;
pub const TPA_MIN_CYCLE_SAMPLES: usize = 5;
pub const TPA_MIN_CYCLE_FREQ_HZ: f64 = 5.0;
pub const TPA_DEFAULT_WINDOW_S: f64 = 0.2;
pub const PHASE_POWER_FACTOR: f64 = 3.0; // Three-phase power from one phase

// --- Oscillation plot ---
pub const ZOOM_INTERVAL_COUNT: usize = 60; // ~10 electrical revolutions
pub const ZOOM_Y_MARGIN_FRACTION: f64 = 0.05; // of the zoomed value span
pub const MAX_PLOT_POINTS: usize = 20_000; // Raw traces are decimated to this many points

// --- Font sizes ---
pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 20;
pub const FONT_SIZE_AXIS_LABEL: i32 = 15;
pub const FONT_SIZE_LEGEND: i32 = 14;
pub const FONT_SIZE_MESSAGE: i32 = 20;

// --- Plot Color Assignments ---
pub const COLOR_REAL_SPEED: &RGBColor = &RGBColor(150, 150, 150);
pub const COLOR_FIXED_BENCHMARK: &RGBColor = &BLUE;
pub const COLOR_BEST_SHIFT: &RGBColor = &RED;
pub const COLOR_CONFIGURED_LUT: &RGBColor = &RED;
pub const COLOR_IDEAL_LUT: &RGBColor = &GREEN;
pub const COLOR_NOMINAL_SECTOR: &RGBColor = &GREY;
pub const COLOR_LOGGED_ESTIMATE: &RGBColor = &ORANGE;
pub const COLOR_MARKER: &RGBColor = &BLACK;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 1;
pub const LINE_WIDTH_EMPHASIS: u32 = 2;
pub const LINE_WIDTH_REFERENCE: u32 = 4;
pub const LINE_WIDTH_LEGEND: u32 = 2;

// src/constants.rs
