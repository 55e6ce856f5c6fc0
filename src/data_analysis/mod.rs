// src/data_analysis/mod.rs

pub mod calibration;
pub mod edge_detection;
pub mod fft_utils;
pub mod interpolation;
pub mod signal_metrics;
pub mod smoothing;
pub mod speed_estimation;

// src/data_analysis/mod.rs
