// src/plot_functions/mod.rs

pub mod plot_logged_estimate;
pub mod plot_mixed_timing;
pub mod plot_oscillation;
pub mod plot_speed_estimate;

// src/plot_functions/mod.rs
