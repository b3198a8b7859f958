//! Reference constants for the filter front ends
//!
//! These values define the default cutoff choices and display window.
//! All of them can be overridden through [`crate::config::AppConfig`].

/// Cutoff frequencies offered by the selector, in Hz.
pub const DEFAULT_CUTOFF_CHOICES: [u32; 4] = [300, 500, 1000, 5000];

/// Upper edge of the frequency plot's visible x range in Hz.
/// Data above this frequency is kept in the chart but not shown.
pub const FREQUENCY_DISPLAY_MAX_HZ: f64 = 10_000.0;

