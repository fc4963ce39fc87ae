//! Analysis configuration values.
//!
//! Every component takes its thresholds as an explicit immutable value; there
//! is no ambient configuration state anywhere in the crate.

use std::time::Instant;

/// Thresholds and window sizes for labeling a single track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    /// Number of samples in the window ending at the analyzed point.
    pub past_window_size: usize,
    /// Number of samples in the window starting at the analyzed point.
    pub future_window_size: usize,
    /// Maximum mean deviation angle (degrees) for a window to count as straight.
    pub angle_threshold: f64,
    /// Minimum |r| for a regression fit to count as straight.
    pub r_value_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            past_window_size: 30,
            future_window_size: 30,
            angle_threshold: 20.0,
            r_value_threshold: 0.9,
        }
    }
}

impl AnalysisConfig {
    /// Same thresholds with different window sizes, as re-run by the optimizer.
    pub fn with_windows(&self, past: usize, future: usize) -> AnalysisConfig {
        AnalysisConfig {
            past_window_size: past,
            future_window_size: future,
            ..*self
        }
    }
}

/// Grid-search parameters for the threshold optimizer.
#[derive(Debug, Clone, Copy)]
pub struct OptimizerConfig {
    pub r_value_weight: f64,
    pub p_value_weight: f64,
    pub std_error_weight: f64,
    /// Exclusive upper bound of the window-size grid. Both dimensions run over
    /// `{10, 10 + step, ...}` below this limit.
    pub limit: usize,
    pub step: usize,
    /// Optional cutoff for the sequential search; configurations not started
    /// before the deadline are skipped and the partial ranking is returned.
    pub deadline: Option<Instant>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            r_value_weight: 0.6,
            p_value_weight: 0.3,
            std_error_weight: 0.1,
            limit: 100,
            step: 10,
            deadline: None,
        }
    }
}

pub const GRID_ORIGIN: usize = 10;

impl OptimizerConfig {
    /// Window sizes tested along one grid dimension.
    pub fn grid_axis(&self) -> Vec<usize> {
        (GRID_ORIGIN..self.limit).step_by(self.step).collect()
    }
}
