//! Point-in-time summary of a detector's activity.

use serde::{Deserialize, Serialize};

use crate::config::DetectionStrategy;

/// Aggregate counters and current window statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub strategy: DetectionStrategy,
    /// Observations accepted since construction or the last reset.
    pub total_observations: u64,
    /// Observations that triggered a detection.
    pub detections: u64,
    /// `detections / total_observations`, 0.0 before any observation.
    pub detection_rate: f64,
    /// Mean confidence over all evaluated observations.
    pub average_confidence: f64,
    /// Values currently buffered.
    pub window_len: usize,
    /// Window mean, if at least one value is buffered.
    pub window_mean: Option<f64>,
    /// Window standard deviation, if at least two values are buffered.
    pub window_std_dev: Option<f64>,
    /// Notification callbacks that panicked.
    pub notify_failures: u64,
}

impl Statistics {
    /// Whether any observation has been recorded.
    pub fn has_observations(&self) -> bool {
        self.total_observations > 0
    }
}

/// `numerator / denominator`, or 0.0 for an empty denominator.
pub(crate) fn ratio(numerator: f64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}
