//! Detector configuration.
//!
//! A `DetectorConfig` selects one `DetectionStrategy` and its parameters.
//! It is validated once, when bound to a `Detector`, and never changes after.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, DetectorResult};
use crate::result::DetectionResult;

// ── Strategy ────────────────────────────────────────────────────────────

/// The detection algorithm a detector runs on every observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    /// Current value strictly above a fixed bound.
    Threshold,
    /// Strictly monotonic trend across the whole window.
    Pattern,
    /// Current value far from the window mean, in standard deviations.
    Anomaly,
    /// Large step between the two most recent values.
    Change,
}

impl DetectionStrategy {
    /// Smallest window this strategy can do anything useful with.
    pub fn min_window_size(&self) -> usize {
        match self {
            Self::Threshold => 1,
            Self::Pattern | Self::Anomaly | Self::Change => 2,
        }
    }
}

impl fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Threshold => write!(f, "threshold"),
            Self::Pattern => write!(f, "pattern"),
            Self::Anomaly => write!(f, "anomaly"),
            Self::Change => write!(f, "change"),
        }
    }
}

// ── Notification ────────────────────────────────────────────────────────

/// Callback invoked synchronously with every positive detection.
pub type NotifyHandler = Arc<dyn Fn(&DetectionResult) + Send + Sync>;

// ── Configuration ───────────────────────────────────────────────────────

/// Configuration for a detector.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Which detection algorithm to run.
    pub strategy: DetectionStrategy,
    /// Bound for `Threshold` (required) and absolute delta bound for `Change` (optional).
    pub threshold: Option<f64>,
    /// Capacity of the sliding window. Default: 10.
    pub window_size: usize,
    /// Width of the normal band in standard deviations (`Anomaly`), or the
    /// relative-change limit (`Change` without a threshold). Default: 1.0.
    pub sensitivity: f64,
    /// Maximum retained positive detections. Default: 256.
    pub max_history: usize,
    /// Optional notification callback.
    #[serde(skip)]
    pub notify: Option<NotifyHandler>,
}

impl DetectorConfig {
    /// Configuration for `strategy` with default parameters.
    pub fn new(strategy: DetectionStrategy) -> Self {
        Self {
            strategy,
            threshold: None,
            window_size: crate::DEFAULT_WINDOW_SIZE,
            sensitivity: crate::DEFAULT_SENSITIVITY,
            max_history: crate::DEFAULT_MAX_HISTORY,
            notify: None,
        }
    }

    /// Threshold-crossing detection against `threshold`.
    pub fn threshold(threshold: f64) -> Self {
        Self::new(DetectionStrategy::Threshold).with_threshold(threshold)
    }

    /// Monotonic trend detection over a window of `window_size` values.
    pub fn pattern(window_size: usize) -> Self {
        Self::new(DetectionStrategy::Pattern).with_window_size(window_size)
    }

    /// Statistical anomaly detection.
    pub fn anomaly(window_size: usize, sensitivity: f64) -> Self {
        Self::new(DetectionStrategy::Anomaly)
            .with_window_size(window_size)
            .with_sensitivity(sensitivity)
    }

    /// Relative step-change detection (`sensitivity` is the allowed fraction).
    pub fn change(sensitivity: f64) -> Self {
        Self::new(DetectionStrategy::Change).with_sensitivity(sensitivity)
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// Attach a notification callback.
    pub fn with_notify<F>(mut self, handler: F) -> Self
    where
        F: Fn(&DetectionResult) + Send + Sync + 'static,
    {
        self.notify = Some(Arc::new(handler));
        self
    }

    /// Check that the configuration can drive a detector.
    pub fn validate(&self) -> DetectorResult<()> {
        let min = self.strategy.min_window_size();
        if self.window_size < min {
            return Err(DetectorError::InvalidWindowSize {
                window_size: self.window_size,
                min,
            });
        }

        if !self.sensitivity.is_finite() || self.sensitivity <= 0.0 {
            return Err(DetectorError::InvalidSensitivity(self.sensitivity));
        }

        if self.max_history == 0 {
            return Err(DetectorError::InvalidHistorySize);
        }

        match (self.strategy, self.threshold) {
            (DetectionStrategy::Threshold, None) => {
                return Err(DetectorError::MissingThreshold {
                    strategy: self.strategy,
                })
            }
            (_, Some(t)) if !t.is_finite() => return Err(DetectorError::InvalidThreshold(t)),
            (DetectionStrategy::Change, Some(t)) if t < 0.0 => {
                return Err(DetectorError::InvalidThreshold(t))
            }
            _ => {}
        }

        Ok(())
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// The result is not validated; `Detector::new` does that.
    pub fn from_json_str(json: &str) -> DetectorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> DetectorResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty JSON. The callback is not included.
    pub fn to_json(&self) -> DetectorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new(DetectionStrategy::Threshold)
    }
}

impl fmt::Debug for DetectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorConfig")
            .field("strategy", &self.strategy)
            .field("threshold", &self.threshold)
            .field("window_size", &self.window_size)
            .field("sensitivity", &self.sensitivity)
            .field("max_history", &self.max_history)
            .field("notify", &self.notify.is_some())
            .finish()
    }
}
