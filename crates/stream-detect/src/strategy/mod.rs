//! Detection strategies.
//!
//! Each strategy is a pure function of its parameters and the current
//! window contents. `Rule` resolves a validated `DetectorConfig` into the
//! parameters one strategy needs, so evaluation never deals with missing
//! options.
//!
//! ```text
//!   SlidingWindow (newest value last)
//!       │
//!       ├──► Threshold  value > T
//!       ├──► Pattern    every buffered pair strictly up / down
//!       ├──► Anomaly    |value - mean| > sensitivity * σ
//!       └──► Change     |value - previous| over an absolute or relative limit
//!             │
//!             ▼
//!       Evaluation { detected, confidence, metadata }
//! ```

pub mod anomaly;
pub mod change;
pub mod pattern;
pub mod threshold;

use serde_json::Value;

use crate::config::{DetectionStrategy, DetectorConfig};
use crate::error::{DetectorError, DetectorResult};
use crate::result::Metadata;
use crate::window::SlidingWindow;

pub use change::ChangeLimit;

/// Floor for divisors in confidence formulas.
pub const EPSILON: f64 = 1e-9;

/// Strategy output before it is stamped into a `DetectionResult`.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub detected: bool,
    pub confidence: f64,
    pub metadata: Metadata,
}

impl Evaluation {
    fn new(detected: bool, confidence: f64) -> Self {
        Self {
            detected,
            confidence: clamp_unit(confidence),
            metadata: Metadata::new(),
        }
    }

    /// Not enough buffered values for the strategy to say anything.
    fn insufficient_data(window: &SlidingWindow) -> Self {
        Self::new(false, 0.0)
            .with("reason", "insufficient_data")
            .with("buffer_size", window.len())
    }

    fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// A strategy together with its resolved parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
    Threshold { threshold: f64 },
    Pattern { window_size: usize },
    Anomaly { sensitivity: f64 },
    Change { limit: ChangeLimit },
}

impl Rule {
    /// Resolve the rule for a configuration.
    pub fn from_config(config: &DetectorConfig) -> DetectorResult<Self> {
        config.validate()?;
        let rule = match config.strategy {
            DetectionStrategy::Threshold => Rule::Threshold {
                threshold: config.threshold.ok_or(DetectorError::MissingThreshold {
                    strategy: config.strategy,
                })?,
            },
            DetectionStrategy::Pattern => Rule::Pattern {
                window_size: config.window_size,
            },
            DetectionStrategy::Anomaly => Rule::Anomaly {
                sensitivity: config.sensitivity,
            },
            DetectionStrategy::Change => Rule::Change {
                limit: match config.threshold {
                    Some(t) => ChangeLimit::Absolute(t),
                    None => ChangeLimit::Relative(config.sensitivity),
                },
            },
        };
        Ok(rule)
    }

    pub fn strategy(&self) -> DetectionStrategy {
        match self {
            Rule::Threshold { .. } => DetectionStrategy::Threshold,
            Rule::Pattern { .. } => DetectionStrategy::Pattern,
            Rule::Anomaly { .. } => DetectionStrategy::Anomaly,
            Rule::Change { .. } => DetectionStrategy::Change,
        }
    }

    /// Evaluate the newest value in `window`.
    pub fn evaluate(&self, window: &SlidingWindow) -> Evaluation {
        match self {
            Rule::Threshold { threshold } => threshold::evaluate(window, *threshold),
            Rule::Pattern { window_size } => pattern::evaluate(window, *window_size),
            Rule::Anomaly { sensitivity } => anomaly::evaluate(window, *sensitivity),
            Rule::Change { limit } => change::evaluate(window, *limit),
        }
    }
}

/// Saturate an overflowed difference of two finite values to `±f64::MAX`.
fn saturate(x: f64) -> f64 {
    x.clamp(-f64::MAX, f64::MAX)
}

fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
pub(crate) fn window_of(capacity: usize, values: &[f64]) -> SlidingWindow {
    let mut w = SlidingWindow::new(capacity);
    for &v in values {
        w.push(v);
    }
    w
}
