//! The streaming detector.
//!
//! Owns the sliding window, the resolved strategy and the running counters.
//! Each `add_data_point` call updates all state first and only then runs the
//! notification callback, so a misbehaving callback cannot leave the detector
//! half-updated.

use std::panic::{self, AssertUnwindSafe};

use chrono::Utc;
use tracing::{debug, trace, warn};

use crate::config::{DetectionStrategy, DetectorConfig};
use crate::error::{DetectorError, DetectorResult};
use crate::result::{DetectionId, DetectionResult};
use crate::statistics::{ratio, Statistics};
use crate::strategy::Rule;
use crate::window::{RingBuffer, SlidingWindow};

/// Stateful single-stream detection engine.
///
/// Not internally synchronized: wrap it in a `Mutex` to share it between
/// threads.
#[derive(Debug)]
pub struct Detector {
    config: DetectorConfig,
    rule: Rule,
    window: SlidingWindow,
    /// Recent positive detections (bounded).
    history: RingBuffer<DetectionResult>,
    total_observations: u64,
    detections: u64,
    confidence_sum: f64,
    notify_failures: u64,
}

impl Detector {
    /// Create a detector, validating the configuration.
    pub fn new(config: DetectorConfig) -> DetectorResult<Self> {
        let rule = Rule::from_config(&config)?;
        debug!(
            strategy = %config.strategy,
            window_size = config.window_size,
            sensitivity = config.sensitivity,
            threshold = ?config.threshold,
            "detector created"
        );
        Ok(Self {
            window: SlidingWindow::new(config.window_size),
            history: RingBuffer::new(config.max_history),
            rule,
            config,
            total_observations: 0,
            detections: 0,
            confidence_sum: 0.0,
            notify_failures: 0,
        })
    }

    /// Feed one observation and classify it.
    ///
    /// Non-finite values are rejected with [`DetectorError::NonFiniteValue`]
    /// and leave the detector untouched. On a positive detection the
    /// configured callback runs before this returns; if it panics the panic
    /// is caught, logged and counted in [`Statistics::notify_failures`], and
    /// the result is still returned.
    pub fn add_data_point(&mut self, value: f64) -> DetectorResult<DetectionResult> {
        if !value.is_finite() {
            warn!(strategy = %self.rule.strategy(), value, "rejected non-finite observation");
            return Err(DetectorError::NonFiniteValue(value));
        }

        self.window.push(value);
        self.total_observations += 1;

        let eval = self.rule.evaluate(&self.window);
        let result = DetectionResult {
            id: DetectionId::new(),
            detected: eval.detected,
            value,
            confidence: eval.confidence,
            timestamp: Utc::now(),
            strategy: self.rule.strategy(),
            metadata: eval.metadata,
        };

        self.confidence_sum += result.confidence;

        if result.detected {
            self.detections += 1;
            self.history.push(result.clone());
            debug!(
                strategy = %result.strategy,
                value,
                confidence = result.confidence,
                id = %result.id,
                "detection fired"
            );
            self.notify(&result);
        } else {
            trace!(
                strategy = %result.strategy,
                value,
                confidence = result.confidence,
                "no detection"
            );
        }

        Ok(result)
    }

    /// Clear the window and history and zero every counter.
    pub fn reset(&mut self) {
        self.window.clear();
        self.history.clear();
        self.total_observations = 0;
        self.detections = 0;
        self.confidence_sum = 0.0;
        self.notify_failures = 0;
        debug!(strategy = %self.rule.strategy(), "detector reset");
    }

    /// Snapshot of counters and window statistics.
    #[doc(alias = "get_statistics")]
    pub fn statistics(&self) -> Statistics {
        let moments = self.window.moments();
        Statistics {
            strategy: self.rule.strategy(),
            total_observations: self.total_observations,
            detections: self.detections,
            detection_rate: ratio(self.detections as f64, self.total_observations),
            average_confidence: ratio(self.confidence_sum, self.total_observations),
            window_len: self.window.len(),
            window_mean: self.window.mean(),
            window_std_dev: moments.map(|m| m.std_dev),
            notify_failures: self.notify_failures,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn strategy(&self) -> DetectionStrategy {
        self.rule.strategy()
    }

    /// Buffered observations, oldest first.
    pub fn window(&self) -> Vec<f64> {
        self.window.to_vec()
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Recent positive detections, oldest first.
    pub fn recent_detections(&self) -> impl Iterator<Item = &DetectionResult> {
        self.history.iter()
    }

    pub fn total_observations(&self) -> u64 {
        self.total_observations
    }

    pub fn detections(&self) -> u64 {
        self.detections
    }

    fn notify(&mut self, result: &DetectionResult) {
        let Some(handler) = self.config.notify.as_ref() else {
            return;
        };
        if panic::catch_unwind(AssertUnwindSafe(|| handler(result))).is_err() {
            self.notify_failures += 1;
            warn!(
                strategy = %result.strategy,
                id = %result.id,
                "notification callback panicked; detector state kept"
            );
        }
    }
}
