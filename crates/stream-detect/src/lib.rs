//! # stream-detect
//!
//! Streaming single-value detection. Observations arrive one at a time; each
//! is classified against one configured strategy and reported as a
//! [`DetectionResult`] with a bounded confidence score and metadata.
//!
//! ## Architecture
//!
//! ```text
//!   caller ──► Detector::add_data_point(value)
//!                  │
//!                  ├── reject non-finite input
//!                  ├── SlidingWindow.push (FIFO, fixed capacity)
//!                  ├── Rule::evaluate ──► Threshold | Pattern | Anomaly | Change
//!                  ├── counters + bounded detection history
//!                  └── notify callback (positive detections only, panic-isolated)
//!                  │
//!                  ▼
//!            DetectionResult { detected, value, confidence, timestamp, metadata }
//! ```
//!
//! ## Invariants
//!
//! - Window length never exceeds `window_size` nor the number of observations
//! - Detections never exceed observations
//! - Confidence is always within `[0.0, 1.0]`; no NaN or infinity reaches a result
//! - An invalid configuration never produces a `Detector`
//!
//! ## Quick Start
//!
//! ```rust
//! use stream_detect::{Detector, DetectorConfig};
//!
//! let mut detector = Detector::new(DetectorConfig::threshold(10.0)).unwrap();
//!
//! let result = detector.add_data_point(15.0).unwrap();
//! assert!(result.detected);
//! assert!(result.confidence > 0.0);
//!
//! let result = detector.add_data_point(5.0).unwrap();
//! assert!(!result.detected);
//!
//! let stats = detector.statistics();
//! assert_eq!(stats.total_observations, 2);
//! assert_eq!(stats.detections, 1);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod detector;
pub mod error;
pub mod result;
pub mod statistics;
pub mod strategy;
pub mod window;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use config::{DetectionStrategy, DetectorConfig, NotifyHandler};
pub use detector::Detector;
pub use error::{DetectorError, DetectorResult};
pub use result::{DetectionId, DetectionResult, Metadata};
pub use statistics::Statistics;
pub use strategy::{ChangeLimit, Evaluation, Rule};
pub use window::{RingBuffer, SlidingWindow, WindowMoments};

/// Default sliding window capacity.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Default anomaly band width / relative change limit.
pub const DEFAULT_SENSITIVITY: f64 = 1.0;

/// Default number of retained positive detections.
pub const DEFAULT_MAX_HISTORY: usize = 256;
