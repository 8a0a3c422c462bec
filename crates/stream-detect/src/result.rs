//! Detection result records.
//!
//! One `DetectionResult` is produced per observation. The detector keeps
//! copies of positive results only in its bounded history.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::DetectionStrategy;

/// Strategy-specific auxiliary facts attached to a result.
pub type Metadata = BTreeMap<String, Value>;

/// Unique identifier for a detection result.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetectionId(pub uuid::Uuid);

impl DetectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for DetectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DetectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of evaluating one observation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionResult {
    pub id: DetectionId,
    /// Whether the observation triggered the strategy's condition.
    pub detected: bool,
    /// The evaluated observation.
    pub value: f64,
    /// How strongly the condition held, in `[0.0, 1.0]`.
    ///
    /// Reported on non-detections too, as a measure of closeness.
    pub confidence: f64,
    /// When the observation was processed.
    pub timestamp: DateTime<Utc>,
    /// Strategy that produced this result.
    pub strategy: DetectionStrategy,
    pub metadata: Metadata,
}

impl DetectionResult {
    /// Numeric metadata entry.
    pub fn metadata_f64(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(Value::as_f64)
    }

    /// String metadata entry.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}
