use thiserror::Error;

use crate::config::DetectionStrategy;

/// Errors from detector construction, configuration loading and input intake.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("strategy {strategy} requires a threshold but none was configured")]
    MissingThreshold { strategy: DetectionStrategy },

    #[error("window size {window_size} out of range (must be >= {min})")]
    InvalidWindowSize { window_size: usize, min: usize },

    #[error("sensitivity out of range: {0} (must be finite and > 0)")]
    InvalidSensitivity(f64),

    #[error("invalid threshold: {0}")]
    InvalidThreshold(f64),

    #[error("detection history capacity must be at least 1")]
    InvalidHistorySize,

    #[error("non-finite observation rejected: {0}")]
    NonFiniteValue(f64),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for DetectorError {
    fn from(e: std::io::Error) -> Self {
        DetectorError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for DetectorError {
    fn from(e: serde_json::Error) -> Self {
        DetectorError::Config(format!("malformed configuration: {}", e))
    }
}

/// Convenience type alias for detector results.
pub type DetectorResult<T> = Result<T, DetectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = DetectorError::MissingThreshold {
            strategy: DetectionStrategy::Threshold,
        };
        assert!(e.to_string().contains("threshold"));

        let e = DetectorError::InvalidWindowSize {
            window_size: 1,
            min: 2,
        };
        let msg = e.to_string();
        assert!(msg.contains('1'));
        assert!(msg.contains(">= 2"));
    }

    #[test]
    fn non_finite_value_display() {
        let e = DetectorError::NonFiniteValue(f64::NAN);
        assert!(e.to_string().contains("NaN"));

        let e = DetectorError::NonFiniteValue(f64::INFINITY);
        assert!(e.to_string().contains("inf"));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: DetectorError = io_err.into();
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DetectorError = json_err.into();
        assert!(matches!(err, DetectorError::Config(_)));
        assert!(err.to_string().contains("malformed configuration"));
    }

    #[test]
    fn result_type_works() {
        let ok: DetectorResult<u32> = Ok(42);
        assert_eq!(ok.unwrap(), 42);

        let err: DetectorResult<u32> = Err(DetectorError::InvalidHistorySize);
        assert!(err.is_err());
    }
}
