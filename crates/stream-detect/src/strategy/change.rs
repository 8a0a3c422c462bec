//! Step-change detection between the two most recent observations.
//!
//! With an absolute limit the raw delta is compared; otherwise the delta
//! relative to the previous value is compared against the sensitivity
//! fraction. A zero previous value has no relative scale, so the new value's
//! magnitude stands in for the relative change.

use super::{saturate, Evaluation, EPSILON};
use crate::window::SlidingWindow;

/// What a change is measured against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChangeLimit {
    /// `|value - previous| > limit`.
    Absolute(f64),
    /// `|value - previous| / |previous| > fraction`.
    Relative(f64),
}

impl ChangeLimit {
    fn mode(&self) -> &'static str {
        match self {
            ChangeLimit::Absolute(_) => "absolute",
            ChangeLimit::Relative(_) => "relative",
        }
    }
}

pub fn evaluate(window: &SlidingWindow, limit: ChangeLimit) -> Evaluation {
    let (Some(value), Some(previous)) = (window.latest(), window.previous()) else {
        return Evaluation::insufficient_data(window);
    };

    let delta = saturate(value - previous);
    let (magnitude, bound) = match limit {
        ChangeLimit::Absolute(bound) => (delta.abs(), bound),
        ChangeLimit::Relative(fraction) => {
            let relative = if previous != 0.0 {
                saturate(delta / previous).abs()
            } else {
                value.abs()
            };
            (relative, fraction)
        }
    };

    Evaluation::new(magnitude > bound, magnitude / bound.max(EPSILON))
        .with("delta", delta)
        .with("previous_value", previous)
        .with("current_value", value)
        .with("magnitude", magnitude)
        .with("mode", limit.mode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::window_of;

    #[test]
    fn relative_jump_detected() {
        let eval = evaluate(&window_of(10, &[10.0, 20.0]), ChangeLimit::Relative(0.5));
        assert!(eval.detected);
        assert_eq!(eval.confidence, 1.0);
        assert_eq!(eval.metadata["delta"], 10.0);
        assert_eq!(eval.metadata["previous_value"], 10.0);
        assert_eq!(eval.metadata["mode"], "relative");
    }

    #[test]
    fn small_relative_change_ignored() {
        let eval = evaluate(&window_of(10, &[10.0, 11.0]), ChangeLimit::Relative(0.5));
        assert!(!eval.detected);
        assert!((eval.confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn drop_counts_as_change() {
        let eval = evaluate(&window_of(10, &[10.0, 2.0]), ChangeLimit::Relative(0.5));
        assert!(eval.detected);
        assert_eq!(eval.metadata["delta"], -8.0);
    }

    #[test]
    fn change_from_zero() {
        let eval = evaluate(&window_of(10, &[0.0, 1.0]), ChangeLimit::Relative(0.5));
        assert!(eval.detected);
        assert!(eval.confidence.is_finite());

        let eval = evaluate(&window_of(10, &[0.0, 0.2]), ChangeLimit::Relative(0.5));
        assert!(!eval.detected);
    }

    #[test]
    fn absolute_limit() {
        let eval = evaluate(&window_of(10, &[100.0, 104.0]), ChangeLimit::Absolute(3.0));
        assert!(eval.detected);
        assert_eq!(eval.metadata["mode"], "absolute");
        assert_eq!(eval.metadata["magnitude"], 4.0);

        let eval = evaluate(&window_of(10, &[100.0, 97.0]), ChangeLimit::Absolute(3.0));
        assert!(!eval.detected);
        assert_eq!(eval.confidence, 1.0);
    }

    #[test]
    fn zero_absolute_limit_fires_on_any_change() {
        let eval = evaluate(&window_of(10, &[1.0, 1.5]), ChangeLimit::Absolute(0.0));
        assert!(eval.detected);
        assert_eq!(eval.confidence, 1.0);

        let eval = evaluate(&window_of(10, &[1.0, 1.0]), ChangeLimit::Absolute(0.0));
        assert!(!eval.detected);
        assert_eq!(eval.confidence, 0.0);
    }

    #[test]
    fn compares_only_latest_pair() {
        let eval = evaluate(
            &window_of(10, &[1.0, 100.0, 101.0]),
            ChangeLimit::Absolute(5.0),
        );
        assert!(!eval.detected);
        assert_eq!(eval.metadata["previous_value"], 100.0);
    }

    #[test]
    fn opposite_extremes_keep_finite_delta() {
        let eval = evaluate(
            &window_of(10, &[-f64::MAX, f64::MAX]),
            ChangeLimit::Absolute(1.0),
        );
        assert!(eval.detected);
        assert_eq!(eval.metadata["delta"], f64::MAX);
        assert_eq!(eval.metadata["magnitude"], f64::MAX);
        assert_eq!(eval.confidence, 1.0);
    }

    #[test]
    fn single_value_is_insufficient() {
        let eval = evaluate(&window_of(10, &[1.0]), ChangeLimit::Relative(0.5));
        assert!(!eval.detected);
        assert_eq!(eval.metadata["reason"], "insufficient_data");
    }
}
