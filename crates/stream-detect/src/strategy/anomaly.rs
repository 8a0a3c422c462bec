//! Statistical anomaly detection.
//!
//! Flags the newest value when it sits more than `sensitivity` population
//! standard deviations from the window mean. The window includes the value
//! being judged.

use super::{saturate, Evaluation};
use crate::window::SlidingWindow;

pub fn evaluate(window: &SlidingWindow, sensitivity: f64) -> Evaluation {
    let (Some(value), Some(moments)) = (window.latest(), window.moments()) else {
        return Evaluation::insufficient_data(window);
    };

    let deviation = saturate(value - moments.mean).abs();
    let band = sensitivity * moments.std_dev;

    // A flat window has no spread to scale by: any departure is anomalous.
    let (detected, confidence) = if moments.std_dev == 0.0 {
        let departed = deviation > 0.0;
        (departed, if departed { 1.0 } else { 0.0 })
    } else {
        (deviation > band, deviation / band.max(f64::MIN_POSITIVE))
    };

    Evaluation::new(detected, confidence)
        .with("mean", moments.mean)
        .with("std_dev", moments.std_dev)
        .with("deviation", deviation)
        .with("current_value", value)
}
