//! Threshold crossing.
//!
//! Fires when the newest value is strictly above the configured bound.
//! Confidence is `½·(1 + tanh(delta / scale))` with `delta = value - T` and
//! `scale = max(|T|, EPSILON)`: it rises with `delta` along the whole line,
//! sits at 0.5 on the bound itself, above 0.5 for every detection and below
//! it for values that stay under the bound, so closeness still shows.

use super::{saturate, Evaluation, EPSILON};
use crate::window::SlidingWindow;

pub fn evaluate(window: &SlidingWindow, threshold: f64) -> Evaluation {
    let Some(value) = window.latest() else {
        return Evaluation::insufficient_data(window);
    };

    let delta = saturate(value - threshold);
    let scale = threshold.abs().max(EPSILON);
    let confidence = 0.5 * (1.0 + (delta / scale).tanh());

    Evaluation::new(value > threshold, confidence)
        .with("threshold", threshold)
        .with("delta", delta)
        .with("current_value", value)
        .with("buffer_size", window.len())
}
