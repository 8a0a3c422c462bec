//! Monotonic trend detection.
//!
//! The pattern label is `increasing` or `decreasing` when every consecutive
//! pair in the buffered window moves strictly that way, and any such label is
//! a detection, even before the window has filled. Confidence is the length
//! of the trend ending at the newest value, as a fraction of the pairs a full
//! window holds: a full monotonic window scores 1.0, a trend over a partly
//! filled window scores less.

use super::Evaluation;
use crate::window::SlidingWindow;

/// Direction of a monotonic run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    Increasing,
    Decreasing,
    None,
}

impl Trend {
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::None => "none",
        }
    }
}

pub fn evaluate(window: &SlidingWindow, window_size: usize) -> Evaluation {
    if window.len() < 2 {
        return Evaluation::insufficient_data(window).with("pattern", Trend::None.label());
    }

    let pairs: Vec<(f64, f64)> = window.pairs().collect();
    let rising = pairs.iter().rev().take_while(|(a, b)| a < b).count();
    let falling = pairs.iter().rev().take_while(|(a, b)| a > b).count();

    let trend = if rising == pairs.len() {
        Trend::Increasing
    } else if falling == pairs.len() {
        Trend::Decreasing
    } else {
        Trend::None
    };

    let trend_length = rising.max(falling);
    let full_pairs = window_size.saturating_sub(1).max(1);
    let confidence = trend_length as f64 / full_pairs as f64;

    Evaluation::new(trend != Trend::None, confidence)
        .with("pattern", trend.label())
        .with("trend_length", trend_length)
        .with("buffer_size", window.len())
}
