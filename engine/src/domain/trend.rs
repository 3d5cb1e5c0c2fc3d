//! Period-over-period trend classification.

use shared::Trend;

/// Relative change at which a metric counts as moving (inclusive, so
/// exactly +10% reads as up). Named so tests (and any future
/// per-metric tuning) exercise it directly instead of each call site
/// hard-coding 10%.
pub const TREND_THRESHOLD: f64 = 0.10;

/// Bucket `current` against `previous`. No previous period, or a
/// previous of zero, is `New`: there is nothing meaningful to compare
/// against and dividing by it would be nonsense anyway.
pub fn classify(current: f64, previous: Option<f64>) -> Trend {
    classify_with_threshold(current, previous, TREND_THRESHOLD)
}

pub fn classify_with_threshold(current: f64, previous: Option<f64>, threshold: f64) -> Trend {
    let previous = match previous {
        Some(p) if p != 0.0 => p,
        _ => return Trend::New,
    };
    let delta = (current - previous) / previous;
    if delta >= threshold {
        Trend::Up
    } else if delta <= -threshold {
        Trend::Down
    } else {
        Trend::Stable
    }
}
