const SECONDS_PER_DAY: u64 = 24 * 3600;

/// Evenly spaced sample points over `[0, duration)`: `duration * i / count`.
///
/// Negative or non-finite durations are treated as zero, which puts every
/// sample at the start of the video.
#[must_use]
pub fn select_timestamps(duration: f64, count: usize) -> Vec<f64> {
    let duration = if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    };

    (0..count)
        .map(|i| duration * i as f64 / count as f64)
        .collect()
}

/// `HH:MM:SS`, truncated to whole seconds and wrapped at 24 hours.
#[must_use]
pub fn stamp_to_string(stamp: f64) -> String {
    // `as` saturates: negatives and NaN become 0
    let ts = (stamp as u64) % SECONDS_PER_DAY;
    let h = ts / 3600;
    let m = (ts % 3600) / 60;
    let s = ts % 60;
    format!("{h:02}:{m:02}:{s:02}")
}
