/// Display formatting for counts and durations.
///
/// All internal counters are `u64`. Floating point is only used at the
/// display-formatting boundary.
use std::time::Duration;

/// Format a file count with thousand separators.
pub fn format_count(count: u64) -> String {
    if count < 1_000 {
        return count.to_string();
    }
    let s = count.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Format an elapsed duration as seconds with two decimals, e.g. `"1.25s"`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

/// Fraction `processed / total` clamped to `0.0..=1.0`; zero when `total` is zero.
pub fn progress_fraction(processed: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (processed as f64 / total as f64).clamp(0.0, 1.0) as f32
}
