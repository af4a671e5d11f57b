//! Trailing moving average
//!
//! Index `i` averages the window `[max(0, i-W+1), i]` inclusive. Early indices
//! use a shrinking window instead of null-padding, so the output always has
//! the same length as the input. This is intentional, not a conventional
//! "undefined first W-1 points" moving average.

/// Trailing moving average with window `window` (treated as at least 1).
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut averages = Vec::with_capacity(values.len());
    let mut running_sum = 0.0;

    for (i, &value) in values.iter().enumerate() {
        running_sum += value;
        if i >= window {
            running_sum -= values[i - window];
        }
        let span = (i + 1).min(window);
        averages.push(running_sum / span as f64);
    }

    averages
}
