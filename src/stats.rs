//! Small descriptive-statistics helpers shared by the analyses.

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(vals: &[f64]) -> f64 {
    if vals.is_empty() {
        return 0.0;
    }
    vals.iter().sum::<f64>() / vals.len() as f64
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn population_std(vals: &[f64]) -> f64 {
    if vals.is_empty() {
        return 0.0;
    }
    let m = mean(vals);
    let sq_diff: f64 = vals.iter().map(|v| (v - m).powi(2)).sum();
    (sq_diff / vals.len() as f64).sqrt()
}

/// Percentage change from `from` to `to`; 0 when `from` is not positive.
pub fn pct_change(from: f64, to: f64) -> f64 {
    if from > 0.0 {
        (to - from) / from * 100.0
    } else {
        0.0
    }
}

/// `part / whole * 100`, or 0 when `whole` is not positive.
pub fn pct_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

pub fn max(vals: &[f64]) -> f64 {
    if vals.is_empty() {
        return 0.0;
    }
    vals.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

pub fn min(vals: &[f64]) -> f64 {
    if vals.is_empty() {
        return 0.0;
    }
    vals.iter().copied().fold(f64::INFINITY, f64::min)
}
