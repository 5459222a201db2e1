//! Per-step decay derived from a half-life.

/// Multiplicative decay applied to the existing quantity each time step.
///
/// Returns `0.5^(1 / half_life)`, which lies in `(0, 1)` for a positive
/// half-life. No validation happens here: a zero half-life gives `0.0`,
/// a negative one gives a factor above 1, and NaN stays NaN.
pub fn decay_factor(half_life: f64) -> f64 {
    0.5_f64.powf(1.0 / half_life)
}

/// Fraction of a quantity left after `steps` time steps of pure decay
pub fn decay_after(half_life: f64, steps: u32) -> f64 {
    decay_factor(half_life).powf(f64::from(steps))
}
