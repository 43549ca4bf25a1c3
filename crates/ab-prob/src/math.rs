//! Small special-function helpers not covered by `statrs`.

/// Trigamma function `ψ₁(x)` (polygamma of order 1) for `x > 0`.
///
/// Uses the recurrence `ψ₁(x) = ψ₁(x+1) + 1/x²` to push the argument past 6,
/// then the asymptotic expansion
/// `ψ₁(x) ≈ 1/x + 1/(2x²) + 1/(6x³) − 1/(30x⁵) + 1/(42x⁷) − 1/(30x⁹)`.
///
/// Returns `NaN` for non-finite or non-positive input.
pub fn trigamma(x: f64) -> f64 {
    if !x.is_finite() || x <= 0.0 {
        return f64::NAN;
    }
    let mut x = x;
    let mut acc = 0.0;
    while x < 6.0 {
        acc += 1.0 / (x * x);
        x += 1.0;
    }
    let inv = 1.0 / x;
    let inv2 = inv * inv;
    let tail = inv2 * inv * (1.0 / 6.0 - inv2 * (1.0 / 30.0 - inv2 * (1.0 / 42.0 - inv2 / 30.0)));
    acc + inv + 0.5 * inv2 + tail
}
