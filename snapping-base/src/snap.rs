//! Snap-to-Λ rounding (component C3).

use crate::bits::{decompose, recompose};

/// Rounds `x` to the nearest multiple of `Λ = 2^m`, ties toward `+∞`.
///
/// Implemented as `decompose → divide_by_pow2(m) → round_to_nearest_integer
/// → multiply_by_pow2(m) → recompose`: equivalent to `round(x / Λ) · Λ` but
/// without the two extra roundings a naive `f64` division would add,
/// which is exactly the attack surface Mironov's construction closes.
///
/// `x = 0.0` (and `-0.0`) pass through unchanged.
pub fn snap_to_lambda(x: f64, m: i32) -> f64 {
    let d = decompose(x)
        .divide_by_pow2(m)
        .round_to_nearest_integer()
        .multiply_by_pow2(m);
    recompose(d)
}
