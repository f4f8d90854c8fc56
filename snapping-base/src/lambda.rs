//! Λ computation (component C2): the smallest power of two at least as
//! large as a given positive `λ`.

use crate::bits::{decompose, recompose};
use crate::error::Error;

/// Returns `(Λ, m)` where `Λ = 2^m` is the smallest power of two with
/// `Λ ≥ lambda`, and `m` is the signed exponent.
///
/// If `lambda` is itself a power of two, `Λ == lambda` exactly. Otherwise
/// `lambda < Λ < 2 · lambda`.
///
/// # Errors
/// Returns [`Error::Domain`] if `lambda` is non-positive or non-finite.
pub fn smallest_ge_power_of_two(lambda: f64) -> Result<(f64, i32), Error> {
    if !(lambda.is_finite() && lambda > 0.0) {
        return Err(Error::Domain("lambda must be finite and positive"));
    }
    let d = decompose(lambda);
    if d.mantissa == 0 {
        // lambda is already a power of two.
        return Ok((lambda, d.unbiased_exponent()));
    }
    let rounded_up = crate::bits::DecomposedDouble {
        mantissa: 0,
        exponent: d.exponent + 1,
        ..d
    };
    Ok((recompose(rounded_up), rounded_up.unbiased_exponent()))
}
