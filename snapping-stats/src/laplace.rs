//! A naive, non-snapped Laplace mechanism (component of the mechanism's
//! original test suite, recovered here as a comparison fixture).
//!
//! This is deliberately insecure against the floating-point attacks the
//! rest of this workspace exists to close: it exists only so that
//! `snapping-mechanism`'s behavior can be compared against the textbook
//! construction it replaces.

use snapping_base::{secure_uniform_unit_with, EntropySource, Error};

/// Draws one sample from `Laplace(0, sensitivity / epsilon)` via
/// inverse-CDF sampling, using the OS entropy source.
pub fn laplace_noise(sensitivity: f64, epsilon: f64) -> Result<f64, Error> {
    let mut source = snapping_base::OsEntropy;
    laplace_noise_with(&mut source, sensitivity, epsilon)
}

/// [`laplace_noise`] drawing entropy from an explicit source, for
/// reproducible comparison tests.
pub fn laplace_noise_with(
    source: &mut dyn EntropySource,
    sensitivity: f64,
    epsilon: f64,
) -> Result<f64, Error> {
    let scale = sensitivity / epsilon;
    let u = secure_uniform_unit_with(source)? - 0.5;
    let sign = if u.is_sign_negative() { -1.0 } else { 1.0 };
    Ok(-scale * sign * (1.0 - 2.0 * u.abs()).ln())
}
