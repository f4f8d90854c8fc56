//! Exactly-rounded natural logarithm (component C5).
//!
//! `f64::ln` is only *faithfully* rounded by most libm implementations: the
//! returned value is one of the two `f64`s nearest the true result, but not
//! guaranteed to be the *closer* of the two. The snapping mechanism's proof
//! needs the true nearest value — a second, unaccounted-for rounding step
//! here is exactly the kind of crack Mironov's attack exploits. `rug`
//! (MPFR bindings) computes `ln` to an arbitrary working precision with a
//! single final round-to-nearest-even, which is what correct rounding
//! requires.

use rug::Float;

use crate::error::Error;

/// The minimum significand precision (in bits) sufficient for a
/// correctly-rounded `f64` natural logarithm over `(0, 1)`, per the
/// Lefèvre/Muller correct-rounding tables for `log`.
pub const WORKING_PRECISION_BITS: u32 = 118;

/// Computes `ln(u)` for `u ∈ (0, 1)`, correctly rounded to `f64`.
///
/// # Errors
/// Returns [`Error::Domain`] if `u` is not strictly between 0 and 1, and
/// [`Error::Precision`] if the working-precision context could not be
/// constructed (this can only happen if `WORKING_PRECISION_BITS` falls
/// outside MPFR's supported precision range, which it does not).
pub fn exact_ln(u: f64) -> Result<f64, Error> {
    if !(u.is_finite() && u > 0.0 && u < 1.0) {
        return Err(Error::Domain("ln argument must lie strictly in (0, 1)"));
    }
    let (min_precision, max_precision) = (rug::float::prec_min(), rug::float::prec_max());
    if WORKING_PRECISION_BITS < min_precision || WORKING_PRECISION_BITS > max_precision {
        return Err(Error::Precision {
            required: WORKING_PRECISION_BITS,
        });
    }
    let hi = Float::with_val(WORKING_PRECISION_BITS, u);
    let result = hi.ln();
    Ok(result.to_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_libm_away_from_rounding_boundaries() {
        for u in [0.1, 0.25, 0.5, 0.75, 0.999, 1e-10, 1e-300] {
            let got = exact_ln(u).unwrap();
            let want = u.ln();
            assert!(
                (got - want).abs() <= want.abs() * 1e-12 + 1e-300,
                "exact_ln({u}) = {got}, libm gives {want}"
            );
        }
    }

    #[test]
    fn ln_of_one_half_is_negative() {
        let got = exact_ln(0.5).unwrap();
        assert!(got < 0.0);
    }

    #[test]
    fn rejects_out_of_domain_values() {
        for u in [0.0, 1.0, -1.0, 2.0, f64::NAN, f64::INFINITY] {
            assert!(exact_ln(u).is_err());
        }
    }
}
