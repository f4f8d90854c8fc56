//! Analytic worst-case bias of the Snapping Mechanism.
//!
//! Recovered from the mechanism's original bias-calculation utility: given
//! a true value `f_D`, a clamping bound `B`, and the Laplace scale
//! `lambda = 1/epsilon`, computes `E[release] - f_D` in closed form by
//! splitting the inner Laplace distribution's mass into the part clamped
//! to `-B`, the part clamped to `+B`, and the part that lands strictly
//! inside the bound.

use statrs::distribution::{ContinuousCDF, Laplace};

use snapping_base::smallest_ge_power_of_two;

/// The truncated first moment of a Laplace(`loc`, `scale`) distribution
/// over `[lo, hi]`: `∫_lo^hi x · pdf(x) dx`, evaluated in closed form
/// rather than by numerical quadrature.
fn truncated_first_moment(loc: f64, scale: f64, lo: f64, hi: f64) -> f64 {
    // Antiderivative of x * pdf(x), split at the location (where the
    // piecewise-exponential density changes branch).
    let below = |x: f64| 0.5 * ((x - loc) / scale).exp() * (x - scale);
    let above = |x: f64| -0.5 * (-(x - loc) / scale).exp() * (x + scale);

    if hi <= loc {
        below(hi) - below(lo)
    } else if lo >= loc {
        above(hi) - above(lo)
    } else {
        (below(loc) - below(lo)) + (above(hi) - above(loc))
    }
}

/// Computes the expected bias `E[release] - f_D` of a clamped, snapped
/// Laplace release at true value `f_d`, bound `b`, and Laplace scale
/// `lambda = 1/epsilon` (post sensitivity-scaling, as the mechanism
/// computes it).
///
/// This mirrors its source's three-term decomposition exactly
/// (`bias_lower + bias_rest + bias_upper`), including the source's choice
/// to weight the middle term by the non-clamped probability mass rather
/// than normalize by it; see `DESIGN.md`.
///
/// # Panics
/// If `lambda` is non-positive, non-finite, or the derived Laplace
/// parameters are otherwise invalid (`statrs` rejects the distribution).
pub fn bias(f_d: f64, b: f64, lambda: f64) -> f64 {
    let sign = if f_d.is_sign_negative() { -1.0 } else { 1.0 };
    let f_d = f_d.abs();
    let b = b.abs();

    let (capital_lambda, _m) =
        smallest_ge_power_of_two(lambda).expect("lambda must be finite and positive");

    let loc = -capital_lambda / 2.0;
    let scale = lambda;
    let dist = Laplace::new(loc, scale).expect("invalid Laplace parameters");

    let p_lower = dist.cdf(-b - f_d);
    let bias_lower = (-b - f_d) * p_lower;

    let p_upper = 1.0 - dist.cdf(b - f_d);
    let bias_upper = (b - f_d) * p_upper;

    let bias_rest =
        (1.0 - p_lower - p_upper) * truncated_first_moment(loc, scale, -b - f_d, b - f_d);

    sign * (bias_lower + bias_rest + bias_upper)
}

/// Computes the bias at the point of maximum true-value magnitude, `f_D = B`:
/// the largest bias the mechanism can introduce for a release bounded by
/// `b` at privacy parameter `epsilon`. Returns `(-|bias|, |bias|)`.
pub fn max_bias(b: f64, epsilon: f64) -> (f64, f64) {
    let at_bound = bias(b, b, 1.0 / epsilon).abs();
    (-at_bound, at_bound)
}
