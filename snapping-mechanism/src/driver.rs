//! The mechanism driver (component C7): orchestrates Λ computation, the
//! secure sampler, the exact logarithm, snapping and clamping into the
//! Snapping Mechanism's release recipe (Mironov 2012, §5.2).

use snapping_base::{clamp, exact_ln, smallest_ge_power_of_two, snap_to_lambda};
use snapping_base::{EntropySource, Error, OsEntropy};

pub(crate) fn validate(x: f64, sensitivity: f64, epsilon: f64, b: f64) -> Result<(), Error> {
    if !x.is_finite() {
        return Err(Error::Domain("x must be finite"));
    }
    if !(sensitivity.is_finite() && sensitivity > 0.0) {
        return Err(Error::Domain("sensitivity must be finite and positive"));
    }
    if !(epsilon.is_finite() && epsilon > 0.0) {
        return Err(Error::Domain("epsilon must be finite and positive"));
    }
    if !(b.is_finite() && b > 0.0) {
        return Err(Error::Domain("B must be finite and positive"));
    }
    Ok(())
}

/// Computes the noise to add to `x`, drawing entropy from `source`.
///
/// This is the testable core of [`snap_noise`]: tests inject a
/// [`snapping_base::RecordedTape`] here to get bit-identical results across
/// runs, without the public API ever taking an entropy source as an
/// argument.
pub fn snap_noise_with(
    source: &mut dyn EntropySource,
    x: f64,
    sensitivity: f64,
    epsilon: f64,
    b: f64,
) -> Result<f64, Error> {
    validate(x, sensitivity, epsilon, b)?;
    log::debug!(
        "snap_noise_with: x={x}, sensitivity={sensitivity}, epsilon={epsilon}, b={b}"
    );

    // Step 1: scale to sensitivity 1.
    let x_scaled = x / sensitivity;
    let b_scaled = b / sensitivity;

    // Step 2: secure sign and U*.
    let sigma = source.sign()? as f64;
    let u_star = snapping_base::secure_uniform_unit_with(source)?;
    log::trace!("snap_noise_with: drew sigma={sigma}, u_star={u_star}");

    // Step 3: exact log.
    let l = exact_ln(u_star)?;

    // Step 4: clamp, then add noise. These two operations are the only
    // non-exact arithmetic in the kernel; the snap step below absorbs
    // their rounding error onto the Λ-lattice.
    let inner = clamp(x_scaled, b_scaled) + sigma * (1.0 / epsilon) * l;

    // Step 5: Λ computed post-scaling, from 1/epsilon. The prototype this
    // mechanism descends from left the scaling order of Λ ambiguous between
    // sensitivity/epsilon and 1/epsilon; this kernel fixes it to the
    // post-scaling form (see DESIGN.md).
    let (capital_lambda, m) = smallest_ge_power_of_two(1.0 / epsilon)?;
    log::trace!("snap_noise_with: Lambda={capital_lambda} (m={m})");

    // Step 6: snap to the Λ-lattice.
    let inner_snapped = snap_to_lambda(inner, m);

    // Step 7: rescale and re-clamp.
    let release = clamp(sensitivity * inner_snapped, b);

    // Step 8: noise is the difference between the private and non-private
    // estimates.
    Ok(release - x)
}

/// Computes the noise to add to `x` so that `x + noise` is an ε-DP
/// release, using the OS entropy source.
///
/// # Errors
/// [`Error::Domain`] if `sensitivity`, `epsilon` or `b` are not finite and
/// positive, or `x` is not finite. [`Error::Entropy`] if the OS CSPRNG is
/// unavailable.
pub fn snap_noise(x: f64, sensitivity: f64, epsilon: f64, b: f64) -> Result<f64, Error> {
    snap_noise_with(&mut OsEntropy, x, sensitivity, epsilon, b)
}

/// Convenience wrapper returning `x + snap_noise(...)` directly.
pub fn snap_release(x: f64, sensitivity: f64, epsilon: f64, b: f64) -> Result<f64, Error> {
    Ok(x + snap_noise(x, sensitivity, epsilon, b)?)
}

/// [`snap_release`] drawing entropy from an explicit source; used by tests
/// that need to check properties of the *release* (e.g. bound respect)
/// against a reproducible tape.
pub fn snap_release_with(
    source: &mut dyn EntropySource,
    x: f64,
    sensitivity: f64,
    epsilon: f64,
    b: f64,
) -> Result<f64, Error> {
    Ok(x + snap_noise_with(source, x, sensitivity, epsilon, b)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapping_base::RecordedTape;

    fn tape_all_ones() -> RecordedTape {
        RecordedTape::new(vec![0xFFu8; 64])
    }

    #[test]
    fn scenario_s6_negative_epsilon_is_a_domain_error() {
        assert_eq!(
            snap_noise(0.0, 1.0, -1.0, 10.0),
            Err(Error::Domain("epsilon must be finite and positive"))
        );
    }

    #[test]
    fn rejects_non_positive_sensitivity_and_bound() {
        assert!(snap_noise(0.0, 0.0, 1.0, 10.0).is_err());
        assert!(snap_noise(0.0, 1.0, 1.0, 0.0).is_err());
        assert!(snap_noise(0.0, -1.0, 1.0, 10.0).is_err());
        assert!(snap_noise(0.0, 1.0, 1.0, -10.0).is_err());
    }

    #[test]
    fn rejects_non_finite_inputs() {
        assert!(snap_noise(f64::NAN, 1.0, 1.0, 10.0).is_err());
        assert!(snap_noise(0.0, f64::INFINITY, 1.0, 10.0).is_err());
        assert!(snap_noise(0.0, 1.0, f64::NAN, 10.0).is_err());
        assert!(snap_noise(0.0, 1.0, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn release_respects_bound_for_many_tapes() {
        for seed_byte in 0u8..=255u8 {
            let mut tape = RecordedTape::new(vec![seed_byte; 256]);
            let release = snap_release_with(&mut tape, 1e6, 1.0, 0.1, 1e3).unwrap();
            assert!((-1e3..=1e3).contains(&release), "release {release} out of bounds");
        }
    }

    #[test]
    fn determinism_under_a_fixed_tape() {
        let mut t1 = tape_all_ones();
        let mut t2 = tape_all_ones();
        let n1 = snap_noise_with(&mut t1, 50.0, 1.0, 0.5, 10.0).unwrap();
        let n2 = snap_noise_with(&mut t2, 50.0, 1.0, 0.5, 10.0).unwrap();
        assert_eq!(n1.to_bits(), n2.to_bits());
    }

    #[test]
    fn sensitivity_scaling_is_linear_under_a_shared_tape() {
        for k in [0.1, 1.0, 2.0, 7.5] {
            let mut t1 = tape_all_ones();
            let mut t2 = tape_all_ones();
            let base = snap_noise_with(&mut t1, 5.0, 1.0, 0.2, 10.0).unwrap();
            let scaled = snap_noise_with(&mut t2, k * 5.0, k * 1.0, 0.2, k * 10.0).unwrap();
            assert!(
                (scaled - k * base).abs() <= (k * base).abs() * 1e-9 + 1e-9,
                "scaled={scaled}, k*base={}",
                k * base
            );
        }
    }

    #[test]
    fn scenario_s1_noise_is_a_multiple_of_lambda_near_the_bound() {
        let mut tape = tape_all_ones();
        let release = snap_release_with(&mut tape, 0.0, 1.0, 1.0, 10.0).unwrap();
        assert!((-10.0..=10.0).contains(&release));
        assert_eq!(release, release.trunc());
    }

    #[test]
    fn scenario_s2_release_is_a_multiple_of_two() {
        // epsilon = 0.5 => Lambda(1/epsilon) = 2.0; sensitivity = 1.0 keeps
        // the rescale exact, and the bound (10.0) is itself a multiple of
        // 2, so clamping never knocks the release off the lattice.
        for seed_byte in 0u8..=255u8 {
            let mut tape = RecordedTape::new(vec![seed_byte; 256]);
            let release = snap_release_with(&mut tape, 50.0, 1.0, 0.5, 10.0).unwrap();
            assert!((-10.0..=10.0).contains(&release), "release {release} out of bounds");
            assert_eq!(
                release,
                (release / 2.0).round() * 2.0,
                "release {release} is not a multiple of 2"
            );
        }
    }

    #[test]
    fn scenario_s3_release_is_a_multiple_of_the_scaled_lattice_spacing() {
        // epsilon = 2.0 => 1/epsilon = 0.5, already a power of two, so
        // Lambda(1/epsilon) = 0.5 exactly (the equality branch of C2, not
        // the round-up branch). Rescaling by sensitivity = 0.1 gives a
        // 0.05 lattice, but 0.1 is not itself a power of two, so unlike
        // scenarios S2 and S5 the rescale multiplication is not bit-exact;
        // check the lattice property within the rounding that one
        // multiplication can introduce rather than by exact equality.
        let (capital_lambda, _m) = smallest_ge_power_of_two(1.0 / 2.0).unwrap();
        assert_eq!(capital_lambda, 0.5);
        let spacing = 0.1 * capital_lambda;
        for seed_byte in 0u8..=255u8 {
            let mut tape = RecordedTape::new(vec![seed_byte; 256]);
            let release = snap_release_with(&mut tape, -3.0, 0.1, 2.0, 5.0).unwrap();
            assert!((-5.0..=5.0).contains(&release), "release {release} out of bounds");
            let ratio = release / spacing;
            assert!(
                (ratio - ratio.round()).abs() < 1e-6,
                "release {release} is not a multiple of {spacing}"
            );
        }
    }

    #[test]
    fn scenario_s5_release_is_a_multiple_of_four() {
        // epsilon = 0.3 => 1/epsilon ~= 3.333, Lambda = 4.0; sensitivity =
        // 1.0 keeps the rescale exact, and the bound (1e9) is itself a
        // multiple of 4.
        for seed_byte in 0u8..=255u8 {
            let mut tape = RecordedTape::new(vec![seed_byte; 256]);
            let release = snap_release_with(&mut tape, 0.0, 1.0, 0.3, 1e9).unwrap();
            assert!((-1e9..=1e9).contains(&release), "release {release} out of bounds");
            assert_eq!(
                release,
                (release / 4.0).round() * 4.0,
                "release {release} is not a multiple of 4"
            );
        }
    }

    proptest::proptest! {
        #[test]
        fn bound_respect(
            x in -1e3f64..1e3,
            sensitivity in 1e-2f64..1e2,
            epsilon in 1e-2f64..1e1,
            b in 1e-1f64..1e3,
            seed_byte: u8,
        ) {
            let mut tape = RecordedTape::new(vec![seed_byte; 256]);
            let release = snap_release_with(&mut tape, x, sensitivity, epsilon, b).unwrap();
            proptest::prop_assert!((-b..=b).contains(&release));
        }

        #[test]
        fn determinism_under_identical_tapes_for_arbitrary_inputs(
            x in -1e3f64..1e3,
            sensitivity in 1e-2f64..1e2,
            epsilon in 1e-2f64..1e1,
            b in 1e-1f64..1e3,
            seed_byte: u8,
        ) {
            let mut t1 = RecordedTape::new(vec![seed_byte; 256]);
            let mut t2 = RecordedTape::new(vec![seed_byte; 256]);
            let n1 = snap_noise_with(&mut t1, x, sensitivity, epsilon, b).unwrap();
            let n2 = snap_noise_with(&mut t2, x, sensitivity, epsilon, b).unwrap();
            proptest::prop_assert_eq!(n1.to_bits(), n2.to_bits());
        }
    }
}
