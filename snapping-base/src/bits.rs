//! IEEE-754 binary64 bit surgery (component C1).
//!
//! Every other piece of the kernel that needs exact, non-probabilistic
//! rounding goes through [`DecomposedDouble`] rather than ordinary
//! floating-point arithmetic. A cosmetic shortcut here (e.g. `x / 2.0_f64
//! .powi(m)` instead of field manipulation) reintroduces the rounding error
//! the snapping mechanism exists to eliminate.

/// A `binary64` value split into its IEEE-754 fields.
///
/// `exponent` is the *biased* 11-bit exponent (0..=2047); `mantissa` is the
/// 52-bit significand with the implicit leading one stripped. This type
/// never represents a subnormal, an infinity, or a NaN — the kernel's
/// inputs are finite non-zero doubles (zero is handled as an explicit fixed
/// point, see [`DecomposedDouble::is_zero`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecomposedDouble {
    pub sign: u8,
    pub exponent: u16,
    pub mantissa: u64,
}

const MANTISSA_BITS: u32 = 52;
const EXPONENT_BIAS: i32 = 1023;
const MANTISSA_MASK: u64 = (1 << MANTISSA_BITS) - 1;

impl DecomposedDouble {
    /// True for both `+0.0` and `-0.0`.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.exponent == 0 && self.mantissa == 0
    }

    /// The unbiased exponent `e` such that this value equals `±1.mantissa ×
    /// 2^e` (meaningless for zero).
    #[inline]
    pub fn unbiased_exponent(&self) -> i32 {
        self.exponent as i32 - EXPONENT_BIAS
    }

    /// Decrements the biased exponent by `m`. Leaves zero unchanged: the
    /// snapping mechanism treats zero as a fixed point of the whole
    /// snap-to-Λ pipeline, and an unconditional decrement would walk a
    /// zero-valued exponent field into a bit pattern that no longer decodes
    /// to zero.
    ///
    /// For non-zero inputs, undefined (debug-asserted) if the result would
    /// not be a normal exponent; callers of [`crate::snap::snap_to_lambda`]
    /// never pass an `m` large enough to trigger this for `x` already a
    /// finite non-zero double.
    #[inline]
    pub fn divide_by_pow2(self, m: i32) -> Self {
        if self.is_zero() {
            return self;
        }
        let new_exponent = self.exponent as i32 - m;
        debug_assert!(
            new_exponent > 0 && new_exponent < 2047,
            "divide_by_pow2 produced a non-normal exponent"
        );
        Self {
            exponent: new_exponent as u16,
            ..self
        }
    }

    /// Increments the biased exponent by `m`. Leaves zero unchanged.
    #[inline]
    pub fn multiply_by_pow2(self, m: i32) -> Self {
        if self.is_zero() {
            return self;
        }
        let new_exponent = self.exponent as i32 + m;
        debug_assert!(
            new_exponent > 0 && new_exponent < 2047,
            "multiply_by_pow2 produced a non-normal exponent"
        );
        Self {
            exponent: new_exponent as u16,
            ..self
        }
    }

    /// Rounds the decomposed value to the nearest integer, ties toward
    /// `+∞` on the *signed* real line: e.g. `-0.5` rounds to `0`, not `-1`.
    ///
    /// Away from an exact tie, "nearest" is unambiguous and sign-agnostic:
    /// only when the fractional part is exactly one half does the sign
    /// decide the direction, since rounding the *magnitude* up always
    /// means rounding the *signed value* away from zero. See
    /// `DESIGN.md` for why this departs from a literal, sign-blind bit-field
    /// recipe.
    pub fn round_to_nearest_integer(self) -> Self {
        let e = self.unbiased_exponent();
        if e >= MANTISSA_BITS as i32 {
            // Already an integer: every mantissa bit is above the binary point.
            return self;
        }
        if e < -1 {
            // |self| < 0.25: unambiguously closer to 0 than to ±1.
            return Self {
                exponent: 0,
                mantissa: 0,
                ..self
            };
        }
        if e == -1 {
            // |self| in [0.5, 1.0). Anything above 0.5 is unambiguously
            // closer to 1; exactly 0.5 is a tie, broken toward +∞.
            return if self.mantissa == 0 {
                if self.sign == 0 {
                    Self {
                        exponent: EXPONENT_BIAS as u16,
                        mantissa: 0,
                        ..self
                    }
                } else {
                    Self {
                        exponent: 0,
                        mantissa: 0,
                        ..self
                    }
                }
            } else {
                Self {
                    exponent: EXPONENT_BIAS as u16,
                    mantissa: 0,
                    ..self
                }
            };
        }

        // 0 <= e < 52: the top `e` mantissa bits (plus the implicit leading
        // one) are the integer part; bit `e` is the rounding bit, and any
        // set bit below it makes this strictly more than halfway (no tie).
        let e = e as u32;
        let shift = MANTISSA_BITS - e;
        let rounding_bit = (self.mantissa >> (shift - 1)) & 1;
        let sticky_mask = (1u64 << (shift - 1)) - 1;
        let is_exact_tie = rounding_bit == 1 && (self.mantissa & sticky_mask) == 0;
        let int_part = self.mantissa >> shift;

        let round_up = if is_exact_tie {
            self.sign == 0
        } else {
            rounding_bit == 1
        };

        if !round_up {
            Self {
                mantissa: int_part << shift,
                ..self
            }
        } else {
            let overflow_at = 1u64 << e;
            let incremented = int_part + 1;
            if incremented == overflow_at {
                Self {
                    exponent: self.exponent + 1,
                    mantissa: 0,
                    ..self
                }
            } else {
                Self {
                    mantissa: incremented << shift,
                    ..self
                }
            }
        }
    }
}

/// Splits a finite `f64` into its sign, biased exponent and mantissa
/// fields. Subnormal inputs decode correctly (`exponent == 0`) but are not
/// otherwise treated specially; the kernel's callers never produce them.
pub fn decompose(x: f64) -> DecomposedDouble {
    let bits = x.to_bits();
    DecomposedDouble {
        sign: (bits >> 63) as u8,
        exponent: ((bits >> MANTISSA_BITS) & 0x7ff) as u16,
        mantissa: bits & MANTISSA_MASK,
    }
}

/// Recombines a decomposed value back into an `f64`.
pub fn recompose(d: DecomposedDouble) -> f64 {
    let bits = ((d.sign as u64) << 63) | ((d.exponent as u64) << MANTISSA_BITS) | d.mantissa;
    f64::from_bits(bits)
}
