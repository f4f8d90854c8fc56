//! The secure entropy capability (component C4) and its two
//! implementations: the OS CSPRNG used in production, and a recorded
//! byte tape used only by tests.
//!
//! There is deliberately no "test mode" that falls back to a
//! non-cryptographic RNG — a test that needs determinism injects a
//! [`RecordedTape`] instead.

use std::collections::VecDeque;

use crate::bits::{recompose, DecomposedDouble};
use crate::error::Error;

const MANTISSA_BITS: u32 = 52;
const MANTISSA_MASK: u64 = (1 << MANTISSA_BITS) - 1;
const EXPONENT_BIAS: i32 = 1023;

/// A cryptographically secure source of random bits.
///
/// Implementors need only provide [`fill_bytes`](Self::fill_bytes); the
/// bit and sign draws are built on top of it.
pub trait EntropySource {
    /// Fills `buf` with secure random bytes, or fails if the source is
    /// unavailable or exhausted.
    fn fill_bytes(&mut self, buf: &mut [u8]) -> Result<(), Error>;

    /// Draws a secure random `u64`.
    fn next_u64(&mut self) -> Result<u64, Error> {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Draws a single secure random bit.
    fn bit(&mut self) -> Result<bool, Error> {
        let mut buf = [0u8; 1];
        self.fill_bytes(&mut buf)?;
        Ok(buf[0] & 1 == 1)
    }

    /// Draws a uniformly random sign, `+1` or `-1`.
    fn sign(&mut self) -> Result<i8, Error> {
        Ok(if self.bit()? { 1 } else { -1 })
    }
}

/// The production entropy source, backed by the OS CSPRNG via `getrandom`.
#[derive(Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bytes(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        getrandom::getrandom(buf).map_err(|_| Error::Entropy)
    }
}

/// A fixed, pre-recorded sequence of bytes played back as entropy.
///
/// Exists so property and determinism tests can drive the kernel with a
/// known tape instead of the OS CSPRNG, without ever substituting a
/// non-cryptographic PRNG for the real entropy path.
#[derive(Debug, Clone, Default)]
pub struct RecordedTape {
    bytes: VecDeque<u8>,
}

impl RecordedTape {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into().into(),
        }
    }
}

impl EntropySource for RecordedTape {
    fn fill_bytes(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        if self.bytes.len() < buf.len() {
            return Err(Error::Entropy);
        }
        for slot in buf.iter_mut() {
            *slot = self.bytes.pop_front().expect("length checked above");
        }
        Ok(())
    }
}

/// Draws `G ~ Geometric(½)` on `{1, 2, 3, …}` by counting leading zero
/// bits across the entropy stream until a one bit is seen, then adding
/// one. Capped at 1022 so `1023 - G` stays a normal (nonzero) biased
/// exponent.
fn sample_geometric(source: &mut dyn EntropySource) -> Result<u32, Error> {
    const CAP: u32 = 1022;
    let mut zeros = 0u32;
    loop {
        let word = source.next_u64()?;
        if word == 0 {
            zeros += 64;
            if zeros >= CAP {
                return Ok(CAP);
            }
            continue;
        }
        zeros += word.leading_zeros();
        return Ok((zeros + 1).min(CAP));
    }
}

/// Draws `U* ∈ (0, 1)` via a geometrically-distributed exponent and a
/// uniformly random 52-bit mantissa (component C4), using the given
/// entropy source.
///
/// Unlike a single `f64` uniform draw (which spends a fixed number of
/// mantissa bits regardless of magnitude and so oversamples the top
/// binade), this samples the exponent across binades with probability
/// proportional to the real interval each binade represents — the
/// property Mironov's construction requires of `U*`.
pub fn secure_uniform_unit_with(source: &mut dyn EntropySource) -> Result<f64, Error> {
    let g = sample_geometric(source)?;
    let biased_exponent = (EXPONENT_BIAS - g as i32) as u16;
    let mantissa = source.next_u64()? & MANTISSA_MASK;
    Ok(recompose(DecomposedDouble {
        sign: 0,
        exponent: biased_exponent,
        mantissa,
    }))
}

/// [`secure_uniform_unit_with`] against the OS entropy source.
pub fn secure_uniform_unit() -> Result<f64, Error> {
    secure_uniform_unit_with(&mut OsEntropy)
}
