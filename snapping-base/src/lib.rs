//! The numerical kernel behind the Snapping Mechanism (Mironov 2012): IEEE
//! -754 bit surgery, a cryptographically secure uniform sampler, an
//! exactly-rounded natural logarithm, Λ-lattice snapping and clamping.
//!
//! This crate is deliberately monomorphic over `f64`: the differential-
//! privacy proof is specific to the binary64 rounding lattice, so there is
//! no trait to generalize over.
//! [`snapping_mechanism`](https://docs.rs/snapping-mechanism) composes
//! these primitives into the public `snap_noise`/`snap_release` API;
//! most callers should depend on that crate (or the `snapping` umbrella
//! crate) rather than this one directly.

pub mod bits;
pub mod clamp;
pub mod entropy;
pub mod error;
pub mod exactln;
pub mod lambda;
pub mod snap;

pub use bits::{decompose, recompose, DecomposedDouble};
pub use clamp::clamp;
pub use entropy::{secure_uniform_unit, secure_uniform_unit_with, EntropySource, OsEntropy, RecordedTape};
pub use error::{Error, Result};
pub use exactln::exact_ln;
pub use lambda::smallest_ge_power_of_two;
pub use snap::snap_to_lambda;
