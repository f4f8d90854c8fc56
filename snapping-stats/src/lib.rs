//! Statistical collaborators for validating the Snapping Mechanism: the
//! analytic worst-case bias formula, and a non-snapped Laplace baseline
//! kept around purely for comparison.
//!
//! Neither module is on `snapping-mechanism`'s dependency path; both exist
//! to let test and calibration code check the mechanism's behavior against
//! theory without folding statistics machinery into the production crate.

pub mod bias;
pub mod laplace;

pub use bias::{bias, max_bias};
pub use laplace::{laplace_noise, laplace_noise_with};
