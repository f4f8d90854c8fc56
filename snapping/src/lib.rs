//! Differentially-private noise addition via the Snapping Mechanism.
//!
//! This is a thin umbrella over [`snapping_mechanism`]; depend on it
//! directly if a finer-grained dependency graph matters more than
//! convenience. Enable the `stats` feature to additionally pull in
//! [`snapping_stats`]'s analytic bias formula and non-snapped Laplace
//! baseline for calibration work.

pub use snapping_mechanism::{
    secure_uniform_unit, smallest_ge_power_of_two, snap_noise, snap_release, snap_to_lambda,
    Error, Result, SnapRequest,
};

#[cfg(feature = "stats")]
pub use snapping_stats as stats;
