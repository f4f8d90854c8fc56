//! The Snapping Mechanism: an ε-differentially-private noise addition
//! mechanism secure against the floating-point attacks in Mironov (2012).
//!
//! ```
//! use snapping_mechanism::snap_release;
//!
//! let private_mean = snap_release(/* x = */ 42.0, /* sensitivity = */ 1.0,
//!                                  /* epsilon = */ 0.5, /* B = */ 100.0)?;
//! assert!((-100.0..=100.0).contains(&private_mean));
//! # Ok::<(), snapping_mechanism::Error>(())
//! ```

pub mod driver;
pub mod request;

pub use driver::{snap_noise, snap_noise_with, snap_release, snap_release_with};
pub use request::SnapRequest;
pub use snapping_base::{Error, Result};

// Secondary exports for cross-checking the kernel in isolation.
pub use snapping_base::{secure_uniform_unit, smallest_ge_power_of_two, snap_to_lambda};
