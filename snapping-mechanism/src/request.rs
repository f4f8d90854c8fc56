//! A validated release request, bundling the four arguments to the
//! mechanism. Optional convenience over the free-function API in
//! [`crate::driver`]; recovered from the historical
//! `Snapping_Mechanism` class in the mechanism's original prototype,
//! which bundled these same four values before computing noise.

use snapping_base::Error;

use crate::driver::{snap_noise, snap_release};

/// A request to release a differentially-private version of `x`.
///
/// Validated once at construction; [`SnapRequest::noise`] and
/// [`SnapRequest::release`] cannot subsequently fail on bad input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapRequest {
    x: f64,
    sensitivity: f64,
    epsilon: f64,
    b: f64,
}

impl SnapRequest {
    /// Validates and constructs a request.
    ///
    /// # Errors
    /// [`Error::Domain`] under the same conditions as [`snap_noise`].
    pub fn new(x: f64, sensitivity: f64, epsilon: f64, b: f64) -> Result<Self, Error> {
        crate::driver::validate(x, sensitivity, epsilon, b)?;
        Ok(Self {
            x,
            sensitivity,
            epsilon,
            b,
        })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    /// Computes the noise to add to `self.x()`.
    pub fn noise(&self) -> Result<f64, Error> {
        snap_noise(self.x, self.sensitivity, self.epsilon, self.b)
    }

    /// Computes `self.x() + self.noise()`.
    pub fn release(&self) -> Result<f64, Error> {
        snap_release(self.x, self.sensitivity, self.epsilon, self.b)
    }
}
