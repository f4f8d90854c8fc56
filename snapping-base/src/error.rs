use thiserror::Error;

/// Errors raised by the snapping kernel.
///
/// The kernel is total on valid inputs: every variant here corresponds to a
/// precondition violation or to an unrecoverable resource failure, never to
/// an internal inconsistency. No variant is ever produced for a draw that
/// merely looks unlikely.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A numeric input was non-finite, non-positive where positivity is
    /// required, or otherwise outside the domain of the operation.
    #[error("domain error: {0}")]
    Domain(&'static str),

    /// The OS-backed cryptographically secure entropy source was
    /// unavailable or returned fewer bytes than requested.
    #[error("entropy source unavailable")]
    Entropy,

    /// The high-precision arithmetic context required for the exactly-
    /// rounded logarithm could not be configured to the required bit
    /// width. Fatal; callers should not retry.
    #[error("could not configure {required}-bit precision context")]
    Precision { required: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
