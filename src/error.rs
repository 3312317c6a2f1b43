//! Error types reported inside [`StatusCode`](crate::StatusCode)
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Caller errors detected before or while evaluating the problem.
#[derive(Clone, Debug, PartialEq, Error, Serialize, Deserialize)]
pub enum InputError {
    /// The initial guess has no entries.
    #[error("initial guess is empty")]
    EmptyInitialGuess,
    /// The termination tolerance is negative or NaN.
    #[error("tolerance must be non-negative, got {0}")]
    InvalidTolerance(f64),
    /// The stagnation tolerance is negative or NaN.
    #[error("step tolerance must be non-negative, got {0}")]
    InvalidStepTolerance(f64),
    /// The residual does not have the dimension of the point.
    #[error("residual has length {found}, expected {expected}")]
    ResidualShape {
        /// Dimension of the point
        expected: usize,
        /// Length of the returned residual
        found: usize,
    },
    /// The Jacobian is not square with the dimension of the point.
    #[error("Jacobian has shape {found:?}, expected ({expected}, {expected})")]
    JacobianShape {
        /// Dimension of the point
        expected: usize,
        /// Shape of the returned Jacobian
        found: (usize, usize),
    },
}

/// Location of a NaN or infinite value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum NonFinite {
    /// The Newton step
    #[error("NaN or Inf in Newton step")]
    Step,
    /// The residual at the current point
    #[error("NaN or Inf in residual")]
    Residual,
    /// The Jacobian at the current point
    #[error("NaN or Inf in Jacobian")]
    Jacobian,
}
