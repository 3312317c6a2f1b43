//! Systems of nonlinear equations
use ndarray::prelude::*;

pub mod eigen;
pub mod function;
pub mod stationary;

pub use eigen::Eigen;
pub use function::FnProblem;
pub use stationary::{Objective, Stationary};

/// A system of equations `F(x) = 0` with `n` equations in `n` unknowns
///
/// Both methods have to be deterministic, the solver may call them at arbitrary points.
pub trait Problem {
    /// Returns the residual `F(x)` (of the same length as `x`).
    fn residual(&self, x: &Array1<f64>) -> Array1<f64>;
    /// Returns the Jacobian `J(x)` (a square matrix with the length of `x` as size).
    fn jacobian(&self, x: &Array1<f64>) -> Array2<f64>;
}

impl<P: Problem + ?Sized> Problem for &P {
    fn residual(&self, x: &Array1<f64>) -> Array1<f64> {
        (**self).residual(x)
    }

    fn jacobian(&self, x: &Array1<f64>) -> Array2<f64> {
        (**self).jacobian(x)
    }
}
