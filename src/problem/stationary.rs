//! Stationarity conditions of an unconstrained optimization problem
use ndarray::prelude::*;

use super::Problem;

/// Twice differentiable objective function
pub trait Objective {
    /// Returns the gradient at `x`.
    fn gradient(&self, x: &Array1<f64>) -> Array1<f64>;
    /// Returns the Hessian at `x`.
    fn hessian(&self, x: &Array1<f64>) -> Array2<f64>;
}

/// The system `∇f(x) = 0` of an [`Objective`] `f`
///
/// Newton's method on this system finds stationary points, which are not necessarily minima.
pub struct Stationary<O: Objective> {
    objective: O,
}

impl<O: Objective> Stationary<O> {
    /// Wraps an objective.
    pub fn new(objective: O) -> Self {
        Stationary { objective }
    }

    /// Returns the wrapped objective.
    pub fn objective(&self) -> &O {
        &self.objective
    }
}

impl<O: Objective> Problem for Stationary<O> {
    fn residual(&self, x: &Array1<f64>) -> Array1<f64> {
        self.objective.gradient(x)
    }

    fn jacobian(&self, x: &Array1<f64>) -> Array2<f64> {
        self.objective.hessian(x)
    }
}
