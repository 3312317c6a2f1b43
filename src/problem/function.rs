//! Problems defined by closures
use ndarray::prelude::*;

use super::Problem;

/// Problem given by a residual function and its Jacobian
pub struct FnProblem<F, J>
where
    F: Fn(&Array1<f64>) -> Array1<f64>,
    J: Fn(&Array1<f64>) -> Array2<f64>,
{
    residual: F,
    jacobian: J,
}

impl<F, J> FnProblem<F, J>
where
    F: Fn(&Array1<f64>) -> Array1<f64>,
    J: Fn(&Array1<f64>) -> Array2<f64>,
{
    /// Creates a problem from the residual function and its Jacobian.
    pub fn new(residual: F, jacobian: J) -> Self {
        FnProblem { residual, jacobian }
    }
}

impl<F, J> Problem for FnProblem<F, J>
where
    F: Fn(&Array1<f64>) -> Array1<f64>,
    J: Fn(&Array1<f64>) -> Array2<f64>,
{
    fn residual(&self, x: &Array1<f64>) -> Array1<f64> {
        (self.residual)(x)
    }

    fn jacobian(&self, x: &Array1<f64>) -> Array2<f64> {
        (self.jacobian)(x)
    }
}
