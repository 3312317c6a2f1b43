//! Eigenpairs as roots of a nonlinear system
use ndarray::prelude::*;

use super::Problem;

/// Eigenvalue problem `A v = λ v` with normalization `vᵀ v = 1`
///
/// The unknowns are stacked as `z = (v, λ)` and the residual is
/// `F(z) = (A v − λ v, (vᵀ v − 1) / 2)` with Jacobian `[[A − λ I, −v], [vᵀ, 0]]`.
/// Newton's method converges to the eigenpair closest to the initial guess in the usual sense.
pub struct Eigen {
    a: Array2<f64>,
}

impl Eigen {
    /// Creates the problem for a square matrix, returns `None` otherwise.
    pub fn new(a: Array2<f64>) -> Option<Self> {
        if a.is_square() {
            Some(Eigen { a })
        } else {
            None
        }
    }

    /// Size of the matrix
    pub fn size(&self) -> usize {
        self.a.nrows()
    }

    /// Stacks an eigenvector and eigenvalue guess into a point.
    pub fn point(v: &Array1<f64>, lambda: f64) -> Array1<f64> {
        let n = v.len();
        let mut z = Array1::zeros(n + 1);
        z.slice_mut(s![..n]).assign(v);
        z[n] = lambda;
        z
    }

    /// Splits a point into eigenvector and eigenvalue.
    pub fn split<'a>(&self, z: &'a Array1<f64>) -> Option<(ArrayView1<'a, f64>, f64)> {
        let n = self.size();
        if z.len() != n + 1 {
            return None;
        }
        Some((z.slice(s![..n]), z[n]))
    }
}

impl Problem for Eigen {
    fn residual(&self, z: &Array1<f64>) -> Array1<f64> {
        // a wrongly sized point yields an empty residual, which the solver rejects
        let Some((v, lambda)) = self.split(z) else {
            return Array1::zeros(0);
        };
        let n = self.size();
        let mut f = Array1::zeros(n + 1);
        f.slice_mut(s![..n])
            .assign(&(self.a.dot(&v) - lambda * &v));
        f[n] = 0.5 * (v.dot(&v) - 1.0);
        f
    }

    fn jacobian(&self, z: &Array1<f64>) -> Array2<f64> {
        let Some((v, lambda)) = self.split(z) else {
            return Array2::zeros((0, 0));
        };
        let n = self.size();
        let mut jac = Array2::zeros((n + 1, n + 1));
        jac.slice_mut(s![..n, ..n]).assign(&self.a);
        for i in 0..n {
            jac[(i, i)] -= lambda;
            jac[(i, n)] = -v[i];
            jac[(n, i)] = v[i];
        }
        jac
    }
}
