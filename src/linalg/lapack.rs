use ndarray::prelude::*;
use ndarray_linalg::error::LinalgError;
use ndarray_linalg::{Factorize, ReciprocalConditionNum, Solve};

use super::{classified_solve, Failure, LinearSolver, LinearStep};

/// LU solver based on LAPACK (`getrf`, `getrs` and `gecon` through `ndarray-linalg`)
#[derive(Clone, Copy, Debug, Default)]
pub struct Lapack;

fn classify(err: LinalgError) -> Failure {
    match err {
        // `getrf` reports a zero pivot as a computational failure
        LinalgError::Lapack(lax::error::Error::LapackComputationalFailure { .. }) => {
            Failure::Singular
        }
        other => Failure::Other(other.to_string()),
    }
}

fn lu_solve(mat: &Array2<f64>, rhs: &Array1<f64>) -> Result<(Array1<f64>, f64), Failure> {
    let lu = mat.factorize().map_err(classify)?;
    let rcond = lu.rcond().map_err(classify)?;
    let sol = lu.solve(rhs).map_err(classify)?;
    Ok((sol, rcond))
}

impl LinearSolver for Lapack {
    fn solve(&self, mat: &Array2<f64>, rhs: &Array1<f64>) -> LinearStep {
        classified_solve(mat, rhs, lu_solve)
    }
}
