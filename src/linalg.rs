//! Linear solves for the Newton step and small vector helpers
//!
//! The factorizations themselves come from `rulinalg` ([`Dense`]) or, with the `lapack` feature,
//! from `ndarray-linalg` ([`Lapack`]). Both report how well-behaved the system was through a
//! [`ConditionSignal`] returned next to the solution.
use log::debug;
use ndarray::prelude::*;
use ndarray::Data;

mod dense;
pub use dense::Dense;

#[cfg(feature = "lapack")]
mod lapack;
#[cfg(feature = "lapack")]
pub use lapack::Lapack;

/// Systems with a reciprocal condition number below this value are reported as ill-conditioned.
pub const ILL_CONDITIONED_RCOND: f64 = f64::EPSILON;

/// Condition of a linear system as reported by a [`LinearSolver`]
#[derive(Clone, Debug, PartialEq)]
pub enum ConditionSignal {
    /// No issue
    Normal,
    /// The matrix is exactly singular, the step is a least-squares substitute
    Singular,
    /// The matrix is nearly singular, the step may be inaccurate
    IllConditioned,
    /// Anything else the backend could not handle
    Other(String),
}

/// Solution of a linear system together with its condition signal
#[derive(Clone, Debug)]
pub struct LinearStep {
    /// Solution (best effort unless the signal is [`ConditionSignal::Normal`])
    pub step: Array1<f64>,
    /// Condition of the system
    pub signal: ConditionSignal,
}

impl LinearStep {
    /// Creates a zero step tagged with [`ConditionSignal::Other`].
    pub fn other(n: usize, reason: impl Into<String>) -> Self {
        LinearStep {
            step: Array1::zeros(n),
            signal: ConditionSignal::Other(reason.into()),
        }
    }
}

/// Solver for square linear systems `mat · p = rhs`
pub trait LinearSolver {
    /// Solves the system and reports its condition.
    fn solve(&self, mat: &Array2<f64>, rhs: &Array1<f64>) -> LinearStep;
}

impl<L: LinearSolver + ?Sized> LinearSolver for &L {
    fn solve(&self, mat: &Array2<f64>, rhs: &Array1<f64>) -> LinearStep {
        (**self).solve(mat, rhs)
    }
}

/// Linear solver used by [`crate::newton::solve`]
#[cfg(feature = "lapack")]
pub type DefaultSolver = Lapack;
/// Linear solver used by [`crate::newton::solve`]
#[cfg(not(feature = "lapack"))]
pub type DefaultSolver = Dense;

/// Creates the default linear solver.
pub fn default_solver() -> DefaultSolver {
    DefaultSolver::default()
}

/// Failure of a backend factorization or solve
pub(crate) enum Failure {
    Singular,
    Other(String),
}

/// Euclidean norm
///
/// Entries are scaled by the largest magnitude first, so the norm only overflows if the result
/// itself is out of range.
pub fn norm<S: Data<Elem = f64>>(v: &ArrayBase<S, Ix1>) -> f64 {
    if !all_finite(v) {
        return v.dot(v).sqrt();
    }
    let scale = max_abs(v);
    if scale == 0.0 {
        return 0.0;
    }
    scale * v.iter().map(|vi| (vi / scale).powi(2)).sum::<f64>().sqrt()
}

/// Checks that no entry is NaN or infinite.
pub fn all_finite<S: Data<Elem = f64>, D: Dimension>(a: &ArrayBase<S, D>) -> bool {
    a.iter().all(|v| v.is_finite())
}

fn max_abs<S: Data<Elem = f64>, D: Dimension>(a: &ArrayBase<S, D>) -> f64 {
    a.iter().fold(0.0, |m, v| m.max(v.abs()))
}

/// Power of two that brings the largest entry of `mat` into `[1, 2)`
///
/// Dividing by it is exact and leaves the solution of a system unchanged, but makes the absolute
/// pivot threshold of the factorization relative to the size of the entries.
pub(crate) fn equilibration(mat: &Array2<f64>) -> f64 {
    let max = max_abs(mat);
    if max == 0.0 || !max.is_finite() {
        return 1.0;
    }
    2.0_f64.powf(max.log2().floor())
}

/// Maximum absolute column sum
pub(crate) fn norm_1(mat: &Array2<f64>) -> f64 {
    mat.columns()
        .into_iter()
        .map(|col| col.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

pub(crate) fn check_shapes(mat: &Array2<f64>, rhs: &Array1<f64>) -> Result<(), String> {
    let (rows, cols) = mat.dim();
    if rows != cols {
        return Err(format!("matrix is not square: {rows}x{cols}"));
    }
    if rhs.len() != rows {
        return Err(format!(
            "right-hand side has length {}, expected {rows}",
            rhs.len()
        ));
    }
    Ok(())
}

pub(crate) fn classify_rcond(rcond: f64) -> ConditionSignal {
    // NaN counts as ill-conditioned
    if rcond >= ILL_CONDITIONED_RCOND {
        ConditionSignal::Normal
    } else {
        ConditionSignal::IllConditioned
    }
}

/// Runs `lu_solve` on the system and turns its outcome into a [`LinearStep`].
///
/// `lu_solve` returns the solution and the reciprocal condition number. Singular systems are
/// retried with [`regularized_least_squares`].
pub(crate) fn classified_solve<F>(mat: &Array2<f64>, rhs: &Array1<f64>, lu_solve: F) -> LinearStep
where
    F: Fn(&Array2<f64>, &Array1<f64>) -> Result<(Array1<f64>, f64), Failure>,
{
    let n = rhs.len();
    if let Err(reason) = check_shapes(mat, rhs) {
        return LinearStep::other(n, reason);
    }
    let scale = equilibration(mat);
    let mat = &(mat / scale);
    let rhs = &(rhs / scale);
    match lu_solve(mat, rhs) {
        Ok((step, rcond)) => {
            let signal = classify_rcond(rcond);
            if signal == ConditionSignal::IllConditioned {
                debug!("ill-conditioned system (rcond = {rcond:.3e})");
            }
            LinearStep { step, signal }
        }
        Err(Failure::Singular) => {
            debug!("singular system, using regularized least-squares step");
            match regularized_least_squares(mat, rhs, |m, b| lu_solve(m, b).map(|(s, _)| s)) {
                Ok(step) => LinearStep {
                    step,
                    signal: ConditionSignal::Singular,
                },
                Err(Failure::Singular) => {
                    LinearStep::other(n, "regularized system is singular as well")
                }
                Err(Failure::Other(reason)) => LinearStep::other(n, reason),
            }
        }
        Err(Failure::Other(reason)) => LinearStep::other(n, reason),
    }
}

/// Solves `(matᵀ mat + μ I) p = matᵀ rhs` with `μ = √ε · max diag(matᵀ mat)` using `lu_solve`.
///
/// This is the substitute step for singular systems. A zero matrix gives the zero step.
pub(crate) fn regularized_least_squares<F>(
    mat: &Array2<f64>,
    rhs: &Array1<f64>,
    lu_solve: F,
) -> Result<Array1<f64>, Failure>
where
    F: Fn(&Array2<f64>, &Array1<f64>) -> Result<Array1<f64>, Failure>,
{
    let n = rhs.len();
    let mut normal = mat.t().dot(mat);
    let scale = normal.diag().iter().copied().fold(0.0, f64::max);
    if scale == 0.0 {
        return Ok(Array1::zeros(n));
    }
    let mu = f64::EPSILON.sqrt() * scale;
    normal.diag_mut().mapv_inplace(|d| d + mu);
    let normal_rhs = mat.t().dot(rhs);
    let scale = equilibration(&normal);
    lu_solve(&(normal / scale), &(normal_rhs / scale))
}
