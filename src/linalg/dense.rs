use ndarray::prelude::*;
use rulinalg::error::{Error, ErrorKind};
use rulinalg::matrix::decomposition::PartialPivLu;
use rulinalg::matrix::Matrix;
use rulinalg::vector::Vector;

use super::{all_finite, classified_solve, norm_1, Failure, LinearSolver, LinearStep};

/// Dense LU solver with partial pivoting (based on `rulinalg`)
///
/// The reciprocal condition number is computed exactly from the inverse, which is fine for the
/// moderately sized systems this crate targets.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dense;

fn to_matrix(mat: &Array2<f64>) -> Matrix<f64> {
    Matrix::new(mat.nrows(), mat.ncols(), mat.iter().copied().collect::<Vec<f64>>())
}

fn classify(err: Error) -> Failure {
    match err.kind() {
        ErrorKind::DivByZero | ErrorKind::DecompFailure => Failure::Singular,
        _ => Failure::Other(err.to_string()),
    }
}

fn lu_solve(mat: &Array2<f64>, rhs: &Array1<f64>) -> Result<(Array1<f64>, f64), Failure> {
    let n = rhs.len();
    let lu = PartialPivLu::decompose(to_matrix(mat)).map_err(classify)?;
    let sol = lu.solve(Vector::new(rhs.to_vec())).map_err(classify)?;
    let sol = Array1::from(sol.into_vec());
    // a vanishing pivot may slip through as a division by zero
    if !all_finite(&sol) {
        return Err(Failure::Singular);
    }
    let inv = lu.inverse().map_err(classify)?;
    let inv = Array2::from_shape_vec((n, n), inv.into_vec())
        .map_err(|err| Failure::Other(err.to_string()))?;
    let rcond = if all_finite(&inv) {
        1.0 / (norm_1(mat) * norm_1(&inv))
    } else {
        0.0
    };
    Ok((sol, rcond))
}

impl LinearSolver for Dense {
    fn solve(&self, mat: &Array2<f64>, rhs: &Array1<f64>) -> LinearStep {
        classified_solve(mat, rhs, lu_solve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::ConditionSignal;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn regular_system() {
        let mat = array![[4.0, 1.0], [2.0, 3.0]];
        let rhs = array![1.0, 2.0];
        let res = Dense.solve(&mat, &rhs);
        assert_eq!(res.signal, ConditionSignal::Normal);
        for (lhs, rhs) in mat.dot(&res.step).iter().zip(rhs.iter()) {
            assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-12);
        }
    }

    #[test]
    fn singular_system_gives_least_squares_step() {
        let mat = array![[1.0, 1.0], [1.0, 1.0]];
        let rhs = array![-1.0, -1.0];
        let res = Dense.solve(&mat, &rhs);
        assert_eq!(res.signal, ConditionSignal::Singular);
        for &pi in res.step.iter() {
            assert_abs_diff_eq!(pi, -0.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn zero_matrix_is_singular_with_zero_step() {
        let res = Dense.solve(&Array2::zeros((3, 3)), &array![1.0, 2.0, 3.0]);
        assert_eq!(res.signal, ConditionSignal::Singular);
        assert_eq!(res.step, Array1::<f64>::zeros(3));
    }

    #[test]
    fn tiny_regular_system() {
        let mat = 1e-17 * Array2::<f64>::eye(2);
        let res = Dense.solve(&mat, &array![1e-17, -2e-17]);
        assert_eq!(res.signal, ConditionSignal::Normal);
        assert_abs_diff_eq!(res.step[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(res.step[1], -2.0, epsilon = 1e-12);
    }

    #[test]
    fn tiny_singular_system() {
        let mat = 1e-17 * array![[1.0, 1.0], [1.0, 1.0]];
        let res = Dense.solve(&mat, &array![-1e-17, -1e-17]);
        assert_eq!(res.signal, ConditionSignal::Singular);
        for &pi in res.step.iter() {
            assert_abs_diff_eq!(pi, -0.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn nearly_singular_system() {
        let mat = array![[1.0, 1.0], [1.0, 1.0 + f64::EPSILON]];
        let res = Dense.solve(&mat, &array![1.0, 0.0]);
        assert_eq!(res.signal, ConditionSignal::IllConditioned);
        assert!(all_finite(&res.step));
    }

    #[test]
    fn non_square_matrix_is_unclassified() {
        let res = Dense.solve(&Array2::zeros((2, 3)), &array![1.0, 2.0]);
        assert!(matches!(res.signal, ConditionSignal::Other(_)));
    }
}
