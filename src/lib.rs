//! Solve systems of nonlinear equations with Newton's method.
//!
//! ```
//! use ndarray::array;
//! use newtsolve::problem::FnProblem;
//! use newtsolve::{newton, StatusCode};
//!
//! let problem = FnProblem::new(
//!     |x| x.mapv(|xi| xi * xi - 4.0),
//!     |x| ndarray::Array2::from_diag(&x.mapv(|xi| 2.0 * xi)),
//! );
//! let params = newton::Params::new().with_tol(1e-10);
//! let status = newton::solve(&problem, &array![1.0], &params, ());
//! assert_eq!(status.code, StatusCode::Converged);
//! ```
#![warn(missing_docs)]

pub mod error;
pub mod linalg;
pub mod newton;
pub mod problem;

mod status;
pub use crate::status::{Iterate, Status, StatusCode};
