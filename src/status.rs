use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, NonFinite};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Possible outcomes of a solver run
pub enum StatusCode {
    /// Residual norm dropped below the (relative) tolerance
    Converged,
    /// Newton step became too small compared to the current point
    StepTooSmall,
    /// Maximum number of steps reached
    MaxSteps,
    /// Invalid initial guess, parameters or problem dimensions
    InvalidInput(InputError),
    /// A NaN or infinite value showed up during the iteration
    NumericalFailure(NonFinite),
    /// The linear solver reported a condition that is not handled
    UnclassifiedWarning(String),
}

impl StatusCode {
    /// Checks whether the run converged.
    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Converged)
    }

    /// Checks whether the run was stopped by an error.
    ///
    /// [`StatusCode::StepTooSmall`] and [`StatusCode::MaxSteps`] are neither success nor failure,
    /// it is up to the caller to decide how to treat them.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StatusCode::InvalidInput(_)
                | StatusCode::NumericalFailure(_)
                | StatusCode::UnclassifiedWarning(_)
        )
    }

    /// Returns a human-readable description of the outcome.
    pub fn message(&self) -> String {
        match self {
            StatusCode::Converged => "converged".to_string(),
            StatusCode::StepTooSmall => "stopped: Newton step too small".to_string(),
            StatusCode::MaxSteps => "stopped: maximum number of steps reached".to_string(),
            StatusCode::InvalidInput(err) => format!("invalid input: {err}"),
            StatusCode::NumericalFailure(err) => format!("numerical failure: {err}"),
            StatusCode::UnclassifiedWarning(reason) => {
                format!("unclassified linear solver warning: {reason}")
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Current point of the iteration together with residual and Jacobian evaluated there
pub struct Iterate {
    /// Current point
    pub x: Array1<f64>,
    /// Residual at `x`
    pub f: Array1<f64>,
    /// Jacobian at `x`
    pub jac: Array2<f64>,
    /// Number of conducted Newton steps
    pub steps: usize,
    /// Euclidean norm of `f`
    pub norm_f: f64,
    /// Norm of the residual at the initial guess
    pub norm_f0: f64,
    /// Euclidean norm of `x`
    pub norm_x: f64,
}

impl Iterate {
    /// Creates an empty state (used if the input is rejected before any evaluation).
    pub fn empty() -> Self {
        Iterate {
            x: Array1::zeros(0),
            f: Array1::zeros(0),
            jac: Array2::zeros((0, 0)),
            steps: 0,
            norm_f: f64::NAN,
            norm_f0: f64::NAN,
            norm_x: f64::NAN,
        }
    }

    /// Checks whether no point has been evaluated.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Result of a solver run
pub struct Status {
    /// Reason of termination
    pub code: StatusCode,
    /// Final state (best effort if the run failed)
    pub state: Iterate,
    /// Norm of the last step taken (`NaN` if no step was taken)
    pub norm_step: f64,
}

impl Status {
    /// Number of conducted Newton steps
    pub fn steps(&self) -> usize {
        self.state.steps
    }

    /// Final point
    pub fn x(&self) -> &Array1<f64> {
        &self.state.x
    }

    /// Consumes the status and returns the final point.
    pub fn into_x(self) -> Array1<f64> {
        self.state.x
    }
}
