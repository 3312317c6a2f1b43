use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Parameters of Newton's method
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Termination tolerance (relative to the initial residual norm if that exceeds one)
    pub tol: f64,
    /// Maximum number of steps
    pub max_steps: usize,
    /// Level of reporting (`0` for no reporting)
    pub verbose: usize,
    /// Steps shorter than `step_tol · (1 + ‖x‖)` stop the iteration
    pub step_tol: f64,
}

impl Params {
    const DEFAULT_TOL: f64 = 1e-8;
    const DEFAULT_MAX_STEPS: usize = 50;
    const DEFAULT_VERBOSE: usize = 0;

    /// Default stagnation tolerance `ε^(2/3)` of the machine precision `ε`
    pub fn default_step_tol() -> f64 {
        f64::EPSILON.powf(2.0 / 3.0)
    }

    /// Creates a new [`Params`] struct with default parameter values.
    pub fn new() -> Self {
        Params {
            tol: Self::DEFAULT_TOL,
            max_steps: Self::DEFAULT_MAX_STEPS,
            verbose: Self::DEFAULT_VERBOSE,
            step_tol: Self::default_step_tol(),
        }
    }

    /// Sets the termination tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the maximum number of steps.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the level of reporting.
    pub fn with_verbose(mut self, verbose: usize) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the stagnation tolerance.
    pub fn with_step_tol(mut self, step_tol: f64) -> Self {
        self.step_tol = step_tol;
        self
    }

    /// Checks that the tolerances are non-negative numbers.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.tol.is_nan() || self.tol < 0.0 {
            return Err(InputError::InvalidTolerance(self.tol));
        }
        if self.step_tol.is_nan() || self.step_tol < 0.0 {
            return Err(InputError::InvalidStepTolerance(self.step_tol));
        }
        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new()
    }
}
