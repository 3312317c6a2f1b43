use log::trace;
use ndarray::prelude::*;

use super::params::Params;
use super::report::{Condition, Event, Report, StepDiagnostic, Summary};
use crate::error::{InputError, NonFinite};
use crate::linalg::{all_finite, default_solver, norm, ConditionSignal, LinearSolver, LinearStep};
use crate::problem::Problem;
use crate::status::{Iterate, Status, StatusCode};

/// Uses Newton's method to find a root of the given problem starting from `x0`.
///
/// The Newton systems are solved with [`default_solver`].
pub fn solve<P, R>(problem: &P, x0: &Array1<f64>, params: &Params, report: R) -> Status
where
    P: Problem + ?Sized,
    R: Report,
{
    solve_with(problem, x0, params, &default_solver(), report)
}

fn validate(x0: &Array1<f64>, params: &Params) -> Result<(), InputError> {
    if x0.is_empty() {
        return Err(InputError::EmptyInitialGuess);
    }
    params.validate()
}

/// Evaluates residual and Jacobian at `x`.
fn evaluate<P: Problem + ?Sized>(problem: &P, x: &Array1<f64>) -> (Array1<f64>, Array2<f64>) {
    (problem.residual(x), problem.jacobian(x))
}

/// Checks dimensions and finiteness of the residual and Jacobian in `state`.
fn check_evaluation(state: &Iterate) -> Result<(), StatusCode> {
    let n = state.x.len();
    if state.f.len() != n {
        return Err(StatusCode::InvalidInput(InputError::ResidualShape {
            expected: n,
            found: state.f.len(),
        }));
    }
    if state.jac.dim() != (n, n) {
        return Err(StatusCode::InvalidInput(InputError::JacobianShape {
            expected: n,
            found: state.jac.dim(),
        }));
    }
    // the norm of finite entries can still overflow
    if !all_finite(&state.f) || !state.norm_f.is_finite() {
        return Err(StatusCode::NumericalFailure(NonFinite::Residual));
    }
    if !all_finite(&state.jac) {
        return Err(StatusCode::NumericalFailure(NonFinite::Jacobian));
    }
    Ok(())
}

fn finish<R: Report>(status: Status, report: &mut R, verbose: usize) -> Status {
    if verbose > 0 {
        report.record(&Event::Finished(Summary::of(&status)));
    }
    status
}

/// Uses Newton's method with a particular [`LinearSolver`] to find a root of the given problem.
///
/// Every run ends with exactly one [`StatusCode`]:
/// - [`StatusCode::Converged`] if `‖F(x)‖ ≤ tol · max(1, ‖F(x0)‖)`,
/// - [`StatusCode::MaxSteps`] if `max_steps` steps were taken before that,
/// - [`StatusCode::StepTooSmall`] if a step `p` satisfies `‖p‖ < (1 + ‖x_prev‖) · step_tol`,
/// - [`StatusCode::InvalidInput`] for an empty `x0`, invalid tolerances or wrongly shaped
///   residuals or Jacobians (the problem is not evaluated if the first two apply),
/// - [`StatusCode::NumericalFailure`] if a step, residual or Jacobian contains NaN or Inf,
/// - [`StatusCode::UnclassifiedWarning`] if the linear solver reports an unknown condition.
///
/// Singular and ill-conditioned Newton systems are not fatal, the best-effort step of the
/// linear solver is used.
pub fn solve_with<P, L, R>(
    problem: &P,
    x0: &Array1<f64>,
    params: &Params,
    linear_solver: &L,
    mut report: R,
) -> Status
where
    P: Problem + ?Sized,
    L: LinearSolver + ?Sized,
    R: Report,
{
    let verbose = params.verbose;
    if let Err(err) = validate(x0, params) {
        let status = Status {
            code: StatusCode::InvalidInput(err),
            state: Iterate::empty(),
            norm_step: f64::NAN,
        };
        return finish(status, &mut report, verbose);
    }

    // initialize
    let x = x0.to_owned();
    let (f, jac) = evaluate(problem, &x);
    let norm_f = norm(&f);
    let mut state = Iterate {
        norm_x: norm(&x),
        x,
        f,
        jac,
        steps: 0,
        norm_f,
        norm_f0: norm_f,
    };
    let mut norm_step = f64::NAN;
    if let Err(code) = check_evaluation(&state) {
        let status = Status {
            code,
            state,
            norm_step,
        };
        return finish(status, &mut report, verbose);
    }

    let code = loop {
        // check for convergence
        if state.norm_f <= params.tol * state.norm_f0.max(1.0) {
            break StatusCode::Converged;
        }

        // handle step limit
        if state.steps >= params.max_steps {
            break StatusCode::MaxSteps;
        }

        // compute Newton step
        let rhs = state.f.mapv(|fi| -fi);
        let LinearStep { step, signal } = linear_solver.solve(&state.jac, &rhs);
        let condition = match signal {
            ConditionSignal::Normal => Condition::Normal,
            ConditionSignal::Singular => Condition::Singular,
            ConditionSignal::IllConditioned => Condition::IllConditioned,
            ConditionSignal::Other(reason) => break StatusCode::UnclassifiedWarning(reason),
        };
        if step.len() != state.x.len() {
            break StatusCode::UnclassifiedWarning(format!(
                "linear solver returned a step of length {}, expected {}",
                step.len(),
                state.x.len()
            ));
        }
        if !all_finite(&step) {
            break StatusCode::NumericalFailure(NonFinite::Step);
        }

        // update point
        let norm_x_prev = state.norm_x;
        state.steps += 1;
        state.x += &step;
        state.norm_x = norm(&state.x);
        let (f, jac) = evaluate(problem, &state.x);
        state.f = f;
        state.jac = jac;
        state.norm_f = norm(&state.f);
        norm_step = norm(&step);
        if let Err(code) = check_evaluation(&state) {
            break code;
        }
        trace!(
            "step {}: |F| = {:e}, |x| = {:e}, |p| = {:e}",
            state.steps,
            state.norm_f,
            state.norm_x,
            norm_step
        );

        // handle progress output
        if verbose > 0 {
            report.record(&Event::Step(StepDiagnostic {
                iter: state.steps,
                norm_f: state.norm_f,
                norm_x: state.norm_x,
                norm_step,
                condition,
            }));
        }

        // check for stagnation
        if norm_step < (1.0 + norm_x_prev) * params.step_tol {
            break StatusCode::StepTooSmall;
        }
    };

    finish(
        Status {
            code,
            state,
            norm_step,
        },
        &mut report,
        verbose,
    )
}
