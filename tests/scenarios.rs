use approx::{assert_abs_diff_eq, assert_relative_eq};
use ndarray::prelude::*;

use newtsolve::error::InputError;
use newtsolve::linalg::Dense;
use newtsolve::newton::{self, Condition, Console, Event, Logger, Params};
use newtsolve::problem::{FnProblem, Problem};
use newtsolve::StatusCode;

fn squares() -> impl Problem {
    FnProblem::new(
        |x: &Array1<f64>| x.mapv(|xi| xi * xi - 4.0),
        |x: &Array1<f64>| Array2::from_diag(&x.mapv(|xi| 2.0 * xi)),
    )
}

/// `F(x) = (e^s, e^s)` with `s = x₀ + x₁`, the Jacobian `e^s [[1, 1], [1, 1]]` is singular everywhere
fn exponential_pair() -> impl Problem {
    FnProblem::new(
        |x: &Array1<f64>| {
            let e = x.sum().exp();
            array![e, e]
        },
        |x: &Array1<f64>| x.sum().exp() * Array2::ones((2, 2)),
    )
}

#[test]
fn square_root_of_four() {
    let params = Params::new().with_tol(1e-10).with_max_steps(50);
    let status = newton::solve(&squares(), &array![1.0], &params, ());
    assert_eq!(status.code, StatusCode::Converged);
    assert!(status.steps() < 10);
    assert_relative_eq!(status.x()[0], 2.0, max_relative = 1e-10);
}

#[test]
fn negative_basin() {
    let params = Params::new().with_tol(1e-10);
    let status = newton::solve(&squares(), &array![-0.5], &params, ());
    assert_eq!(status.code, StatusCode::Converged);
    assert_relative_eq!(status.x()[0], -2.0, max_relative = 1e-10);
}

#[test]
fn empty_initial_guess() {
    let status = newton::solve(&squares(), &Array1::zeros(0), &Params::new(), ());
    assert_eq!(
        status.code,
        StatusCode::InvalidInput(InputError::EmptyInitialGuess)
    );
    assert_eq!(status.steps(), 0);
}

#[test]
fn singular_everywhere_runs_into_step_limit() {
    let params = Params::new()
        .with_tol(1e-10)
        .with_max_steps(5)
        .with_verbose(1);
    let mut diagnostics = Vec::new();
    let report = |event: &Event<'_>| {
        if let Event::Step(diag) = event {
            diagnostics.push(*diag);
        }
    };
    let status = newton::solve_with(
        &exponential_pair(),
        &array![0.0, 0.0],
        &params,
        &Dense,
        report,
    );

    assert_eq!(status.code, StatusCode::MaxSteps);
    assert_eq!(status.steps(), 5);
    assert_eq!(diagnostics.len(), 5);
    assert!(diagnostics
        .iter()
        .all(|diag| diag.condition == Condition::Singular));
    // every least-squares step lowers x₀ + x₁ by (almost) one
    assert_abs_diff_eq!(status.x().sum(), -5.0, epsilon = 1e-5);
}

#[test]
fn singular_everywhere_with_default_solver() {
    let params = Params::new().with_tol(1e-10).with_max_steps(5);
    let status = newton::solve(&exponential_pair(), &array![0.0, 0.0], &params, ());
    assert_eq!(status.code, StatusCode::MaxSteps);
    assert_eq!(status.steps(), 5);
}

#[test]
fn solves_nonlinear_system() {
    // intersection of the unit circle with the line x₀ = x₁
    let problem = FnProblem::new(
        |x: &Array1<f64>| array![x[0] * x[0] + x[1] * x[1] - 1.0, x[0] - x[1]],
        |x: &Array1<f64>| array![[2.0 * x[0], 2.0 * x[1]], [1.0, -1.0]],
    );
    let params = Params::new().with_tol(1e-10);
    let status = newton::solve(&problem, &array![1.0, 0.5], &params, ());
    assert_eq!(status.code, StatusCode::Converged);
    let root = 0.5_f64.sqrt();
    assert_relative_eq!(status.x()[0], root, max_relative = 1e-10);
    assert_relative_eq!(status.x()[1], root, max_relative = 1e-10);
}

#[test]
fn builtin_reports_do_not_change_result() {
    let params = Params::new().with_tol(1e-10).with_verbose(1);
    let quiet = newton::solve(&squares(), &array![1.0, 3.0], &params, ());
    let console = newton::solve(&squares(), &array![1.0, 3.0], &params, Console::every(2));
    let logged = newton::solve(&squares(), &array![1.0, 3.0], &params, Logger);
    assert_eq!(quiet.code, console.code);
    assert_eq!(quiet.x(), console.x());
    assert_eq!(quiet.x(), logged.x());
}

#[test]
fn status_serializes() {
    let status = newton::solve(&squares(), &array![1.0], &Params::new(), ());
    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["code"], "Converged");
    assert_eq!(json["state"]["steps"], status.steps());
}
