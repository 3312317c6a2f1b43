//! Progress reporting of Newton's method
//!
//! The solver sends an [`Event`] to a [`Report`] after every step and once on termination,
//! as long as [`Params::verbose`](super::Params::verbose) is positive. Reports only observe the
//! iteration, they cannot change its course.
//!
//! Closures `FnMut(&Event)` implement [`Report`], and `()` is a report that ignores everything.
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::status::{Status, StatusCode};

/// Condition of the Newton system solved in a step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// No issue
    Normal,
    /// Exactly singular Jacobian
    Singular,
    /// Nearly singular Jacobian
    IllConditioned,
}

impl Condition {
    fn symbol(self) -> &'static str {
        match self {
            Condition::Normal => "N",
            Condition::Singular => "S",
            Condition::IllConditioned => "I",
        }
    }
}

/// Record of a single Newton step
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepDiagnostic {
    /// Step counter (1-based)
    pub iter: usize,
    /// Residual norm after the step
    pub norm_f: f64,
    /// Norm of the point after the step
    pub norm_x: f64,
    /// Norm of the step
    pub norm_step: f64,
    /// Condition of the solved system
    pub condition: Condition,
}

/// Sizes of point and step when the iteration stagnates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stall {
    /// Norm of the final point
    pub norm_x: f64,
    /// Norm of the last step
    pub norm_step: f64,
}

/// Summary of a finished run
#[derive(Clone, Debug, Serialize)]
pub struct Summary<'a> {
    /// Outcome of the run
    pub code: &'a StatusCode,
    /// Number of conducted steps
    pub steps: usize,
    /// Final residual norm
    pub norm_f: f64,
    /// Only set for [`StatusCode::StepTooSmall`]
    pub stall: Option<Stall>,
}

impl<'a> Summary<'a> {
    /// Summarizes a status.
    pub fn of(status: &'a Status) -> Self {
        let stall = match status.code {
            StatusCode::StepTooSmall => Some(Stall {
                norm_x: status.state.norm_x,
                norm_step: status.norm_step,
            }),
            _ => None,
        };
        Summary {
            code: &status.code,
            steps: status.state.steps,
            norm_f: status.state.norm_f,
            stall,
        }
    }
}

/// Event emitted by the solver
#[derive(Clone, Debug)]
pub enum Event<'a> {
    /// A step was taken.
    Step(StepDiagnostic),
    /// The run terminated.
    Finished(Summary<'a>),
}

/// Receives solver events.
pub trait Report {
    /// Records an event.
    fn record(&mut self, event: &Event<'_>);
}

impl<F> Report for F
where
    F: FnMut(&Event<'_>),
{
    fn record(&mut self, event: &Event<'_>) {
        self(event)
    }
}

/// A report that ignores all events.
impl Report for () {
    fn record(&mut self, _event: &Event<'_>) {}
}

/// Prints a progress table to stdout.
#[derive(Debug)]
pub struct Console {
    every: usize,
    header: bool,
}

impl Console {
    /// Creates a report printing every step.
    pub fn new() -> Self {
        Self::every(1)
    }

    /// Creates a report printing every `k`th step (and always the summary).
    pub fn every(k: usize) -> Self {
        Console {
            every: k.max(1),
            header: false,
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Report for Console {
    fn record(&mut self, event: &Event<'_>) {
        match event {
            Event::Step(diag) => {
                if !self.header {
                    self.header = true;
                    println!(
                        "{:>10} {:>12} {:>12} {:>12} {:>4}",
                        "step", "|F|", "|x|", "|p|", "cond",
                    );
                }
                if diag.iter % self.every == 0 {
                    println!(
                        "{:10} {:12.4e} {:12.4e} {:12.4e} {:>4}",
                        diag.iter,
                        diag.norm_f,
                        diag.norm_x,
                        diag.norm_step,
                        diag.condition.symbol(),
                    );
                }
            }
            Event::Finished(summary) => {
                println!(
                    "{} after {} steps, |F| = {:.4e}",
                    summary.code.message(),
                    summary.steps,
                    summary.norm_f,
                );
                if let Some(stall) = summary.stall {
                    println!(
                        "|x| = {:.4e}, |p| = {:.4e}",
                        stall.norm_x, stall.norm_step
                    );
                }
            }
        }
    }
}

/// Forwards events to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct Logger;

impl Report for Logger {
    fn record(&mut self, event: &Event<'_>) {
        match event {
            Event::Step(diag) => debug!(
                "step {}: |F| = {:.4e}, |x| = {:.4e}, |p| = {:.4e}, {:?}",
                diag.iter, diag.norm_f, diag.norm_x, diag.norm_step, diag.condition
            ),
            Event::Finished(summary) if summary.code.is_failure() => warn!(
                "{} after {} steps, |F| = {:.4e}",
                summary.code.message(),
                summary.steps,
                summary.norm_f
            ),
            Event::Finished(summary) => info!(
                "{} after {} steps, |F| = {:.4e}",
                summary.code.message(),
                summary.steps,
                summary.norm_f
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Iterate;

    #[test]
    fn summary_reports_stall_only_for_small_steps() {
        let mut status = Status {
            code: StatusCode::StepTooSmall,
            state: Iterate::empty(),
            norm_step: 1e-12,
        };
        status.state.norm_x = 2.0;
        let summary = Summary::of(&status);
        assert_eq!(
            summary.stall,
            Some(Stall {
                norm_x: 2.0,
                norm_step: 1e-12
            })
        );

        status.code = StatusCode::MaxSteps;
        assert_eq!(Summary::of(&status).stall, None);
    }

    #[test]
    fn summary_serializes() {
        let mut status = Status {
            code: StatusCode::StepTooSmall,
            state: Iterate::empty(),
            norm_step: 0.25,
        };
        status.state.steps = 7;
        status.state.norm_f = 1.0;
        status.state.norm_x = 2.0;
        let json = serde_json::to_value(Summary::of(&status)).unwrap();
        assert_eq!(json["code"], "StepTooSmall");
        assert_eq!(json["steps"], 7);
        assert_eq!(json["stall"]["norm_step"], 0.25);
        assert_eq!(json["stall"]["norm_x"], 2.0);
    }

    #[test]
    fn closures_are_reports() {
        let mut steps = Vec::new();
        let mut report = |event: &Event<'_>| {
            if let Event::Step(diag) = event {
                steps.push(diag.iter);
            }
        };
        let diag = StepDiagnostic {
            iter: 3,
            norm_f: 1.0,
            norm_x: 1.0,
            norm_step: 0.5,
            condition: Condition::Normal,
        };
        report.record(&Event::Step(diag));
        assert_eq!(steps, vec![3]);
    }
}
