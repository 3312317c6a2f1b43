//! Plain (undamped) Newton's method

mod params;
pub mod report;
mod solve;

pub use self::params::Params;
pub use self::report::{Condition, Console, Event, Logger, Report, StepDiagnostic};
pub use solve::{solve, solve_with};
