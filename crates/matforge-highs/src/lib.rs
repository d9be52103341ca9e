//! HiGHS backend for the matforge solve boundary.
//!
//! [`HighsSolver`] lowers a `matforge_core::Model` into a HiGHS row problem,
//! solves it as a pure integer program and hands back one integer per
//! variable.

pub mod problem;
pub mod solver;
mod status;

pub use problem::{HighsModel, HighsModelError, HighsOption, SolveOutcome};
pub use solver::HighsSolver;
