//! Shared solver abstractions for matforge.
//!
//! Backends (like `matforge-highs`) implement [`Solver`]; the construction
//! loop only ever talks to that trait.
//!
//! # Overview
//!
//! - [`SolverConfig`]: Configuration options for solver behavior
//! - [`SolverStatus`]: Common status values across solvers
//! - [`SolverError`]: Error types for solver operations
//! - [`Solver`]: Trait for solver implementations

mod config;
mod error;
mod status;
mod traits;

pub use config::SolverConfig;
pub use error::SolverError;
pub use status::SolverStatus;
pub use traits::{Solver, check_assignment};
