//! Solver error types.

use crate::SolverStatus;

/// Error type for solver operations.
///
/// The construction loop treats every variant as an infeasible round.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Model has no variables.
    EmptyModel,
    /// Backend rejected the model or an option.
    Backend(String),
    /// Solve finished without a usable assignment.
    NoSolution { status: SolverStatus },
    /// Backend returned a different number of values than variables.
    SolutionLength { expected: usize, actual: usize },
    /// A returned value is not (close to) an integer.
    NonIntegral { index: usize, value: f64 },
    /// Returned assignment violates a bound or constraint.
    InvalidAssignment { reason: String },
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::EmptyModel => "MODEL_EMPTY",
            SolverError::Backend(_) => "SOLVER_INTERNAL",
            SolverError::NoSolution { status } => match status {
                SolverStatus::Infeasible => "SOLVER_INFEASIBLE",
                SolverStatus::Unbounded => "SOLVER_UNBOUNDED",
                SolverStatus::ReachedTimeLimit => "SOLVER_TIME_LIMIT",
                _ => "SOLVER_NO_SOLUTION",
            },
            SolverError::SolutionLength { .. } => "SOLUTION_LENGTH_MISMATCH",
            SolverError::NonIntegral { .. } => "SOLUTION_NON_INTEGRAL",
            SolverError::InvalidAssignment { .. } => "SOLUTION_INVALID",
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::EmptyModel => write!(f, "[{}] Model has no variables", self.code()),
            SolverError::Backend(msg) => {
                write!(f, "[{}] Solver internal error: {}", self.code(), msg)
            }
            SolverError::NoSolution { status } => {
                write!(f, "[{}] No solution (status: {})", self.code(), status)
            }
            SolverError::SolutionLength { expected, actual } => write!(
                f,
                "[{}] Expected {} values, solver returned {}",
                self.code(),
                expected,
                actual
            ),
            SolverError::NonIntegral { index, value } => write!(
                f,
                "[{}] Value {} of variable {} is not integral",
                self.code(),
                value,
                index
            ),
            SolverError::InvalidAssignment { reason } => {
                write!(f, "[{}] {}", self.code(), reason)
            }
        }
    }
}

impl std::error::Error for SolverError {}
