//! Thin wrapper around a HiGHS row problem.

use std::fmt;

use highs::{Col, RowProblem, Sense as HighsSense};
use matforge_solver::SolverStatus;
use tracing::{debug, trace, warn};

use crate::status::map_status;

/// Errors returned by the HiGHS model wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighsModelError {
    ColumnCoefficientLengthMismatch {
        columns: usize,
        coefficients: usize,
    },
    ColumnIndexOutOfBounds {
        column_index: usize,
        num_columns: usize,
    },
}

impl HighsModelError {
    pub fn code(&self) -> &'static str {
        match self {
            HighsModelError::ColumnCoefficientLengthMismatch { .. } => "HIGHS_ROW_LENGTH_MISMATCH",
            HighsModelError::ColumnIndexOutOfBounds { .. } => "HIGHS_COLUMN_OUT_OF_BOUNDS",
        }
    }
}

impl fmt::Display for HighsModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighsModelError::ColumnCoefficientLengthMismatch {
                columns,
                coefficients,
            } => write!(
                f,
                "[{}] Row lists {} columns but {} coefficients",
                self.code(),
                columns,
                coefficients
            ),
            HighsModelError::ColumnIndexOutOfBounds {
                column_index,
                num_columns,
            } => write!(
                f,
                "[{}] Column {} does not exist ({} columns)",
                self.code(),
                column_index,
                num_columns
            ),
        }
    }
}

impl std::error::Error for HighsModelError {}

/// Option value types for HiGHS solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum HighsOption {
    Bool(bool),
    Int(i32),
    Float(f64),
    Str(String),
}

/// Status and primal values of a finished solve.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolverStatus,
    pub values: Vec<f64>,
    pub objective_value: f64,
}

/// Minimizing integer program under construction.
pub struct HighsModel {
    problem: RowProblem,
    columns: Vec<Col>,
    log_to_console: bool,
    options: Vec<(String, HighsOption)>,
    verbosity: Option<u32>,
}

impl HighsModel {
    pub fn new() -> Self {
        debug!(
            component = "solver",
            operation = "init_highs",
            status = "success",
            "Creating new HiGHS model"
        );
        HighsModel {
            problem: RowProblem::default(),
            columns: Vec::new(),
            log_to_console: false,
            options: Vec::new(),
            verbosity: None,
        }
    }

    /// Add an integer column and return its index.
    pub fn add_integer_col(&mut self, lower_bound: f64, upper_bound: f64, cost: f64) -> usize {
        trace!(
            lower_bound,
            upper_bound,
            cost,
            component = "solver",
            operation = "add_column",
            status = "success",
            "Adding integer column"
        );
        let col = self
            .problem
            .add_integer_column(cost, lower_bound..=upper_bound);
        self.columns.push(col);
        self.columns.len() - 1
    }

    /// Add a row `lower_bound <= Σ coeff·col <= upper_bound`.
    ///
    /// # Errors
    ///
    /// Returns an error if columns and coefficients have different lengths
    /// or if any column index is out of bounds.
    pub fn add_row(
        &mut self,
        lower_bound: f64,
        upper_bound: f64,
        columns: &[usize],
        coefficients: &[f64],
    ) -> Result<usize, HighsModelError> {
        if columns.len() != coefficients.len() {
            warn!(
                component = "solver",
                operation = "add_row",
                status = "error",
                columns = columns.len(),
                coefficients = coefficients.len(),
                "Column/coefficients length mismatch"
            );
            return Err(HighsModelError::ColumnCoefficientLengthMismatch {
                columns: columns.len(),
                coefficients: coefficients.len(),
            });
        }
        let num_columns = self.columns.len();
        let mut factors = Vec::with_capacity(columns.len());
        for (col_idx, coeff) in columns.iter().copied().zip(coefficients.iter().copied()) {
            let col = *self
                .columns
                .get(col_idx)
                .ok_or(HighsModelError::ColumnIndexOutOfBounds {
                    column_index: col_idx,
                    num_columns,
                })?;
            factors.push((col, coeff));
        }
        self.problem.add_row(lower_bound..=upper_bound, factors);
        Ok(self.problem.num_rows().saturating_sub(1))
    }

    pub fn set_log_to_console(&mut self, enabled: bool) {
        self.log_to_console = enabled;
    }

    /// Set a HiGHS option for the solve.
    pub fn set_option(&mut self, option: impl Into<String>, value: HighsOption) {
        self.options.push((option.into(), value));
    }

    pub fn set_verbosity(&mut self, level: u32) {
        self.verbosity = Some(level);
    }

    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    pub fn rows(&self) -> usize {
        self.problem.num_rows()
    }

    /// Minimize and consume the problem.
    pub fn solve(self) -> SolveOutcome {
        debug!(
            num_cols = self.problem.num_cols(),
            num_rows = self.problem.num_rows(),
            component = "solver",
            operation = "solve",
            status = "success",
            "Solving model"
        );

        let mut model = self.problem.optimise(HighsSense::Minimise);
        if self.verbosity.unwrap_or(0) == 0 && !self.log_to_console {
            model.make_quiet();
        }
        if let Some(level) = self.verbosity {
            model.set_option("output_flag", level > 0);
        }
        for (option, value) in self.options {
            match value {
                HighsOption::Bool(val) => model.set_option(option.as_str(), val),
                HighsOption::Int(val) => model.set_option(option.as_str(), val),
                HighsOption::Float(val) => model.set_option(option.as_str(), val),
                HighsOption::Str(val) => model.set_option(option.as_str(), val.as_str()),
            }
        }
        if self.log_to_console {
            model.set_option("log_to_console", true);
            model.set_option("output_flag", true);
        }

        let solved = model.solve();
        let status = map_status(solved.status());
        trace!(
            component = "solver",
            operation = "solve",
            status = "success",
            solver_status = status.as_str(),
            "Solution status received"
        );
        SolveOutcome {
            status,
            values: solved.get_solution().columns().to_vec(),
            objective_value: solved.objective_value(),
        }
    }
}

impl Default for HighsModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HighsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighsModel")
            .field("num_variables", &self.problem.num_cols())
            .field("num_constraints", &self.problem.num_rows())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
