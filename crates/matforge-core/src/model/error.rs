//! Model and export error types.

use matforge_expr::{ComparisonKind, ConstraintId, VariableId};

/// Errors that can occur during model operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Invalid variable ID
    InvalidVariableId(VariableId),
    /// Invalid variable bounds
    InvalidVariableBounds { lower: i64, upper: i64 },
    /// Invalid constraint ID
    InvalidConstraintId(ConstraintId),
    /// Empty category prefix
    EmptyPrefix,
    /// Objective already set
    MultipleObjectives,
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::InvalidVariableId(_) => "VARIABLE_INVALID_ID",
            ModelError::InvalidVariableBounds { .. } => "VARIABLE_INVALID_BOUNDS",
            ModelError::InvalidConstraintId(_) => "CONSTRAINT_INVALID_ID",
            ModelError::EmptyPrefix => "NAME_EMPTY_PREFIX",
            ModelError::MultipleObjectives => "OBJECTIVE_ALREADY_SET",
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::InvalidVariableId(id) => write!(
                f,
                "[{}] Variable ID {} does not exist",
                self.code(),
                id.inner()
            ),
            ModelError::InvalidVariableBounds { lower, upper } => write!(
                f,
                "[{}] Variable bounds invalid: lower ({}) > upper ({})",
                self.code(),
                lower,
                upper
            ),
            ModelError::InvalidConstraintId(id) => write!(
                f,
                "[{}] Constraint ID {} does not exist",
                self.code(),
                id.inner()
            ),
            ModelError::EmptyPrefix => {
                write!(f, "[{}] Name prefix must not be empty", self.code())
            }
            ModelError::MultipleObjectives => write!(
                f,
                "[{}] Model already has an objective; use set_objective to replace",
                self.code()
            ),
        }
    }
}

impl std::error::Error for ModelError {}

/// Errors raised while rendering a model to a text format.
///
/// A failed export yields no document at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A variable or row name does not fit the fixed column width.
    NameTooLong { name: String, limit: usize },
    /// The row's comparison has no representation in the format.
    UnsupportedComparison {
        constraint: String,
        kind: ComparisonKind,
    },
}

impl FormatError {
    pub fn code(&self) -> &'static str {
        match self {
            FormatError::NameTooLong { .. } => "FORMAT_NAME_TOO_LONG",
            FormatError::UnsupportedComparison { .. } => "FORMAT_UNSUPPORTED_COMPARISON",
        }
    }
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::NameTooLong { name, limit } => write!(
                f,
                "[{}] Name '{}' exceeds {} characters",
                self.code(),
                name,
                limit
            ),
            FormatError::UnsupportedComparison { constraint, kind } => write!(
                f,
                "[{}] Constraint '{}' uses comparison '{}' which cannot be exported",
                self.code(),
                constraint,
                kind.symbol()
            ),
        }
    }
}

impl std::error::Error for FormatError {}
