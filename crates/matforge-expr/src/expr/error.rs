//! Expression construction errors.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinearExprError {
    MismatchedLengths { variables: usize, coefficients: usize },
}

impl LinearExprError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            LinearExprError::MismatchedLengths { .. } => "EXPR_MISMATCHED_LENGTHS",
        }
    }
}

impl std::fmt::Display for LinearExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinearExprError::MismatchedLengths {
                variables,
                coefficients,
            } => write!(
                f,
                "[{}] {} variables but {} coefficients",
                self.code(),
                variables,
                coefficients
            ),
        }
    }
}

impl std::error::Error for LinearExprError {}
