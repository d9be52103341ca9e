//! Builder functions for constructing linear expressions.

use crate::expr::core::Expr;
use crate::expr::error::LinearExprError;
use crate::ids::VariableId;
use crate::storage::Storage;

/// Build an expression from parallel variable and coefficient lists.
///
/// Repeated variables accumulate. Returns an error if lengths differ.
pub fn linear_terms<S: Storage>(
    variables: &[VariableId],
    coefficients: &[i64],
) -> Result<Expr<S>, LinearExprError> {
    if variables.len() != coefficients.len() {
        return Err(LinearExprError::MismatchedLengths {
            variables: variables.len(),
            coefficients: coefficients.len(),
        });
    }
    let mut expr = Expr::new_empty();
    for (var_id, coeff) in variables.iter().zip(coefficients) {
        expr.push_term(*var_id, *coeff);
    }
    Ok(expr)
}

/// Sum several expressions, coefficients and shifts alike.
pub fn linear_sum<S: Storage>(exprs: impl IntoIterator<Item = Expr<S>>) -> Expr<S> {
    let mut total = Expr::new_empty();
    for expr in exprs {
        total.push_expr(&expr);
    }
    total
}
