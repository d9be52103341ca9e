//! Signed cofactors of the stacked generator rows.
//!
//! At step `m` a composition `parts` stacks the first `parts[i]` rows of the
//! `i`-th participating matrix into an `m x m` matrix whose last column holds
//! the unknowns. Expanding its determinant along that column gives
//! `sum_j cofactor_j * x_j`, with each cofactor a constant `(m-1) x (m-1)`
//! minor of already committed columns.

use matforge_expr::{Expr, Storage, VariableId};

use crate::field::{FieldArithmetic, FieldElement};
use crate::matrix::GfMatrix;

/// `(matrix index, row)` of every stacked row, in stacking order.
pub(crate) fn stacked_rows(parts: &[usize]) -> Vec<(usize, usize)> {
    parts
        .iter()
        .enumerate()
        .flat_map(|(matrix, count)| (0..*count).map(move |row| (matrix, row)))
        .collect()
}

/// Cofactors along the unknown column, reduced into `[0, q)`.
///
/// Rows past a matrix's size read as zero.
pub(crate) fn cofactors<F: FieldArithmetic + ?Sized>(
    field: &F,
    matrices: &[&GfMatrix],
    parts: &[usize],
) -> Vec<FieldElement> {
    let rows = stacked_rows(parts);
    let m = rows.len();
    if m == 0 {
        return Vec::new();
    }
    let n = m - 1;

    let copy_row = |minor: &mut GfMatrix, slot: usize, (matrix, row): (usize, usize)| {
        for column in 0..n {
            let value = matrices[matrix].get_or_zero(row, column);
            let written = minor.set(slot, column, value);
            debug_assert!(written.is_ok(), "minor slot {slot} column {column} outside {n}x{n}");
        }
    };

    // The minor starts as every stacked row but the first. Overwriting slot
    // `j` with stacked row `j` then drops row `j + 1` instead.
    let mut minor = GfMatrix::new(n);
    for (slot, row) in rows.iter().skip(1).enumerate() {
        copy_row(&mut minor, slot, *row);
    }

    let mut positive = (m + 1) % 2 == 0;
    let mut result = Vec::with_capacity(m);
    for (index, row) in rows.iter().enumerate() {
        let det = minor.determinant(field);
        result.push(if positive { det } else { field.neg(det) });
        positive = !positive;
        if index + 1 < m {
            copy_row(&mut minor, index, *row);
        }
    }
    result
}

/// `sum_j cofactor_j * x[row_j + dim_j * m]` for the unknowns of step `m`.
///
/// `dims[i]` is the global dimension of the `i`-th participating matrix;
/// `unknowns` holds `m` variables per dimension, dimension-major.
pub(crate) fn determinant_expr<S: Storage, F: FieldArithmetic + ?Sized>(
    field: &F,
    matrices: &[&GfMatrix],
    parts: &[usize],
    dims: &[usize],
    unknowns: &[VariableId],
) -> Expr<S> {
    let m: usize = parts.iter().sum();
    let rows = stacked_rows(parts);
    let mut det = Expr::new_empty();
    for (cofactor, (matrix, row)) in cofactors(field, matrices, parts).into_iter().zip(rows) {
        if let Some(var_id) = unknowns.get(row + dims[matrix] * m) {
            det.push_term(*var_id, i64::from(cofactor));
        }
    }
    det
}
