//! Core expression type: coefficient storage + integer shift.
//!
//! `Expr` is affine: `Σ coeff·var + shift`. Every binary operation works on a
//! fresh copy, so combining an expression with itself behaves like combining
//! two equal but distinct expressions.

use crate::expr::constraint::{ComparisonKind, Constraint};
use crate::ids::VariableId;
use crate::storage::{SparseStorage, Storage};

#[derive(Debug, Clone, Default)]
pub struct Expr<S: Storage = SparseStorage> {
    coefficients: S,
    shift: i64,
}

impl<S: Storage> Expr<S> {
    // ── Constructors ────────────────────────────────────────

    /// Empty expression (all zeros).
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Single variable with coefficient 1.
    pub fn from_variable(var_id: VariableId) -> Self {
        Self::term(var_id, 1)
    }

    /// Single term: coeff * var.
    pub fn term(var_id: VariableId, coeff: i64) -> Self {
        let mut expr = Self::default();
        expr.push_term(var_id, coeff);
        expr
    }

    /// Just a constant, no variable terms.
    pub fn from_constant(shift: i64) -> Self {
        Self {
            coefficients: S::default(),
            shift,
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn shift(&self) -> i64 {
        self.shift
    }

    pub fn coefficients(&self) -> &S {
        &self.coefficients
    }

    pub fn coeff(&self, var_id: VariableId) -> i64 {
        self.coefficients.coeff(var_id)
    }

    /// Nonzero terms in ascending variable order.
    pub fn terms(&self) -> Vec<(VariableId, i64)> {
        self.coefficients.terms()
    }

    /// True when no coefficient is nonzero and the shift is zero.
    pub fn is_zero(&self) -> bool {
        self.shift == 0 && self.coefficients.is_zero()
    }

    /// Consume and return (coefficients, shift).
    pub fn into_parts(self) -> (S, i64) {
        (self.coefficients, self.shift)
    }

    // ── In-place accumulation ───────────────────────────────

    pub fn push_term(&mut self, var_id: VariableId, coeff: i64) {
        if coeff != 0 {
            self.coefficients.add(var_id, coeff);
        }
    }

    pub fn push_constant(&mut self, value: i64) {
        self.shift += value;
    }

    pub fn push_expr(&mut self, other: &Expr<S>) {
        self.coefficients.merge(&other.coefficients);
        self.shift += other.shift;
    }

    // ── Value-style operations ──────────────────────────────

    pub fn add(&self, other: &Expr<S>) -> Self {
        let mut sum = self.clone();
        sum.push_expr(other);
        sum
    }

    pub fn sub(&self, other: &Expr<S>) -> Self {
        self.add(&other.scale(-1))
    }

    /// Scale every coefficient and the shift.
    pub fn scale(&self, by: i64) -> Self {
        let mut coefficients = self.coefficients.clone();
        coefficients.times(by);
        Self {
            coefficients,
            shift: self.shift * by,
        }
    }

    pub fn add_constant(&self, value: i64) -> Self {
        Self {
            coefficients: self.coefficients.clone(),
            shift: self.shift + value,
        }
    }

    /// Value of the expression under a full assignment indexed by variable position.
    pub fn evaluate(&self, values: &[i64]) -> i64 {
        self.coefficients
            .terms()
            .into_iter()
            .map(|(var_id, coeff)| coeff * values.get(var_id.index()).copied().unwrap_or(0))
            .sum::<i64>()
            + self.shift
    }

    // ── Comparison methods (produce Constraint) ─────────────

    pub fn compare_scalar(&self, kind: ComparisonKind, rhs: i64) -> Constraint<S> {
        Constraint::new(kind, self.coefficients.clone(), rhs - self.shift)
    }

    pub fn compare_expr(&self, kind: ComparisonKind, other: &Expr<S>) -> Constraint<S> {
        self.sub(other).compare_scalar(kind, 0)
    }

    pub fn eq_scalar(&self, rhs: i64) -> Constraint<S> {
        self.compare_scalar(ComparisonKind::Equal, rhs)
    }

    pub fn ne_scalar(&self, rhs: i64) -> Constraint<S> {
        self.compare_scalar(ComparisonKind::NotEqual, rhs)
    }

    pub fn gt_scalar(&self, rhs: i64) -> Constraint<S> {
        self.compare_scalar(ComparisonKind::Greater, rhs)
    }

    pub fn ge_scalar(&self, rhs: i64) -> Constraint<S> {
        self.compare_scalar(ComparisonKind::GreaterEqual, rhs)
    }

    pub fn lt_scalar(&self, rhs: i64) -> Constraint<S> {
        self.compare_scalar(ComparisonKind::Lower, rhs)
    }

    pub fn le_scalar(&self, rhs: i64) -> Constraint<S> {
        self.compare_scalar(ComparisonKind::LowerEqual, rhs)
    }

    pub fn eq_expr(&self, rhs: &Expr<S>) -> Constraint<S> {
        self.compare_expr(ComparisonKind::Equal, rhs)
    }

    pub fn ne_expr(&self, rhs: &Expr<S>) -> Constraint<S> {
        self.compare_expr(ComparisonKind::NotEqual, rhs)
    }

    pub fn gt_expr(&self, rhs: &Expr<S>) -> Constraint<S> {
        self.compare_expr(ComparisonKind::Greater, rhs)
    }

    pub fn ge_expr(&self, rhs: &Expr<S>) -> Constraint<S> {
        self.compare_expr(ComparisonKind::GreaterEqual, rhs)
    }

    pub fn lt_expr(&self, rhs: &Expr<S>) -> Constraint<S> {
        self.compare_expr(ComparisonKind::Lower, rhs)
    }

    pub fn le_expr(&self, rhs: &Expr<S>) -> Constraint<S> {
        self.compare_expr(ComparisonKind::LowerEqual, rhs)
    }
}

impl<S: Storage> From<VariableId> for Expr<S> {
    fn from(var_id: VariableId) -> Self {
        Expr::from_variable(var_id)
    }
}

// ── Operator overloads ──────────────────────────────────────

impl<S: Storage> std::ops::Add for Expr<S> {
    type Output = Expr<S>;

    fn add(self, rhs: Expr<S>) -> Self::Output {
        Expr::add(&self, &rhs)
    }
}

impl<S: Storage> std::ops::Sub for Expr<S> {
    type Output = Expr<S>;

    fn sub(self, rhs: Expr<S>) -> Self::Output {
        Expr::sub(&self, &rhs)
    }
}

impl<S: Storage> std::ops::Mul<i64> for Expr<S> {
    type Output = Expr<S>;

    fn mul(self, rhs: i64) -> Self::Output {
        self.scale(rhs)
    }
}

impl<S: Storage> std::ops::Neg for Expr<S> {
    type Output = Expr<S>;

    fn neg(self) -> Self::Output {
        self.scale(-1)
    }
}

#[cfg(test)]
mod tests {
    use crate::VariableId;
    use crate::expr::{ComparisonKind, Constraint, Expr, LinearExprError, linear_sum, linear_terms};
    use crate::storage::{DenseStorage, SparseStorage, Storage};

    fn x() -> VariableId {
        VariableId::new(1)
    }

    fn y() -> VariableId {
        VariableId::new(2)
    }

    fn sample<S: Storage>() -> Expr<S> {
        Expr::term(x(), 3).add(&Expr::term(y(), -2)).add_constant(7)
    }

    fn same_constraint<S: Storage>(a: &Constraint<S>, b: &Constraint<S>) -> bool {
        a.kind() == b.kind() && a.rhs() == b.rhs() && a.terms() == b.terms()
    }

    #[test]
    fn from_constant() {
        let e: Expr = Expr::from_constant(5);
        assert_eq!(e.shift(), 5);
        assert!(e.terms().is_empty());
    }

    #[test]
    fn add_constant_keeps_terms() {
        let e: Expr = Expr::from_variable(x()).add_constant(3);
        assert_eq!(e.shift(), 3);
        assert_eq!(e.terms(), vec![(x(), 1)]);
    }

    #[test]
    fn scale_applies_to_shift() {
        let scaled = sample::<SparseStorage>().scale(2);
        assert_eq!(scaled.shift(), 14);
        assert_eq!(scaled.terms(), vec![(x(), 6), (y(), -4)]);
    }

    #[test]
    fn self_difference_is_zero() {
        let sparse = sample::<SparseStorage>();
        assert!(sparse.sub(&sparse).is_zero());

        let dense = sample::<DenseStorage>();
        let diff = dense.clone() - dense;
        assert!(diff.is_zero());
        assert!(diff.terms().is_empty());
    }

    #[test]
    fn self_sum_doubles() {
        let e = sample::<SparseStorage>();
        let doubled = e.add(&e);
        assert_eq!(doubled.terms(), e.scale(2).terms());
        assert_eq!(doubled.shift(), 14);
    }

    #[test]
    fn le_scalar_moves_shift_to_rhs() {
        let e: Expr = Expr::from_variable(x()).add_constant(3);
        let c = e.le_scalar(10);
        assert_eq!(c.kind(), ComparisonKind::LowerEqual);
        assert_eq!(c.rhs(), 7);
    }

    #[test]
    fn ge_expr_subtracts_sides() {
        let lhs: Expr = Expr::from_variable(x()).add_constant(3);
        let rhs: Expr = Expr::from_variable(y()).add_constant(7);
        let c = lhs.ge_expr(&rhs);
        assert_eq!(c.kind(), ComparisonKind::GreaterEqual);
        assert_eq!(c.rhs(), 4);
        assert_eq!(c.terms(), vec![(x(), 1), (y(), -1)]);
    }

    #[test]
    fn mirrored_comparisons_are_equivalent() {
        let a = sample::<SparseStorage>();
        let b: Expr = Expr::term(y(), 5).add_constant(-1);
        assert!(same_constraint(&a.ge_expr(&b), &b.le_expr(&a).mirrored()));
        assert!(same_constraint(&a.gt_expr(&b), &b.lt_expr(&a).mirrored()));
        assert!(same_constraint(&a.eq_expr(&b), &b.eq_expr(&a).mirrored()));
    }

    #[test]
    fn variable_against_integer_matches_expression_form() {
        let via_scalar: Constraint<SparseStorage> = Expr::from_variable(x()).ge_scalar(4);
        let via_expr = Expr::from_variable(x()).ge_expr(&Expr::from_constant(4));
        assert!(same_constraint(&via_scalar, &via_expr));
    }

    #[test]
    fn operators_match_builders() {
        let a = sample::<DenseStorage>();
        let b: Expr<DenseStorage> = Expr::from(y());
        let combined = (a.clone() + b.clone() * 3) - -a.clone();
        let expected = a.scale(2).add(&b.scale(3));
        assert_eq!(combined.terms(), expected.terms());
        assert_eq!(combined.shift(), expected.shift());
    }

    #[test]
    fn evaluate_uses_positions() {
        let e = sample::<SparseStorage>();
        assert_eq!(e.evaluate(&[0, 2, 1]), 3 * 2 - 2 + 7);
        assert_eq!(e.evaluate(&[]), 7);
    }

    #[test]
    fn linear_terms_rejects_mismatched_lengths() {
        let result = linear_terms::<SparseStorage>(&[x(), y()], &[1]);
        assert_eq!(
            result.unwrap_err(),
            LinearExprError::MismatchedLengths {
                variables: 2,
                coefficients: 1
            }
        );
    }

    #[test]
    fn linear_terms_accumulates_repeats() {
        let expr = linear_terms::<DenseStorage>(&[x(), y(), x()], &[2, 0, -2])
            .expect("linear_terms should succeed");
        assert!(expr.terms().is_empty());
    }

    #[test]
    fn linear_sum_merges_terms_and_shifts() {
        let left: Expr = Expr::term(x(), 1).add_constant(2);
        let right: Expr = Expr::term(y(), 2).add_constant(3);
        let summed = linear_sum(vec![left, right]);
        assert_eq!(summed.terms(), vec![(x(), 1), (y(), 2)]);
        assert_eq!(summed.shift(), 5);
    }

    #[test]
    fn constraint_satisfaction() {
        let c: Constraint<SparseStorage> = sample().le_scalar(10);
        // 3x - 2y <= 3
        assert!(c.is_satisfied_by(&[0, 1, 0]));
        assert!(!c.is_satisfied_by(&[0, 2, 1]));
        assert!(c.mirrored().is_satisfied_by(&[0, 1, 0]));

        let (kind, coefficients, rhs) = c.into_parts();
        assert_eq!(kind, ComparisonKind::LowerEqual);
        assert_eq!(coefficients.nonzero_count(), 2);
        assert_eq!(rhs, 3);
    }
}
