//! Constraints: coefficient storage with comparison kind and integer RHS.

use crate::ids::VariableId;
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonKind {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Lower,
    LowerEqual,
}

impl ComparisonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonKind::Equal => "eq",
            ComparisonKind::NotEqual => "ne",
            ComparisonKind::Greater => "gt",
            ComparisonKind::GreaterEqual => "ge",
            ComparisonKind::Lower => "lt",
            ComparisonKind::LowerEqual => "le",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonKind::Equal => "=",
            ComparisonKind::NotEqual => "!=",
            ComparisonKind::Greater => ">",
            ComparisonKind::GreaterEqual => ">=",
            ComparisonKind::Lower => "<",
            ComparisonKind::LowerEqual => "<=",
        }
    }

    /// Kind obtained by exchanging both sides of the comparison.
    pub fn flipped(self) -> Self {
        match self {
            ComparisonKind::Equal => ComparisonKind::Equal,
            ComparisonKind::NotEqual => ComparisonKind::NotEqual,
            ComparisonKind::Greater => ComparisonKind::Lower,
            ComparisonKind::GreaterEqual => ComparisonKind::LowerEqual,
            ComparisonKind::Lower => ComparisonKind::Greater,
            ComparisonKind::LowerEqual => ComparisonKind::GreaterEqual,
        }
    }

    /// Whether `lhs <kind> rhs` holds.
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            ComparisonKind::Equal => lhs == rhs,
            ComparisonKind::NotEqual => lhs != rhs,
            ComparisonKind::Greater => lhs > rhs,
            ComparisonKind::GreaterEqual => lhs >= rhs,
            ComparisonKind::Lower => lhs < rhs,
            ComparisonKind::LowerEqual => lhs <= rhs,
        }
    }
}

/// `Σ coeff·var <kind> rhs`, the canonical form every comparison lowers to.
#[derive(Debug, Clone)]
pub struct Constraint<S: Storage> {
    kind: ComparisonKind,
    coefficients: S,
    rhs: i64,
}

impl<S: Storage> Constraint<S> {
    pub fn new(kind: ComparisonKind, coefficients: S, rhs: i64) -> Self {
        Self {
            kind,
            coefficients,
            rhs,
        }
    }

    pub fn kind(&self) -> ComparisonKind {
        self.kind
    }

    pub fn coefficients(&self) -> &S {
        &self.coefficients
    }

    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    /// Nonzero terms in ascending variable order.
    pub fn terms(&self) -> Vec<(VariableId, i64)> {
        self.coefficients.terms()
    }

    /// True when every coefficient is zero; such rows are left out of exports.
    pub fn is_trivial(&self) -> bool {
        self.coefficients.is_zero()
    }

    /// Same constraint written with both sides exchanged.
    pub fn mirrored(&self) -> Self {
        let mut coefficients = self.coefficients.clone();
        coefficients.times(-1);
        Self {
            kind: self.kind.flipped(),
            coefficients,
            rhs: -self.rhs,
        }
    }

    /// Evaluate against a full assignment indexed by variable position.
    ///
    /// Variables beyond `values` count as zero.
    pub fn is_satisfied_by(&self, values: &[i64]) -> bool {
        let lhs: i64 = self
            .coefficients
            .terms()
            .into_iter()
            .map(|(var_id, coeff)| coeff * values.get(var_id.index()).copied().unwrap_or(0))
            .sum();
        self.kind.holds(lhs, self.rhs)
    }

    /// Kind and rhs with strict comparisons rewritten as non-strict ones.
    ///
    /// Over integers `> b` is `>= b + 1` and `< b` is `<= b - 1`. A `!=` row
    /// has no such form and yields `None`.
    pub fn non_strict(&self) -> Option<(ComparisonKind, i64)> {
        match self.kind {
            ComparisonKind::Equal => Some((ComparisonKind::Equal, self.rhs)),
            ComparisonKind::Greater => Some((ComparisonKind::GreaterEqual, self.rhs + 1)),
            ComparisonKind::GreaterEqual => Some((ComparisonKind::GreaterEqual, self.rhs)),
            ComparisonKind::Lower => Some((ComparisonKind::LowerEqual, self.rhs - 1)),
            ComparisonKind::LowerEqual => Some((ComparisonKind::LowerEqual, self.rhs)),
            ComparisonKind::NotEqual => None,
        }
    }

    pub fn into_parts(self) -> (ComparisonKind, S, i64) {
        (self.kind, self.coefficients, self.rhs)
    }
}
