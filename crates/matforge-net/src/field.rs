//! Prime-field arithmetic over `{0, .., q-1}`.

use std::fmt;

/// An element of a finite field, always reduced into `[0, q)`.
pub type FieldElement = u32;

/// Arithmetic capability the matrix and generator code is written against.
pub trait FieldArithmetic {
    /// Number of elements `q`.
    fn order(&self) -> u32;

    fn plus(&self, a: FieldElement, b: FieldElement) -> FieldElement;

    fn times(&self, a: FieldElement, b: FieldElement) -> FieldElement;

    fn neg(&self, a: FieldElement) -> FieldElement;

    /// Multiplicative inverse, `None` for zero.
    fn inv(&self, a: FieldElement) -> Option<FieldElement>;
}

/// Errors raised when building a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Order outside `2..=GaloisField::MAX_ORDER`.
    OrderOutOfRange { order: u32 },
    /// Order is not a prime number.
    NotPrime { order: u32 },
}

impl FieldError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::OrderOutOfRange { .. } => "FIELD_ORDER_OUT_OF_RANGE",
            FieldError::NotPrime { .. } => "FIELD_NOT_PRIME",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::OrderOutOfRange { order } => write!(
                f,
                "[{}] Field order {} must lie in 2..={}",
                self.code(),
                order,
                GaloisField::MAX_ORDER
            ),
            FieldError::NotPrime { order } => write!(
                f,
                "[{}] Field order {} is not prime; only prime fields are supported",
                self.code(),
                order
            ),
        }
    }
}

impl std::error::Error for FieldError {}

/// The prime field `Z/qZ` with precomputed negation and inverse tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaloisField {
    order: u32,
    neg: Vec<FieldElement>,
    inv: Vec<Option<FieldElement>>,
}

impl GaloisField {
    /// Largest prime below `2^16`.
    pub const MAX_ORDER: u32 = 65_521;

    /// Build the field of prime order `q`.
    pub fn new(order: u32) -> Result<Self, FieldError> {
        if !(2..=Self::MAX_ORDER).contains(&order) {
            return Err(FieldError::OrderOutOfRange { order });
        }
        if !is_prime(order) {
            return Err(FieldError::NotPrime { order });
        }

        let neg = (0..order).map(|a| (order - a) % order).collect();
        let inv = (0..order)
            .map(|a| (a != 0).then(|| pow_mod(a, order - 2, order)))
            .collect();

        tracing::trace!(
            component = "field",
            operation = "init",
            status = "success",
            order,
            "Built prime field tables"
        );
        Ok(Self { order, neg, inv })
    }

    /// Reduce any integer into `[0, q)`.
    pub fn reduce(&self, value: i64) -> FieldElement {
        value.rem_euclid(i64::from(self.order)) as FieldElement
    }
}

impl FieldArithmetic for GaloisField {
    fn order(&self) -> u32 {
        self.order
    }

    fn plus(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        ((u64::from(a) + u64::from(b)) % u64::from(self.order)) as FieldElement
    }

    fn times(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        ((u64::from(a) * u64::from(b)) % u64::from(self.order)) as FieldElement
    }

    fn neg(&self, a: FieldElement) -> FieldElement {
        self.neg[(a % self.order) as usize]
    }

    fn inv(&self, a: FieldElement) -> Option<FieldElement> {
        self.inv[(a % self.order) as usize]
    }
}

fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2u32;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

fn pow_mod(base: u32, mut exp: u32, modulus: u32) -> u32 {
    let modulus = u64::from(modulus);
    let mut base = u64::from(base) % modulus;
    let mut acc = 1u64;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc * base % modulus;
        }
        base = base * base % modulus;
        exp >>= 1;
    }
    acc as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_composite_and_tiny_orders() {
        assert_eq!(GaloisField::new(4), Err(FieldError::NotPrime { order: 4 }));
        assert_eq!(
            GaloisField::new(1),
            Err(FieldError::OrderOutOfRange { order: 1 })
        );
        assert_eq!(
            GaloisField::new(65_537).unwrap_err().code(),
            "FIELD_ORDER_OUT_OF_RANGE"
        );
        assert!(GaloisField::new(GaloisField::MAX_ORDER).is_ok());
    }

    #[test]
    fn inverse_table_is_consistent() {
        for q in [2, 3, 5, 7, 13, 101] {
            let field = GaloisField::new(q).unwrap();
            assert_eq!(field.inv(0), None);
            for a in 1..q {
                let inv = field.inv(a).unwrap();
                assert_eq!(field.times(a, inv), 1, "q={q} a={a}");
                assert_eq!(field.plus(a, field.neg(a)), 0);
            }
        }
    }

    #[test]
    fn reduce_wraps_negatives() {
        let field = GaloisField::new(5).unwrap();
        assert_eq!(field.reduce(-1), 4);
        assert_eq!(field.reduce(12), 2);
        assert_eq!(field.neg(0), 0);
    }
}
