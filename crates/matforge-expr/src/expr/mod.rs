//! Expression types for integer linear models.
//!
//! - `core`: `Expr`, coefficient storage plus an integer shift
//! - `constraint`: coefficients with a comparison kind and right-hand side
//! - `builders`: free functions assembling expressions from parts
//! - `error`: expression construction errors

pub mod builders;
pub mod constraint;
pub mod core;
pub mod error;

pub use builders::{linear_sum, linear_terms};
pub use constraint::{ComparisonKind, Constraint};
pub use core::Expr;
pub use error::LinearExprError;
