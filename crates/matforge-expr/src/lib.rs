pub mod expr;
pub mod ids;
pub mod storage;

pub use expr::{
    ComparisonKind, Constraint, Expr, LinearExprError, linear_sum, linear_terms,
};
pub use ids::{ConstraintId, VariableId};
pub use storage::{DenseStorage, SparseStorage, Storage};
