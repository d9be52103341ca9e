//! Constraint generators.
//!
//! A generator turns one equidistribution property into rows of the step
//! model. Every generator runs the same per-split machinery
//! ([`emit_minor`]) and differs only in which splits of the step's rows it
//! checks:
//!
//! - [`NetGenerator`]: every composition, optionally capped by balance
//! - [`StratifiedGenerator`]: balanced partitions only
//! - [`PropAGenerator`] / [`PropAPrimeGenerator`]: stratification gated on
//!   the row count

mod net;
mod prop_a;
mod stratified;

use std::fmt;

use matforge_core::{Bounds, Model, ModelError};
use matforge_expr::{Expr, Storage, VariableId};

use crate::field::FieldArithmetic;
use crate::matrix::GfMatrix;
use crate::subdet::determinant_expr;

pub use net::{DEFAULT_MAX_UNBALANCE, NetGenerator};
pub use prop_a::{PropAGenerator, PropAPrimeGenerator};
pub use stratified::StratifiedGenerator;

/// Per-constraint options shared by every generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifier {
    /// Rows become a rewarded objective term instead of a hard requirement.
    pub weak: bool,
    pub weak_weight: i64,
    pub min_rows: usize,
    pub max_rows: usize,
}

impl Modifier {
    pub fn new() -> Self {
        Self {
            weak: false,
            weak_weight: 0,
            min_rows: 0,
            max_rows: usize::MAX,
        }
    }

    pub fn with_weak(mut self, weight: i64) -> Self {
        self.weak = true;
        self.weak_weight = weight;
        self
    }

    pub fn with_row_range(mut self, min_rows: usize, max_rows: usize) -> Self {
        self.min_rows = min_rows;
        self.max_rows = max_rows;
        self
    }

    /// Whether the generator is active at step `rows`.
    pub fn applies(&self, rows: usize) -> bool {
        self.min_rows <= rows && rows <= self.max_rows
    }
}

impl Default for Modifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors raised while a generator populates a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// A participating dimension has no matrix.
    MissingDimension { dimension: usize, available: usize },
    Model(ModelError),
}

impl GeneratorError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            GeneratorError::MissingDimension { .. } => "GENERATOR_MISSING_DIMENSION",
            GeneratorError::Model(err) => err.code(),
        }
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::MissingDimension {
                dimension,
                available,
            } => write!(
                f,
                "[{}] Dimension {} requested but only {} matrices exist",
                self.code(),
                dimension,
                available
            ),
            GeneratorError::Model(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeneratorError::Model(err) => Some(err),
            GeneratorError::MissingDimension { .. } => None,
        }
    }
}

impl From<ModelError> for GeneratorError {
    fn from(err: ModelError) -> Self {
        GeneratorError::Model(err)
    }
}

/// Everything a generator sees at one construction step.
pub struct RowContext<'a, S: Storage> {
    pub field: &'a dyn FieldArithmetic,
    /// One matrix per dimension, committed up to step `rows - 1`.
    pub matrices: &'a [GfMatrix],
    /// Current step `m`, i.e. the row count being solved for.
    pub rows: usize,
    pub model: &'a mut Model<S>,
    /// `m` unknowns per dimension, dimension-major.
    pub unknowns: &'a [VariableId],
    /// Structural objective; weak generators add their rewards here.
    pub objective: &'a mut Expr<S>,
}

impl<'a, S: Storage> RowContext<'a, S> {
    /// Matrices of `dims`, in order.
    pub fn select(&self, dims: &[usize]) -> Result<Vec<&'a GfMatrix>, GeneratorError> {
        let matrices = self.matrices;
        dims.iter()
            .map(|dimension| {
                matrices
                    .get(*dimension)
                    .ok_or(GeneratorError::MissingDimension {
                        dimension: *dimension,
                        available: matrices.len(),
                    })
            })
            .collect()
    }
}

/// One equidistribution property over a set of dimensions.
pub trait Generator<S: Storage>: fmt::Debug {
    /// Program-language name.
    fn name(&self) -> &'static str;

    fn modifier(&self) -> &Modifier;

    fn dims(&self) -> &[usize];

    /// Add this property's rows for step `ctx.rows`.
    fn apply(&self, ctx: &mut RowContext<'_, S>) -> Result<(), GeneratorError>;
}

/// Require (or reward) a non-singular stacked matrix for one split.
///
/// With `det = sum cofactor * x - q * k` for a fresh slack `k`, the stacked
/// determinant is `det mod q`:
/// - hard, `q == 2`: `det == 1`
/// - hard, otherwise: `1 <= det <= q - 1`
/// - weak, weight >= 0: binary `w <= det <= q - 1`, objective `- weight * w`
/// - weak, weight < 0: `q * w >= det >= 0`, objective `- weight * w`
pub(crate) fn emit_minor<S: Storage>(
    ctx: &mut RowContext<'_, S>,
    modifier: &Modifier,
    matrices: &[&GfMatrix],
    parts: &[usize],
    dims: &[usize],
) -> Result<(), GeneratorError> {
    let q = i64::from(ctx.field.order());
    let slack = ctx.model.add_variable("k", Bounds::non_negative())?;
    let det: Expr<S> = determinant_expr(ctx.field, matrices, parts, dims, ctx.unknowns)
        .sub(&Expr::term(slack, q));

    if modifier.weak {
        let reward = ctx.model.add_variable("w", Bounds::binary())?;
        ctx.objective.push_term(reward, -modifier.weak_weight);
        let reward = Expr::from_variable(reward);
        if modifier.weak_weight >= 0 {
            ctx.model.add_constraint("WZN", reward.le_expr(&det))?;
            ctx.model.add_constraint("WZN", det.le_scalar(q - 1))?;
        } else {
            ctx.model.add_constraint("WZN", reward.scale(q).ge_expr(&det))?;
            ctx.model.add_constraint("WZN", det.ge_scalar(0))?;
        }
    } else if q == 2 {
        ctx.model.add_constraint("DZN", det.eq_scalar(1))?;
    } else {
        ctx.model.add_constraint("DZN", det.ge_scalar(1))?;
        ctx.model.add_constraint("DZN", det.le_scalar(q - 1))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::GaloisField;
    use matforge_expr::{ComparisonKind, SparseStorage};

    struct Fixture {
        field: GaloisField,
        matrices: Vec<GfMatrix>,
        model: Model<SparseStorage>,
        unknowns: Vec<VariableId>,
        objective: Expr<SparseStorage>,
    }

    impl Fixture {
        fn new(q: u32, dimensions: usize, rows: usize) -> Self {
            let mut model = Model::new();
            let unknowns = model
                .add_variables("x", dimensions * rows, Bounds::new(0, i64::from(q) - 1))
                .unwrap();
            Self {
                field: GaloisField::new(q).unwrap(),
                matrices: vec![GfMatrix::identity(4); dimensions],
                model,
                unknowns,
                objective: Expr::new_empty(),
            }
        }

        fn emit(&mut self, rows: usize, modifier: Modifier) {
            let mut ctx = RowContext {
                field: &self.field,
                matrices: &self.matrices,
                rows,
                model: &mut self.model,
                unknowns: &self.unknowns,
                objective: &mut self.objective,
            };
            let matrices = ctx.select(&[0]).unwrap();
            emit_minor(&mut ctx, &modifier, &matrices, &[rows], &[0]).unwrap();
        }
    }

    #[test]
    fn modifier_row_window_is_inclusive() {
        let modifier = Modifier::new().with_row_range(2, 4);
        assert!(!modifier.applies(1));
        assert!(modifier.applies(2));
        assert!(modifier.applies(4));
        assert!(!modifier.applies(5));
        assert!(Modifier::default().applies(usize::MAX));
    }

    #[test]
    fn hard_binary_minor_is_one_equality() {
        let mut fixture = Fixture::new(2, 1, 1);
        fixture.emit(1, Modifier::new());
        let rows: Vec<_> = fixture.model.constraints().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "DZN0");
        assert_eq!(rows[0].1.kind(), ComparisonKind::Equal);
        assert_eq!(rows[0].1.rhs(), 1);
        // x0 - 2 k0
        assert_eq!(
            rows[0].1.terms(),
            vec![(VariableId::new(0), 1), (VariableId::new(1), -2)]
        );
    }

    #[test]
    fn hard_odd_minor_is_a_range() {
        let mut fixture = Fixture::new(3, 1, 1);
        fixture.emit(1, Modifier::new());
        let kinds: Vec<_> = fixture
            .model
            .constraints()
            .map(|(_, row)| (row.kind(), row.rhs()))
            .collect();
        assert_eq!(
            kinds,
            vec![(ComparisonKind::GreaterEqual, 1), (ComparisonKind::LowerEqual, 2)]
        );
    }

    #[test]
    fn weak_minor_rewards_in_objective() {
        let mut fixture = Fixture::new(3, 1, 1);
        fixture.emit(1, Modifier::new().with_weak(4));
        let reward = fixture.model.variables().iter().position(|var| var.name == "w0");
        let reward = VariableId::new(reward.unwrap() as u32);
        assert_eq!(fixture.objective.coeff(reward), -4);
        assert_eq!(fixture.model.num_constraints(), 2);
        assert!(fixture.model.constraints().all(|(name, _)| name.starts_with("WZN")));

        let mut fixture = Fixture::new(3, 1, 1);
        fixture.emit(1, Modifier::new().with_weak(-2));
        let (_, first) = fixture.model.constraints().next().unwrap();
        assert_eq!(first.kind(), ComparisonKind::GreaterEqual);
    }

    #[test]
    fn missing_dimension_is_reported() {
        let mut fixture = Fixture::new(2, 1, 1);
        let ctx = RowContext {
            field: &fixture.field,
            matrices: &fixture.matrices,
            rows: 1,
            model: &mut fixture.model,
            unknowns: &fixture.unknowns,
            objective: &mut fixture.objective,
        };
        assert_eq!(
            ctx.select(&[0, 3]).unwrap_err(),
            GeneratorError::MissingDimension {
                dimension: 3,
                available: 1
            }
        );
    }
}
