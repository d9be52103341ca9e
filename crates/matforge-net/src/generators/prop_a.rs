//! Property A and A': stratification at one specific step.

use matforge_expr::Storage;

use super::{Generator, GeneratorError, Modifier, RowContext, StratifiedGenerator};

/// Stratification at the step where the row count equals the number of
/// dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropAGenerator {
    inner: StratifiedGenerator,
}

impl PropAGenerator {
    pub fn new(modifier: Modifier, dims: Vec<usize>) -> Self {
        Self {
            inner: StratifiedGenerator::new(modifier, dims),
        }
    }
}

impl<S: Storage> Generator<S> for PropAGenerator {
    fn name(&self) -> &'static str {
        "propA"
    }

    fn modifier(&self) -> &Modifier {
        Generator::<S>::modifier(&self.inner)
    }

    fn dims(&self) -> &[usize] {
        Generator::<S>::dims(&self.inner)
    }

    fn apply(&self, ctx: &mut RowContext<'_, S>) -> Result<(), GeneratorError> {
        if ctx.rows != Generator::<S>::dims(self).len() {
            return Ok(());
        }
        self.inner.emit_all(ctx, "propA")
    }
}

/// Stratification at the step where the row count is twice the number of
/// dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropAPrimeGenerator {
    inner: StratifiedGenerator,
}

impl PropAPrimeGenerator {
    pub fn new(modifier: Modifier, dims: Vec<usize>) -> Self {
        Self {
            inner: StratifiedGenerator::new(modifier, dims),
        }
    }
}

impl<S: Storage> Generator<S> for PropAPrimeGenerator {
    fn name(&self) -> &'static str {
        "propA'"
    }

    fn modifier(&self) -> &Modifier {
        Generator::<S>::modifier(&self.inner)
    }

    fn dims(&self) -> &[usize] {
        Generator::<S>::dims(&self.inner)
    }

    fn apply(&self, ctx: &mut RowContext<'_, S>) -> Result<(), GeneratorError> {
        if ctx.rows != 2 * Generator::<S>::dims(self).len() {
            return Ok(());
        }
        self.inner.emit_all(ctx, "propA'")
    }
}
