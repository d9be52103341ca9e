//! Stratification: only the balanced splits of the step's rows.

use matforge_expr::Storage;

use super::{Generator, GeneratorError, Modifier, RowContext, emit_minor};
use crate::compositions::balanced_partitions;

/// Requires the balanced partitions of the step's rows over `dims` to yield
/// non-singular stacked matrices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StratifiedGenerator {
    modifier: Modifier,
    dims: Vec<usize>,
}

impl StratifiedGenerator {
    pub fn new(modifier: Modifier, dims: Vec<usize>) -> Self {
        Self { modifier, dims }
    }

    pub(crate) fn emit_all<S: Storage>(
        &self,
        ctx: &mut RowContext<'_, S>,
        name: &'static str,
    ) -> Result<(), GeneratorError> {
        if !self.modifier.applies(ctx.rows) {
            return Ok(());
        }
        let matrices = ctx.select(&self.dims)?;

        let mut emitted = 0usize;
        for parts in balanced_partitions(ctx.rows, self.dims.len()) {
            emit_minor(ctx, &self.modifier, &matrices, &parts, &self.dims)?;
            emitted += 1;
        }

        tracing::trace!(
            component = "generator",
            operation = "apply",
            status = "success",
            generator = name,
            rows = ctx.rows,
            emitted,
            "Emitted stratification minors"
        );
        Ok(())
    }
}

impl<S: Storage> Generator<S> for StratifiedGenerator {
    fn name(&self) -> &'static str {
        "stratified"
    }

    fn modifier(&self) -> &Modifier {
        &self.modifier
    }

    fn dims(&self) -> &[usize] {
        &self.dims
    }

    fn apply(&self, ctx: &mut RowContext<'_, S>) -> Result<(), GeneratorError> {
        self.emit_all(ctx, "stratified")
    }
}
