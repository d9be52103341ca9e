//! The net property: every split of the step's rows is non-singular.

use matforge_expr::Storage;

use super::{Generator, GeneratorError, Modifier, RowContext, emit_minor};
use crate::compositions::{Compositions, balance};

/// Balance cap used when a program gives none.
pub const DEFAULT_MAX_UNBALANCE: usize = 32_768;

/// Requires every composition of the step's rows over `dims` to yield a
/// non-singular stacked matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetGenerator {
    modifier: Modifier,
    dims: Vec<usize>,
    max_unbalance: usize,
}

impl NetGenerator {
    pub fn new(modifier: Modifier, dims: Vec<usize>) -> Self {
        Self {
            modifier,
            dims,
            max_unbalance: DEFAULT_MAX_UNBALANCE,
        }
    }

    /// Skip compositions whose nonzero parts differ by more than `max`.
    pub fn with_max_unbalance(mut self, max: usize) -> Self {
        self.max_unbalance = max;
        self
    }

    pub fn max_unbalance(&self) -> usize {
        self.max_unbalance
    }
}

impl<S: Storage> Generator<S> for NetGenerator {
    fn name(&self) -> &'static str {
        "net"
    }

    fn modifier(&self) -> &Modifier {
        &self.modifier
    }

    fn dims(&self) -> &[usize] {
        &self.dims
    }

    fn apply(&self, ctx: &mut RowContext<'_, S>) -> Result<(), GeneratorError> {
        if !self.modifier.applies(ctx.rows) {
            return Ok(());
        }
        let matrices = ctx.select(&self.dims)?;

        let mut emitted = 0usize;
        let mut skipped = 0usize;
        for parts in Compositions::new(ctx.rows, self.dims.len()) {
            if balance(&parts) > self.max_unbalance {
                skipped += 1;
                continue;
            }
            emit_minor(ctx, &self.modifier, &matrices, &parts, &self.dims)?;
            emitted += 1;
        }

        tracing::trace!(
            component = "generator",
            operation = "apply",
            status = "success",
            generator = "net",
            rows = ctx.rows,
            emitted,
            skipped,
            "Emitted net minors"
        );
        Ok(())
    }
}
