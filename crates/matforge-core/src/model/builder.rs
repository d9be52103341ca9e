//! Model builder methods for adding variables, constraints, and objectives.

use matforge_expr::{Constraint, ConstraintId, Expr, Storage, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;
use crate::types::{Bounds, Sense, Variable};

impl<S: Storage> Model<S> {
    /// Add a variable named `prefix` + per-prefix counter.
    pub fn add_variable(&mut self, prefix: &str, bounds: Bounds) -> Result<VariableId, ModelError> {
        if bounds.lower > bounds.upper {
            return Err(ModelError::InvalidVariableBounds {
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        let name = self.next_name(prefix)?;
        let id = VariableId::new(self.variables.len() as u32);
        self.variables.push(Variable::new(name, bounds));
        Ok(id)
    }

    /// Add `count` variables sharing a prefix and bounds.
    pub fn add_variables(
        &mut self,
        prefix: &str,
        count: usize,
        bounds: Bounds,
    ) -> Result<Vec<VariableId>, ModelError> {
        let ids = (0..count)
            .map(|_| self.add_variable(prefix, bounds))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::trace!(
            component = "model",
            operation = "add_variables",
            status = "success",
            prefix,
            count,
            lower = bounds.lower,
            upper = bounds.upper,
            "Added variable block"
        );
        Ok(ids)
    }

    /// Add a constraint named `prefix` + per-prefix counter.
    ///
    /// Every referenced variable must already exist in the model.
    pub fn add_constraint(
        &mut self,
        prefix: &str,
        constraint: Constraint<S>,
    ) -> Result<ConstraintId, ModelError> {
        for (var_id, _) in constraint.terms() {
            self.ensure_variable_exists(var_id)?;
        }
        let name = self.next_name(prefix)?;
        let id = ConstraintId::new(self.constraints.len() as u32);
        self.constraints.push(constraint);
        self.constraint_names.push(name);
        Ok(id)
    }

    /// Set or replace the objective.
    ///
    /// The model always minimizes; a maximized expression is stored negated.
    /// The constant part of `expr` does not affect the optimum and is dropped.
    pub fn set_objective(&mut self, expr: Expr<S>, sense: Sense) -> Result<(), ModelError> {
        for (var_id, _) in expr.terms() {
            self.ensure_variable_exists(var_id)?;
        }
        let (mut coefficients, _) = expr.into_parts();
        if sense == Sense::Maximize {
            coefficients.times(-1);
        }
        self.objective = coefficients;
        self.objective_set = true;
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = sense.as_str(),
            terms = self.objective.nonzero_count(),
            "Set objective function"
        );
        Ok(())
    }

    /// Minimize a linear expression.
    ///
    /// Returns an error if the model already has an objective.
    pub fn minimize(&mut self, expr: Expr<S>) -> Result<(), ModelError> {
        if self.objective_set {
            return Err(ModelError::MultipleObjectives);
        }
        self.set_objective(expr, Sense::Minimize)
    }

    /// Maximize a linear expression.
    ///
    /// Returns an error if the model already has an objective.
    pub fn maximize(&mut self, expr: Expr<S>) -> Result<(), ModelError> {
        if self.objective_set {
            return Err(ModelError::MultipleObjectives);
        }
        self.set_objective(expr, Sense::Maximize)
    }
}
