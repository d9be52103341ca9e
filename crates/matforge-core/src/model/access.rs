//! Read-only access to model contents.

use matforge_expr::{Constraint, ConstraintId, Storage, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;
use crate::types::Variable;

impl<S: Storage> Model<S> {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Variables in creation order; position equals id.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn get_variable(&self, id: VariableId) -> Result<&Variable, ModelError> {
        self.variables
            .get(id.index())
            .ok_or(ModelError::InvalidVariableId(id))
    }

    pub fn variable_name(&self, id: VariableId) -> Option<&str> {
        self.variables.get(id.index()).map(|var| var.name.as_str())
    }

    pub fn get_constraint(&self, id: ConstraintId) -> Result<&Constraint<S>, ModelError> {
        self.constraints
            .get(id.index())
            .ok_or(ModelError::InvalidConstraintId(id))
    }

    pub fn constraint_name(&self, id: ConstraintId) -> Option<&str> {
        self.constraint_names.get(id.index()).map(String::as_str)
    }

    /// `(name, constraint)` pairs in insertion order.
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &Constraint<S>)> {
        self.constraint_names
            .iter()
            .map(String::as_str)
            .zip(self.constraints.iter())
    }

    /// Objective coefficients, always in minimization form.
    pub fn objective(&self) -> &S {
        &self.objective
    }

    pub fn has_objective(&self) -> bool {
        self.objective_set
    }

    /// Check every constraint and bound against a full assignment.
    pub fn is_feasible(&self, values: &[i64]) -> bool {
        values.len() == self.variables.len()
            && self
                .variables
                .iter()
                .zip(values)
                .all(|(var, value)| var.bounds.contains(*value))
            && self
                .constraints
                .iter()
                .all(|constraint| constraint.is_satisfied_by(values))
    }

    /// Objective value of an assignment.
    pub fn objective_value(&self, values: &[i64]) -> i64 {
        self.objective
            .terms()
            .into_iter()
            .map(|(var_id, coeff)| coeff * values.get(var_id.index()).copied().unwrap_or(0))
            .sum()
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if id.index() < self.variables.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidVariableId(id))
        }
    }
}
