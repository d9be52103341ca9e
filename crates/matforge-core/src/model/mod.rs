//! Model module for building integer linear programs.
//!
//! # Module Organization
//!
//! - [`error`]: Model and export error types
//! - [`builder`]: Methods for adding variables, constraints, and objectives
//! - [`access`]: Read-only views used by exporters and solvers
//! - [`lp`]: CPLEX-LP text export
//! - [`mps`]: Fixed-column MPS text export

mod access;
mod builder;
mod error;
mod lp;
mod mps;

use std::collections::BTreeMap;

use matforge_expr::{Constraint, SparseStorage, Storage};

use crate::types::Variable;

pub use error::{FormatError, ModelError};
pub use mps::NAME_WIDTH;

/// An integer linear program with a minimized objective.
///
/// Variables and constraints are named `prefix + counter`, the counter being
/// kept per prefix. Names are therefore unique only within a prefix.
#[derive(Debug, Clone)]
pub struct Model<S: Storage = SparseStorage> {
    pub(crate) variables: Vec<Variable>,
    pub(crate) constraints: Vec<Constraint<S>>,
    pub(crate) constraint_names: Vec<String>,
    pub(crate) objective: S,
    pub(crate) objective_set: bool,
    category_counts: BTreeMap<String, u32>,
}

impl<S: Storage> Model<S> {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            constraints: Vec::new(),
            constraint_names: Vec::new(),
            objective: S::default(),
            objective_set: false,
            category_counts: BTreeMap::new(),
        }
    }

    pub(crate) fn next_name(&mut self, prefix: &str) -> Result<String, ModelError> {
        if prefix.is_empty() {
            return Err(ModelError::EmptyPrefix);
        }
        let counter = self.category_counts.entry(prefix.to_string()).or_insert(0);
        let name = format!("{prefix}{counter}");
        *counter += 1;
        Ok(name)
    }
}

impl<S: Storage> Default for Model<S> {
    fn default() -> Self {
        Self::new()
    }
}
