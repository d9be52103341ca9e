//! Coefficient storage for linear expressions and constraints.
//!
//! Two layouts share one contract:
//! - [`DenseStorage`]: `Vec<i64>` indexed by variable position. Cheap to grow
//!   and iterate, memory follows the largest id seen.
//! - [`SparseStorage`]: ordered map keyed by [`VariableId`]. Memory follows
//!   the number of nonzero coefficients.
//!
//! A coefficient that nets to zero is never reported by [`Storage::terms`],
//! whichever layout physically keeps it around.

use std::collections::BTreeMap;
use std::fmt;

use crate::ids::VariableId;

/// Shared behaviour of the coefficient layouts.
pub trait Storage: Clone + Default + fmt::Debug {
    /// Accumulate `value` onto the coefficient of `id`.
    fn add(&mut self, id: VariableId, value: i64);

    /// Accumulate every coefficient of `other`.
    fn merge(&mut self, other: &Self);

    /// Multiply every coefficient by `scalar`.
    fn times(&mut self, scalar: i64);

    /// Coefficient of `id`, zero when absent.
    fn coeff(&self, id: VariableId) -> i64;

    /// Nonzero `(id, coefficient)` pairs in ascending id order.
    fn terms(&self) -> Vec<(VariableId, i64)>;

    /// True when no coefficient is nonzero.
    fn is_zero(&self) -> bool;

    /// Number of nonzero coefficients.
    fn nonzero_count(&self) -> usize {
        self.terms().len()
    }
}

/// Coefficients stored in a vector indexed by variable position.
#[derive(Debug, Clone, Default)]
pub struct DenseStorage {
    values: Vec<i64>,
}

impl DenseStorage {
    /// Number of physically stored slots, zeros included.
    pub fn capacity_slots(&self) -> usize {
        self.values.len()
    }
}

impl Storage for DenseStorage {
    fn add(&mut self, id: VariableId, value: i64) {
        let index = id.index();
        if self.values.len() <= index {
            self.values.resize(index + 1, 0);
        }
        self.values[index] += value;
    }

    fn merge(&mut self, other: &Self) {
        if self.values.len() < other.values.len() {
            self.values.resize(other.values.len(), 0);
        }
        for (slot, value) in self.values.iter_mut().zip(&other.values) {
            *slot += *value;
        }
    }

    fn times(&mut self, scalar: i64) {
        for value in &mut self.values {
            *value *= scalar;
        }
    }

    fn coeff(&self, id: VariableId) -> i64 {
        self.values.get(id.index()).copied().unwrap_or(0)
    }

    fn terms(&self) -> Vec<(VariableId, i64)> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, value)| **value != 0)
            .map(|(index, value)| (VariableId::new(index as u32), *value))
            .collect()
    }

    fn is_zero(&self) -> bool {
        self.values.iter().all(|value| *value == 0)
    }
}

/// Coefficients stored in an ordered map; entries netting to zero are dropped.
#[derive(Debug, Clone, Default)]
pub struct SparseStorage {
    values: BTreeMap<VariableId, i64>,
}

impl Storage for SparseStorage {
    fn add(&mut self, id: VariableId, value: i64) {
        let entry = self.values.entry(id).or_insert(0);
        *entry += value;
        if *entry == 0 {
            self.values.remove(&id);
        }
    }

    fn merge(&mut self, other: &Self) {
        for (id, value) in &other.values {
            self.add(*id, *value);
        }
    }

    fn times(&mut self, scalar: i64) {
        if scalar == 0 {
            self.values.clear();
            return;
        }
        for value in self.values.values_mut() {
            *value *= scalar;
        }
    }

    fn coeff(&self, id: VariableId) -> i64 {
        self.values.get(&id).copied().unwrap_or(0)
    }

    fn terms(&self) -> Vec<(VariableId, i64)> {
        self.values
            .iter()
            .filter(|(_, value)| **value != 0)
            .map(|(id, value)| (*id, *value))
            .collect()
    }

    fn is_zero(&self) -> bool {
        self.values.values().all(|value| *value == 0)
    }

    fn nonzero_count(&self) -> usize {
        self.values.len()
    }
}
