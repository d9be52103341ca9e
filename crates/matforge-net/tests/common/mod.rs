//! Deterministic solve-boundary doubles.

#![allow(dead_code)]

use std::collections::VecDeque;

use matforge_core::Model;
use matforge_expr::Storage;
use matforge_solver::{Solver, SolverError, SolverStatus};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Tries every assignment, each variable limited to `lower..=lower + cap`,
/// and returns the first one with the smallest objective.
pub struct ExhaustiveSolver {
    pub cap: i64,
    pub calls: usize,
}

impl ExhaustiveSolver {
    pub fn new(cap: i64) -> Self {
        Self { cap, calls: 0 }
    }
}

impl<S: Storage> Solver<S> for ExhaustiveSolver {
    fn solve(&mut self, model: &Model<S>) -> Result<Vec<i64>, SolverError> {
        self.calls += 1;
        let domains: Vec<(i64, i64)> = model
            .variables()
            .iter()
            .map(|var| {
                let upper = var.bounds.upper.min(var.bounds.lower + self.cap);
                (var.bounds.lower, upper)
            })
            .collect();
        let space: u64 = domains
            .iter()
            .map(|(lower, upper)| (upper - lower + 1) as u64)
            .product();
        assert!(space <= 2_000_000, "search space {space} too large for the test double");

        let mut values: Vec<i64> = domains.iter().map(|(lower, _)| *lower).collect();
        let mut best: Option<(i64, Vec<i64>)> = None;
        loop {
            if model.is_feasible(&values) {
                let objective = model.objective_value(&values);
                if best.as_ref().map_or(true, |(value, _)| objective < *value) {
                    best = Some((objective, values.clone()));
                }
            }
            // odometer step
            let mut index = 0;
            loop {
                if index == values.len() {
                    return best.map(|(_, values)| values).ok_or(SolverError::NoSolution {
                        status: SolverStatus::Infeasible,
                    });
                }
                if values[index] < domains[index].1 {
                    values[index] += 1;
                    break;
                }
                values[index] = domains[index].0;
                index += 1;
            }
        }
    }
}

/// What a [`ScriptedSolver`] answers to one call.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// All-zero assignment of the right length.
    Zeros,
    /// All-one assignment of the right length.
    Ones,
    /// Assignment of the right length filled with one value.
    Fill(i64),
    /// One value too few.
    Short,
    Infeasible,
}

/// Replays canned replies and records the number of variables per call.
/// Once the script runs out every call is infeasible.
pub struct ScriptedSolver {
    script: VecDeque<Reply>,
    pub calls: Vec<usize>,
}

impl ScriptedSolver {
    pub fn new(script: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            script: script.into_iter().collect(),
            calls: Vec::new(),
        }
    }

    /// Fails every call.
    pub fn failing() -> Self {
        Self::new(Vec::new())
    }
}

impl<S: Storage> Solver<S> for ScriptedSolver {
    fn solve(&mut self, model: &Model<S>) -> Result<Vec<i64>, SolverError> {
        let n = model.num_variables();
        self.calls.push(n);
        match self.script.pop_front().unwrap_or(Reply::Infeasible) {
            Reply::Zeros => Ok(vec![0; n]),
            Reply::Ones => Ok(vec![1; n]),
            Reply::Fill(value) => Ok(vec![value; n]),
            Reply::Short => Ok(vec![0; n.saturating_sub(1)]),
            Reply::Infeasible => Err(SolverError::NoSolution {
                status: SolverStatus::Infeasible,
            }),
        }
    }
}
