//! Row-by-row construction with backtracking.
//!
//! Step `m` builds a fresh model whose unknowns are column `m - 1` of every
//! matrix, lets each generator add its rows, and asks the solver for an
//! assignment. An infeasible step retreats two rows; too many retreats
//! restart from an empty matrix set.

use std::fmt;
use std::marker::PhantomData;
use std::time::Instant;

use matforge_core::{Bounds, Model, ModelError};
use matforge_expr::{Expr, SparseStorage, Storage};
use matforge_solver::Solver;
use tracing::{debug, info, trace, warn};

use crate::field::{FieldArithmetic, FieldElement, GaloisField};
use crate::generators::{GeneratorError, RowContext};
use crate::matrix::{GfMatrix, MatrixError};
use crate::program::{Program, ProgramError};
use crate::tiebreak::TieBreakSampler;

/// Errors surfaced by a construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    Program(ProgramError),
    Generator(GeneratorError),
    Matrix(MatrixError),
    /// Every allowed restart ended without reaching the target.
    ExhaustedRetries {
        rows_reached: usize,
        target_rows: usize,
        restarts: u32,
    },
}

impl ConstructionError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ConstructionError::Program(err) => err.code(),
            ConstructionError::Generator(err) => err.code(),
            ConstructionError::Matrix(err) => err.code(),
            ConstructionError::ExhaustedRetries { .. } => "CONSTRUCTION_EXHAUSTED_RETRIES",
        }
    }
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::Program(err) => write!(f, "{err}"),
            ConstructionError::Generator(err) => write!(f, "{err}"),
            ConstructionError::Matrix(err) => write!(f, "{err}"),
            ConstructionError::ExhaustedRetries {
                rows_reached,
                target_rows,
                restarts,
            } => write!(
                f,
                "[{}] Reached {} of {} rows after {} restarts",
                self.code(),
                rows_reached,
                target_rows,
                restarts
            ),
        }
    }
}

impl std::error::Error for ConstructionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConstructionError::Program(err) => Some(err),
            ConstructionError::Generator(err) => Some(err),
            ConstructionError::Matrix(err) => Some(err),
            ConstructionError::ExhaustedRetries { .. } => None,
        }
    }
}

impl From<ProgramError> for ConstructionError {
    fn from(err: ProgramError) -> Self {
        ConstructionError::Program(err)
    }
}

impl From<GeneratorError> for ConstructionError {
    fn from(err: GeneratorError) -> Self {
        ConstructionError::Generator(err)
    }
}

impl From<ModelError> for ConstructionError {
    fn from(err: ModelError) -> Self {
        ConstructionError::Generator(GeneratorError::Model(err))
    }
}

impl From<MatrixError> for ConstructionError {
    fn from(err: MatrixError) -> Self {
        ConstructionError::Matrix(err)
    }
}

/// Construction loop settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Failed steps tolerated within one attempt.
    pub backtrack_max: u32,
    /// Attempts before giving up.
    pub greedy_fail_max: u32,
    /// Pull every unknown towards a random target to vary solutions.
    pub tie_break: bool,
    pub seed: u64,
    /// Raw draws discarded before the first step.
    pub burn_in: u64,
    /// Weight of the structural objective against the tie-break.
    pub objective_scale: i64,
}

impl OrchestratorConfig {
    pub const DEFAULT_SEED: u64 = 133_742;

    pub fn new() -> Self {
        Self {
            backtrack_max: 100,
            greedy_fail_max: 100,
            tie_break: true,
            seed: Self::DEFAULT_SEED,
            burn_in: 0,
            objective_scale: 1000,
        }
    }

    pub fn with_backtrack_max(mut self, backtrack_max: u32) -> Self {
        self.backtrack_max = backtrack_max;
        self
    }

    pub fn with_greedy_fail_max(mut self, greedy_fail_max: u32) -> Self {
        self.greedy_fail_max = greedy_fail_max;
        self
    }

    pub fn with_tie_break(mut self, tie_break: bool) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_burn_in(mut self, burn_in: u64) -> Self {
        self.burn_in = burn_in;
        self
    }

    pub fn with_objective_scale(mut self, objective_scale: i64) -> Self {
        self.objective_scale = objective_scale;
        self
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of [`Orchestrator::construct`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Construction {
    /// One matrix per dimension, from the last attempt.
    pub matrices: Vec<GfMatrix>,
    /// Rows committed and still valid in `matrices`.
    pub rows_reached: usize,
    pub target_rows: usize,
    pub restarts: u32,
    /// Failed steps over all attempts.
    pub backtracks: u32,
}

impl Construction {
    pub fn is_complete(&self) -> bool {
        self.rows_reached == self.target_rows
    }

    /// The matrices, or `ExhaustedRetries` when the target was missed.
    pub fn into_matrices(self) -> Result<Vec<GfMatrix>, ConstructionError> {
        if !self.is_complete() {
            return Err(ConstructionError::ExhaustedRetries {
                rows_reached: self.rows_reached,
                target_rows: self.target_rows,
                restarts: self.restarts,
            });
        }
        Ok(self.matrices)
    }
}

/// Step after a failure at step `m`: rows `1..=kept` stay, `kept + 1` is
/// solved next.
pub fn retreat(m: usize) -> usize {
    if m >= 3 { m - 2 } else { 0 }
}

/// Drives a solver through the row-by-row construction.
pub struct Orchestrator<S: Storage = SparseStorage, B: Solver<S> = Box<dyn Solver<S>>> {
    solver: B,
    config: OrchestratorConfig,
    sampler: TieBreakSampler,
    _storage: PhantomData<S>,
}

impl<S: Storage + 'static, B: Solver<S>> Orchestrator<S, B> {
    pub fn new(solver: B, config: OrchestratorConfig) -> Self {
        let mut sampler = TieBreakSampler::new(config.seed);
        sampler.burn_in(config.burn_in);
        Self {
            solver,
            config,
            sampler,
            _storage: PhantomData,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn solver(&self) -> &B {
        &self.solver
    }

    pub fn into_solver(self) -> B {
        self.solver
    }

    /// Model for step `m` against the matrices committed so far.
    ///
    /// Variables `0..m*s` are the unknowns, `m` per dimension. With the
    /// tie-break on, the sampler advances once per unknown.
    pub fn build_model(
        &mut self,
        program: &Program<S>,
        field: &GaloisField,
        matrices: &[GfMatrix],
        m: usize,
    ) -> Result<Model<S>, ConstructionError> {
        let q = field.order();
        let mut model = Model::new();
        let unknowns = model.add_variables(
            "x",
            m * program.dimensions(),
            Bounds::new(0, i64::from(q) - 1),
        )?;

        let mut objective = Expr::new_empty();
        {
            let mut ctx = RowContext {
                field,
                matrices,
                rows: m,
                model: &mut model,
                unknowns: &unknowns,
                objective: &mut objective,
            };
            for generator in program.generators() {
                generator.apply(&mut ctx)?;
            }
        }
        let mut objective = objective.scale(self.config.objective_scale);

        if self.config.tie_break {
            // min |x - c| as min d with x - c <= d and c - x <= d
            for unknown in &unknowns {
                let target = self.sampler.sample(q);
                let deviation = model.add_variable("O", Bounds::non_negative())?;
                objective.push_term(deviation, 1);
                let x: Expr<S> = Expr::from_variable(*unknown);
                let d: Expr<S> = Expr::from_variable(deviation);
                model.add_constraint("OBJL", x.add_constant(-target).le_expr(&d))?;
                model.add_constraint("OBJH", Expr::from_constant(target).sub(&x).le_expr(&d))?;
            }
        }
        model.minimize(objective)?;

        trace!(
            component = "orchestrator",
            operation = "build_model",
            status = "success",
            rows = m,
            num_vars = model.num_variables(),
            num_constraints = model.num_constraints(),
            "Built step model"
        );
        Ok(model)
    }

    /// Solve one step; `None` means the step failed for whatever reason.
    fn solve_step(&mut self, model: &Model<S>, unknowns: usize, order: u32) -> Option<Vec<FieldElement>> {
        let values = match self.solver.solve(model) {
            Ok(values) => values,
            Err(err) => {
                debug!(
                    component = "orchestrator",
                    operation = "solve_step",
                    status = "infeasible",
                    code = err.code(),
                    error = %err,
                    "Step has no solution"
                );
                return None;
            }
        };
        if values.len() != model.num_variables() || values.len() < unknowns {
            warn!(
                component = "orchestrator",
                operation = "solve_step",
                status = "error",
                expected = model.num_variables(),
                actual = values.len(),
                "Solver returned a wrong number of values"
            );
            return None;
        }
        let column: Option<Vec<FieldElement>> = values[..unknowns]
            .iter()
            .map(|value| {
                FieldElement::try_from(*value)
                    .ok()
                    .filter(|value| *value < order)
            })
            .collect();
        if column.is_none() {
            warn!(
                component = "orchestrator",
                operation = "solve_step",
                status = "error",
                "Solver returned a value outside the field"
            );
        }
        column
    }

    /// Run the construction for `program`.
    ///
    /// Infeasible steps are retried by retreating; the result carries the
    /// last attempt whether or not it reached the target.
    pub fn construct(&mut self, program: &Program<S>) -> Result<Construction, ConstructionError> {
        let field = program.validate()?;
        let dimensions = program.dimensions();
        let target_rows = program.target_rows();
        let started = Instant::now();

        info!(
            component = "orchestrator",
            operation = "construct",
            status = "start",
            dimensions,
            base = field.order(),
            target_rows,
            generators = program.generators().len(),
            "Starting construction"
        );

        let mut construction = Construction {
            matrices: vec![GfMatrix::new(target_rows); dimensions],
            rows_reached: 0,
            target_rows,
            restarts: 0,
            backtracks: 0,
        };

        while construction.restarts < self.config.greedy_fail_max {
            construction.matrices = vec![GfMatrix::new(target_rows); dimensions];
            construction.rows_reached = 0;
            if self.attempt(program, &field, &mut construction)? {
                break;
            }
            construction.restarts += 1;
            warn!(
                component = "orchestrator",
                operation = "construct",
                status = "restart",
                restarts = construction.restarts,
                rows_reached = construction.rows_reached,
                "Backtrack budget exhausted, restarting"
            );
        }

        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        if construction.is_complete() {
            info!(
                component = "orchestrator",
                operation = "construct",
                status = "success",
                target_rows,
                restarts = construction.restarts,
                backtracks = construction.backtracks,
                duration_ms,
                "Construction complete"
            );
        } else {
            warn!(
                component = "orchestrator",
                operation = "construct",
                status = "incomplete",
                rows_reached = construction.rows_reached,
                target_rows,
                restarts = construction.restarts,
                duration_ms,
                "Construction gave up"
            );
        }
        Ok(construction)
    }

    /// One attempt from an empty matrix set; `true` when the target was
    /// reached.
    fn attempt(
        &mut self,
        program: &Program<S>,
        field: &GaloisField,
        construction: &mut Construction,
    ) -> Result<bool, ConstructionError> {
        let dimensions = program.dimensions();
        let mut backtracks = 0u32;
        let mut m = 1;
        while m <= construction.target_rows {
            let model = self.build_model(program, field, &construction.matrices, m)?;
            match self.solve_step(&model, m * dimensions, field.order()) {
                Some(values) => {
                    for (matrix, column) in construction
                        .matrices
                        .iter_mut()
                        .zip(values.chunks(m))
                    {
                        matrix.commit_step(m, column)?;
                    }
                    construction.rows_reached = m;
                    debug!(
                        component = "orchestrator",
                        operation = "commit",
                        status = "success",
                        rows = m,
                        "Committed row"
                    );
                    m += 1;
                }
                None => {
                    backtracks += 1;
                    construction.backtracks += 1;
                    if backtracks > self.config.backtrack_max {
                        return Ok(false);
                    }
                    let kept = retreat(m);
                    debug!(
                        component = "orchestrator",
                        operation = "backtrack",
                        status = "retreat",
                        failed_rows = m,
                        kept_rows = kept,
                        backtracks,
                        "Retreating"
                    );
                    construction.rows_reached = kept;
                    m = kept + 1;
                }
            }
        }
        Ok(true)
    }
}

impl<S: Storage, B: Solver<S>> fmt::Debug for Orchestrator<S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("sampler", &self.sampler)
            .finish_non_exhaustive()
    }
}
