//! HiGHS implementation of the solve boundary.

use std::time::Instant;

use matforge_core::Model;
use matforge_expr::{ComparisonKind, Storage};
use matforge_solver::{Solver, SolverConfig, SolverError, SolverStatus, check_assignment};
use tracing::{debug, warn};

use crate::problem::{HighsModel, HighsOption};

/// Integrality tolerance applied when reading values back.
const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Solves matforge models with HiGHS, one fresh HiGHS instance per call.
#[derive(Debug, Clone, Default)]
pub struct HighsSolver {
    config: SolverConfig,
}

impl HighsSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl<S: Storage> Solver<S> for HighsSolver {
    fn solve(&mut self, model: &Model<S>) -> Result<Vec<i64>, SolverError> {
        solve_model(model, &self.config)
    }
}

fn apply_solver_config(highs_model: &mut HighsModel, config: &SolverConfig) {
    highs_model.set_log_to_console(config.log_to_console.unwrap_or(false));

    if let Some(limit) = config.time_limit {
        highs_model.set_option("time_limit", HighsOption::Float(limit));
    }
    if let Some(gap) = config.mip_gap {
        highs_model.set_option("mip_rel_gap", HighsOption::Float(gap));
    }
    if let Some(level) = config.verbosity {
        highs_model.set_verbosity(level);
    }
    if let Some(presolve) = config.presolve {
        let presolve_str = if presolve { "on" } else { "off" };
        highs_model.set_option("presolve", HighsOption::Str(presolve_str.to_string()));
    }
    if let Some(threads) = config.effective_threads() {
        let threads = i32::try_from(threads).unwrap_or(i32::MAX);
        highs_model.set_option("threads", HighsOption::Int(threads));
    }
}

fn add_variables_to_highs<S: Storage>(model: &Model<S>, highs_model: &mut HighsModel) {
    let objective = model.objective();
    for (index, var) in model.variables().iter().enumerate() {
        let var_id = matforge_expr::VariableId::new(index as u32);
        highs_model.add_integer_col(
            var.bounds.lower as f64,
            var.bounds.upper as f64,
            objective.coeff(var_id) as f64,
        );
    }
    debug!(
        component = "solver",
        operation = "add_variables",
        status = "success",
        num_vars = model.num_variables(),
        "Added all variables to HiGHS"
    );
}

/// Lower every row; `Ok(false)` signals a row that can never hold.
fn add_constraints_to_highs<S: Storage>(
    model: &Model<S>,
    highs_model: &mut HighsModel,
) -> Result<bool, SolverError> {
    for (name, constraint) in model.constraints() {
        if constraint.is_trivial() {
            if !constraint.is_satisfied_by(&[]) {
                debug!(
                    component = "solver",
                    operation = "add_constraints",
                    status = "infeasible",
                    constraint = name,
                    "Constant row can never hold"
                );
                return Ok(false);
            }
            continue;
        }
        let (kind, rhs) = constraint.non_strict().ok_or_else(|| {
            SolverError::Backend(format!("constraint {name} uses '!=' which HiGHS cannot express"))
        })?;
        let rhs = rhs as f64;
        let (lower, upper) = match kind {
            ComparisonKind::Equal => (rhs, rhs),
            ComparisonKind::GreaterEqual => (rhs, f64::INFINITY),
            _ => (f64::NEG_INFINITY, rhs),
        };
        let (columns, coefficients): (Vec<usize>, Vec<f64>) = constraint
            .terms()
            .into_iter()
            .map(|(var_id, coeff)| (var_id.index(), coeff as f64))
            .unzip();
        highs_model
            .add_row(lower, upper, &columns, &coefficients)
            .map_err(|err| SolverError::Backend(err.to_string()))?;
    }
    debug!(
        component = "solver",
        operation = "add_constraints",
        status = "success",
        num_constraints = model.num_constraints(),
        "Added all constraints to HiGHS"
    );
    Ok(true)
}

fn round_values(values: &[f64]) -> Result<Vec<i64>, SolverError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let rounded = value.round();
            if !value.is_finite() || (value - rounded).abs() > INTEGRALITY_TOLERANCE {
                return Err(SolverError::NonIntegral {
                    index,
                    value: *value,
                });
            }
            Ok(rounded as i64)
        })
        .collect()
}

fn solve_model<S: Storage>(model: &Model<S>, config: &SolverConfig) -> Result<Vec<i64>, SolverError> {
    if model.num_variables() == 0 {
        return Err(SolverError::EmptyModel);
    }
    let started = Instant::now();

    let mut highs_model = HighsModel::new();
    apply_solver_config(&mut highs_model, config);
    add_variables_to_highs(model, &mut highs_model);
    if !add_constraints_to_highs(model, &mut highs_model)? {
        return Err(SolverError::NoSolution {
            status: SolverStatus::Infeasible,
        });
    }

    let outcome = highs_model.solve();
    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = "highs",
        solver_status = outcome.status.as_str(),
        objective_value = outcome.objective_value,
        duration_ms,
        "HiGHS solve completed"
    );

    match outcome.status {
        SolverStatus::Optimal => {}
        SolverStatus::ReachedTimeLimit => {
            // An incumbent found before the limit is still a valid assignment.
            let incumbent = round_values(&outcome.values)
                .ok()
                .filter(|values| check_assignment(model, values).is_ok());
            return match incumbent {
                Some(values) => {
                    warn!(
                        component = "solver",
                        operation = "solve",
                        status = "warn",
                        solver = "highs",
                        duration_ms,
                        "Solver hit limit but returning best solution found"
                    );
                    Ok(values)
                }
                None => Err(SolverError::NoSolution {
                    status: outcome.status,
                }),
            };
        }
        status => return Err(SolverError::NoSolution { status }),
    }

    let values = round_values(&outcome.values)?;
    check_assignment(model, &values)?;
    Ok(values)
}
