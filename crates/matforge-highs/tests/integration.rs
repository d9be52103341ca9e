use matforge_core::{Bounds, Model};
use matforge_expr::{DenseStorage, Expr};
use matforge_highs::HighsSolver;
use matforge_solver::{Solver, SolverConfig, SolverError, SolverStatus};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// minimize x + 2y subject to x + y >= 3, x, y in [0, 2]
#[test]
fn solves_small_integer_program() {
    init_tracing();
    let mut model: Model = Model::new();
    let x = model.add_variable("x", Bounds::new(0, 2)).unwrap();
    let y = model.add_variable("y", Bounds::new(0, 2)).unwrap();
    model
        .add_constraint(
            "c",
            Expr::from_variable(x).add(&Expr::from_variable(y)).ge_scalar(3),
        )
        .unwrap();
    model
        .minimize(Expr::from_variable(x).add(&Expr::term(y, 2)))
        .unwrap();

    let mut solver = HighsSolver::new(SolverConfig::new().with_threads(1));
    let values = solver.solve(&model).expect("solve should succeed");
    assert_eq!(values, vec![2, 1]);
    assert_eq!(model.objective_value(&values), 4);
}

/// x0 + x1 - 2k == 1 over GF(2) unknowns, the shape of a single net row.
#[test]
fn solves_mod_two_parity_row() {
    init_tracing();
    let mut model: Model<DenseStorage> = Model::new();
    let xs = model.add_variables("x", 2, Bounds::binary()).unwrap();
    let k = model.add_variable("k", Bounds::non_negative()).unwrap();
    let det = Expr::from_variable(xs[0]) + Expr::from_variable(xs[1]) - Expr::term(k, 2);
    model.add_constraint("DZN", det.eq_scalar(1)).unwrap();
    model.minimize(Expr::term(xs[1], 1)).unwrap();

    let values = HighsSolver::default().solve(&model).expect("feasible");
    assert_eq!(values, vec![1, 0, 0]);
    assert!(model.is_feasible(&values));
}

#[test]
fn strict_rows_are_tightened() {
    init_tracing();
    let mut model: Model = Model::new();
    let x = model.add_variable("x", Bounds::new(0, 10)).unwrap();
    model
        .add_constraint("g", Expr::from_variable(x).gt_scalar(2))
        .unwrap();
    model.minimize(Expr::from_variable(x)).unwrap();

    let values = HighsSolver::default().solve(&model).expect("feasible");
    assert_eq!(values, vec![3]);
}

#[test]
fn infeasible_model_reports_status() {
    init_tracing();
    let mut model: Model = Model::new();
    let x = model.add_variable("x", Bounds::binary()).unwrap();
    model
        .add_constraint("e", Expr::from_variable(x).eq_scalar(2))
        .unwrap();

    let err = HighsSolver::default().solve(&model).unwrap_err();
    assert_eq!(
        err,
        SolverError::NoSolution {
            status: SolverStatus::Infeasible
        }
    );
}

#[test]
fn constant_false_row_is_infeasible() {
    let mut model: Model = Model::new();
    model.add_variable("x", Bounds::binary()).unwrap();
    model
        .add_constraint("z", Expr::from_constant(0).eq_scalar(1))
        .unwrap();

    let err = HighsSolver::default().solve(&model).unwrap_err();
    assert_eq!(err.code(), "SOLVER_INFEASIBLE");
}

#[test]
fn not_equal_rows_are_backend_errors() {
    let mut model: Model = Model::new();
    let x = model.add_variable("x", Bounds::binary()).unwrap();
    model
        .add_constraint("n", Expr::from_variable(x).ne_scalar(0))
        .unwrap();

    let err = HighsSolver::default().solve(&model).unwrap_err();
    assert!(matches!(err, SolverError::Backend(_)));
}
