use super::*;
use matforge_expr::{ComparisonKind, SparseStorage};
use proptest::prelude::*;

fn demo_model<S: Storage>() -> Model<S> {
    let mut model = Model::new();
    let xs = model.add_variables("x", 2, Bounds::binary()).unwrap();
    let k = model.add_variable("k", Bounds::non_negative()).unwrap();

    let det = Expr::from_variable(xs[0]) + Expr::from_variable(xs[1]) - Expr::term(k, 2);
    model.add_constraint("DZN", det.eq_scalar(1)).unwrap();
    let x0: Expr<S> = Expr::from_variable(xs[0]);
    model.add_constraint("Z", x0.sub(&x0).eq_scalar(0)).unwrap();
    model.add_constraint("G", x0.gt_scalar(0)).unwrap();
    model
        .minimize(Expr::term(xs[0], 3).add(&Expr::term(xs[1], -1)))
        .unwrap();
    model
}

fn columns_section(mps: &str) -> Vec<&str> {
    mps.lines()
        .skip_while(|line| !line.contains("'INTORG'"))
        .skip(1)
        .take_while(|line| !line.contains("'INTEND'"))
        .collect()
}

#[test]
fn lp_document_layout() {
    let lp = demo_model::<SparseStorage>().to_lp("demo").unwrap();
    let expected = "\\ demo
Minimize
 3 x0 - 1 x1
Subject To
 DZN0: 1 x0 + 1 x1 - 2 k0 = 1
 G0: 1 x0 >= 1
Bounds
 0 <= x0 <= 1
 0 <= x1 <= 1
 0 <= k0 <= 2147483647
Generals
 x0 x1 k0
End";
    assert_eq!(lp, expected);
}

#[test]
fn mps_document_layout() {
    let mps = demo_model::<DenseStorage>().to_mps("demo").unwrap();
    let expected = "NAME          demo
ROWS
 N   COST
 E   DZN0
 G   G0
COLUMNS
    MARK0000  'MARKER'  'INTORG'
    x0        COST      3
    x0        DZN0      1
    x0        G0        1
    x1        COST      -1
    x1        DZN0      1
    k0        DZN0      -2
    MARK0000  'MARKER'  'INTEND'
RHS
    RHS1      DZN0      1
    RHS1      G0        1
BOUNDS
 UP BND1      x0        1
 UP BND1      x1        1
 UP BND1      k0        2147483647
ENDATA";
    assert_eq!(mps, expected);
}

#[test]
fn storages_export_identically() {
    let sparse = demo_model::<SparseStorage>();
    let dense = demo_model::<DenseStorage>();
    assert_eq!(sparse.to_lp("a").unwrap(), dense.to_lp("a").unwrap());
    assert_eq!(sparse.to_mps("a").unwrap(), dense.to_mps("a").unwrap());
}

#[test]
fn all_zero_rows_are_omitted() {
    let model = demo_model::<SparseStorage>();
    let lp = model.to_lp("").unwrap();
    let mps = model.to_mps("").unwrap();
    assert!(!lp.contains("Z0"));
    assert!(!mps.contains("Z0"));
    assert!(lp.starts_with("Minimize"));
}

#[test]
fn lower_rows_shift_rhs_down() {
    let mut model: Model = Model::new();
    let x = model.add_variable("x", Bounds::new(-2, 5)).unwrap();
    model
        .add_constraint("L", Expr::term(x, 2).lt_scalar(4))
        .unwrap();
    let mps = model.to_mps("m").unwrap();
    assert!(mps.contains("\n L   L0\n"));
    assert!(mps.contains("\n    RHS1      L0        3\n"));
    assert!(mps.contains("\n LO BND1      x0        -2\n"));
    assert!(!mps.contains("COST"));

    let lp = model.to_lp("m").unwrap();
    assert!(lp.contains(" L0: 2 x0 <= 3"));
    assert!(lp.contains(" 0\nSubject To"));
}

#[test]
fn long_names_abort_mps_only() {
    let mut model: Model = Model::new();
    let x = model.add_variable("overflowing", Bounds::binary()).unwrap();
    model
        .add_constraint("c", Expr::from_variable(x).le_scalar(1))
        .unwrap();
    assert_eq!(
        model.to_mps("m"),
        Err(FormatError::NameTooLong {
            name: "overflowing0".to_string(),
            limit: NAME_WIDTH,
        })
    );
    assert!(model.to_lp("m").is_ok());

    let mut model: Model = Model::new();
    let x = model.add_variable("x", Bounds::binary()).unwrap();
    model
        .add_constraint("constraint", Expr::from_variable(x).le_scalar(1))
        .unwrap();
    assert!(matches!(
        model.to_mps("m"),
        Err(FormatError::NameTooLong { .. })
    ));
}

#[test]
fn not_equal_rows_are_rejected() {
    let mut model: Model = Model::new();
    let x = model.add_variable("x", Bounds::binary()).unwrap();
    model
        .add_constraint("N", Expr::from_variable(x).ne_scalar(0))
        .unwrap();
    let expected = Err(FormatError::UnsupportedComparison {
        constraint: "N0".to_string(),
        kind: ComparisonKind::NotEqual,
    });
    assert_eq!(model.to_lp("m"), expected);
    assert_eq!(model.to_mps("m"), expected);
}

#[test]
fn trivial_not_equal_rows_are_ignored() {
    let mut model: Model = Model::new();
    model.add_variable("x", Bounds::binary()).unwrap();
    model
        .add_constraint("N", Expr::from_constant(2).ne_scalar(0))
        .unwrap();
    assert!(model.to_lp("m").is_ok());
    assert!(model.to_mps("m").is_ok());
}

proptest! {
    #[test]
    fn one_columns_line_per_nonzero_pair(
        rows in proptest::collection::vec(
            proptest::collection::vec(-3i64..=3, 4),
            0..6,
        ),
        objective in proptest::collection::vec(-2i64..=2, 4),
    ) {
        let mut model: Model = Model::new();
        let xs = model.add_variables("x", 4, Bounds::new(0, 9)).unwrap();
        let mut expected = 0usize;
        for coeffs in &rows {
            let expr: Expr = matforge_expr::linear_terms(&xs, coeffs).unwrap();
            expected += expr.terms().len();
            model.add_constraint("c", expr.le_scalar(5)).unwrap();
        }
        let objective: Expr = matforge_expr::linear_terms(&xs, &objective).unwrap();
        expected += objective.terms().len();
        model.minimize(objective).unwrap();

        let mps = model.to_mps("p").unwrap();
        prop_assert_eq!(columns_section(&mps).len(), expected);
        let emitted_rows = rows.iter().filter(|coeffs| coeffs.iter().any(|c| *c != 0)).count();
        prop_assert_eq!(mps.lines().filter(|line| line.starts_with("    RHS1")).count(), emitted_rows);
    }
}

#[test]
fn leading_negative_term_keeps_its_sign() {
    let mut model: Model = Model::new();
    let xs = model.add_variables("x", 2, Bounds::binary()).unwrap();
    model
        .add_constraint("R", Expr::term(xs[0], -2).add(&Expr::term(xs[1], -1)).ge_scalar(-3))
        .unwrap();
    let lp = model.to_lp("").unwrap();
    assert!(lp.contains(" R0: -2 x0 - 1 x1 >= -3"));
}
