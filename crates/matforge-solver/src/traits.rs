//! The solve boundary.

use matforge_core::Model;
use matforge_expr::Storage;

use crate::SolverError;

/// A backend able to solve a finished model.
///
/// On success the values are ordered like the model's variables, one per
/// variable. Infeasibility, timeouts and backend failures all surface as
/// `Err`.
pub trait Solver<S: Storage> {
    fn solve(&mut self, model: &Model<S>) -> Result<Vec<i64>, SolverError>;
}

impl<S: Storage, T: Solver<S> + ?Sized> Solver<S> for &mut T {
    fn solve(&mut self, model: &Model<S>) -> Result<Vec<i64>, SolverError> {
        (**self).solve(model)
    }
}

impl<S: Storage, T: Solver<S> + ?Sized> Solver<S> for Box<T> {
    fn solve(&mut self, model: &Model<S>) -> Result<Vec<i64>, SolverError> {
        (**self).solve(model)
    }
}

/// Check a returned assignment against the model it came from.
pub fn check_assignment<S: Storage>(model: &Model<S>, values: &[i64]) -> Result<(), SolverError> {
    if values.len() != model.num_variables() {
        return Err(SolverError::SolutionLength {
            expected: model.num_variables(),
            actual: values.len(),
        });
    }
    if let Some((var, value)) = model
        .variables()
        .iter()
        .zip(values)
        .find(|(var, value)| !var.bounds.contains(**value))
    {
        return Err(SolverError::InvalidAssignment {
            reason: format!("{} = {} lies outside its bounds", var.name, value),
        });
    }
    if let Some((name, _)) = model
        .constraints()
        .find(|(_, constraint)| !constraint.is_satisfied_by(values))
    {
        return Err(SolverError::InvalidAssignment {
            reason: format!("constraint {name} is violated"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use matforge_core::Bounds;
    use matforge_expr::{Expr, SparseStorage};

    struct Fixed(Vec<i64>);

    impl<S: Storage> Solver<S> for Fixed {
        fn solve(&mut self, _model: &Model<S>) -> Result<Vec<i64>, SolverError> {
            Ok(self.0.clone())
        }
    }

    fn model() -> Model<SparseStorage> {
        let mut model = Model::new();
        let xs = model.add_variables("x", 2, Bounds::new(0, 3)).unwrap();
        model
            .add_constraint(
                "c",
                Expr::from_variable(xs[0]).add(&Expr::from_variable(xs[1])).eq_scalar(3),
            )
            .unwrap();
        model
    }

    #[test]
    fn boxed_and_borrowed_solvers_delegate() {
        let mut fixed = Fixed(vec![1, 2]);
        let model = model();
        assert_eq!((&mut fixed).solve(&model), Ok(vec![1, 2]));

        let mut boxed: Box<dyn Solver<SparseStorage>> = Box::new(Fixed(vec![3, 0]));
        assert_eq!(boxed.solve(&model), Ok(vec![3, 0]));
    }

    #[test]
    fn check_assignment_reports_problems() {
        let model = model();
        assert_eq!(check_assignment(&model, &[1, 2]), Ok(()));
        assert_eq!(
            check_assignment(&model, &[1]),
            Err(SolverError::SolutionLength {
                expected: 2,
                actual: 1
            })
        );
        assert!(matches!(
            check_assignment(&model, &[4, -1]),
            Err(SolverError::InvalidAssignment { .. })
        ));
        let err = check_assignment(&model, &[1, 1]).unwrap_err();
        assert!(err.to_string().contains("c0"));
    }
}
