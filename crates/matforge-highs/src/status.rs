//! HiGHS status conversion.

use highs::HighsModelStatus;
use matforge_solver::SolverStatus;

pub(crate) fn map_status(status: HighsModelStatus) -> SolverStatus {
    match status {
        HighsModelStatus::Optimal => SolverStatus::Optimal,
        // Every column carries finite bounds, so only infeasibility is possible.
        HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
            SolverStatus::Infeasible
        }
        HighsModelStatus::Unbounded => SolverStatus::Unbounded,
        HighsModelStatus::ReachedTimeLimit | HighsModelStatus::ReachedIterationLimit => {
            SolverStatus::ReachedTimeLimit
        }
        _ => SolverStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_terminal_statuses() {
        assert_eq!(map_status(HighsModelStatus::Optimal), SolverStatus::Optimal);
        assert_eq!(
            map_status(HighsModelStatus::UnboundedOrInfeasible),
            SolverStatus::Infeasible
        );
        assert_eq!(
            map_status(HighsModelStatus::ReachedIterationLimit),
            SolverStatus::ReachedTimeLimit
        );
        assert_eq!(map_status(HighsModelStatus::NotSet), SolverStatus::Unknown);
    }
}
