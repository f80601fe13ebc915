//! Translation of [`UcModel`] into a `good_lp` problem.
//!
//! Every backend goes through the same three steps: declare columns from the
//! variable table, minimise the objective with the chosen solver, then add
//! one row per constraint record while keeping the row references for dual
//! lookups.

use good_lp::constraint::{self, ConstraintReference};
use good_lp::{
    variable, Expression, ProblemVariables, ResolutionError, Solution, SolutionStatus, Solver,
    SolverModel, Variable,
};

use super::{BackendError, TerminationStatus};
use crate::uc::model::{ConstraintRecord, Sense, UcModel};

/// Tolerance for rows that lost all variable terms.
const EMPTY_ROW_TOL: f64 = 1e-9;

/// A model ready to solve, with the bookkeeping needed to read results back.
pub(crate) struct Translated<M> {
    pub problem: M,
    pub columns: Vec<Variable>,
    /// One entry per constraint record; `None` for rows dropped as trivial
    pub rows: Vec<Option<ConstraintReference>>,
}

/// Build the `good_lp` problem for `model` using `solver`.
///
/// Unfixed binaries become integer columns only when `integer_columns` is
/// set; otherwise they are relaxed to `[0, 1]`.
pub(crate) fn translate<S: Solver>(
    model: &UcModel,
    solver: S,
    integer_columns: bool,
) -> Result<Translated<S::Model>, BackendError> {
    let mut vars = ProblemVariables::new();
    let columns: Vec<Variable> = model
        .variables()
        .iter()
        .map(|entry| {
            if integer_columns && entry.is_free_binary() {
                return vars.add(variable().binary());
            }
            let (lower, upper) = entry.bounds();
            let mut def = variable();
            if lower.is_finite() {
                def = def.min(lower);
            }
            if upper.is_finite() {
                def = def.max(upper);
            }
            vars.add(def)
        })
        .collect();

    let mut objective = Expression::with_capacity(model.objective().terms().len());
    for (var, coeff) in model.objective().clone().compact().terms() {
        objective.add_mul(*coeff, columns[var.index()]);
    }

    let mut problem = vars.minimise(objective).using(solver);
    let rows = model
        .constraints()
        .iter()
        .map(|record| add_row(&mut problem, record, &columns))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Translated {
        problem,
        columns,
        rows,
    })
}

fn add_row<M: SolverModel>(
    problem: &mut M,
    record: &ConstraintRecord,
    columns: &[Variable],
) -> Result<Option<ConstraintReference>, BackendError> {
    if record.expr.is_empty() {
        // 0 (op) rhs: either always true or the model cannot be satisfied
        if record.is_satisfied(&[], EMPTY_ROW_TOL) {
            return Ok(None);
        }
        return Err(BackendError::Infeasible);
    }

    let mut lhs = Expression::with_capacity(record.expr.terms().len());
    for &(var, coeff) in record.expr.terms() {
        lhs.add_mul(coeff, columns[var.index()]);
    }
    let rhs = Expression::from(record.rhs);
    let row = match record.sense {
        Sense::Eq => constraint::eq(lhs, rhs),
        Sense::Le => constraint::leq(lhs, rhs),
        Sense::Ge => constraint::leq(rhs, lhs),
    };
    Ok(Some(problem.add_constraint(row)))
}

/// Read primal values in `VarId` order.
pub(crate) fn primal_values<S: Solution>(solution: &S, columns: &[Variable]) -> Vec<f64> {
    columns.iter().map(|&c| solution.value(c)).collect()
}

pub(crate) fn termination_status<S: Solution>(solution: &S) -> TerminationStatus {
    match solution.status() {
        SolutionStatus::Optimal => TerminationStatus::Optimal,
        SolutionStatus::TimeLimit => TerminationStatus::TimeLimit,
        SolutionStatus::GapLimit => TerminationStatus::GapLimit,
    }
}

impl From<ResolutionError> for BackendError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::Infeasible => BackendError::Infeasible,
            ResolutionError::Unbounded => BackendError::Unbounded,
            ResolutionError::Other(msg) if msg.to_ascii_lowercase().contains("time") => {
                BackendError::TimedOut
            }
            ResolutionError::Other(msg) => BackendError::Failed(msg.to_string()),
            ResolutionError::Str(msg) => BackendError::Failed(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_mapping() {
        assert_eq!(
            BackendError::from(ResolutionError::Infeasible),
            BackendError::Infeasible
        );
        assert_eq!(
            BackendError::from(ResolutionError::Unbounded),
            BackendError::Unbounded
        );
        assert_eq!(
            BackendError::from(ResolutionError::Other("Time limit reached")),
            BackendError::TimedOut
        );
        assert_eq!(
            BackendError::from(ResolutionError::Other("Numerical error")),
            BackendError::Failed("Numerical error".into())
        );
        assert_eq!(
            BackendError::from(ResolutionError::Str("bad pivot".into())),
            BackendError::Failed("bad pivot".into())
        );
    }
}
