//! Concrete `good_lp` backends.

use std::time::Duration;

use good_lp::solvers::clarabel::clarabel;
use good_lp::solvers::microlp::microlp;
use good_lp::{DualValues, SolutionWithDual, SolverModel};
use tracing::debug;

use super::translate::{primal_values, termination_status, translate};
use super::{BackendCapabilities, BackendError, BackendSolution, UcBackend};
use crate::uc::model::UcModel;

/// Pure-Rust simplex with branch and bound. Solves both stages but reports no duals.
#[derive(Debug, Default, Clone, Copy)]
pub struct MicroLpBackend;

impl UcBackend for MicroLpBackend {
    fn id(&self) -> &str {
        "microlp"
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            mixed_integer: true,
            duals: false,
        }
    }

    fn attempt_solve(
        &self,
        model: &UcModel,
        time_limit: Option<Duration>,
    ) -> Result<BackendSolution, BackendError> {
        if let Some(limit) = time_limit {
            debug!(?limit, "microlp has no time limit option; ignoring");
        }
        let translated = translate(model, microlp, true)?;
        let solution = translated.problem.solve()?;
        Ok(BackendSolution {
            status: termination_status(&solution),
            values: primal_values(&solution, &translated.columns),
            duals: None,
        })
    }
}

/// Clarabel interior-point solver. Continuous models only; provides duals.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClarabelBackend;

impl UcBackend for ClarabelBackend {
    fn id(&self) -> &str {
        "clarabel"
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            mixed_integer: false,
            duals: true,
        }
    }

    fn attempt_solve(
        &self,
        model: &UcModel,
        time_limit: Option<Duration>,
    ) -> Result<BackendSolution, BackendError> {
        if model.has_free_binaries() {
            return Err(BackendError::Unsupported(
                "clarabel cannot branch on binary variables".to_string(),
            ));
        }
        let mut translated = translate(model, clarabel, false)?;
        if let Some(limit) = time_limit {
            translated.problem.settings().time_limit(limit.as_secs_f64());
        }
        let mut solution = translated.problem.solve()?;
        let values = primal_values(&solution, &translated.columns);
        let status = termination_status(&solution);

        // good_lp rescales clarabel's cone dual z into ∂objective/∂rhs,
        // the same convention the HiGHS row duals use.
        let dual = solution.compute_dual();
        let duals = translated
            .rows
            .iter()
            .map(|row| row.as_ref().map(|r| dual.dual(r.clone())))
            .collect();

        Ok(BackendSolution {
            status,
            values,
            duals: Some(duals),
        })
    }
}

/// HiGHS simplex / branch-and-cut. Solves both stages and provides LP duals.
#[cfg(feature = "solver-highs")]
#[derive(Debug, Default, Clone, Copy)]
pub struct HighsBackend;

#[cfg(feature = "solver-highs")]
impl UcBackend for HighsBackend {
    fn id(&self) -> &str {
        "highs"
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            mixed_integer: true,
            duals: true,
        }
    }

    fn attempt_solve(
        &self,
        model: &UcModel,
        time_limit: Option<Duration>,
    ) -> Result<BackendSolution, BackendError> {
        use good_lp::solvers::highs::highs;

        let is_lp = !model.has_free_binaries();
        let mut translated = translate(model, highs, true)?;
        if let Some(limit) = time_limit {
            translated.problem = translated.problem.set_time_limit(limit.as_secs_f64());
        }
        let mut solution = translated.problem.solve()?;
        let values = primal_values(&solution, &translated.columns);
        let status = termination_status(&solution);

        // Row duals are only meaningful once every binary is fixed
        let duals = if is_lp {
            let dual = solution.compute_dual();
            Some(
                translated
                    .rows
                    .iter()
                    .map(|row| row.as_ref().map(|r| dual.dual(r.clone())))
                    .collect(),
            )
        } else {
            None
        };

        Ok(BackendSolution {
            status,
            values,
            duals,
        })
    }
}
