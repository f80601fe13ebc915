//! Solver backends for the commitment model.
//!
//! A backend takes an explicit [`UcModel`] and returns primal values (and,
//! when it can, duals of every row). Backends never see the system data;
//! the orchestrator picks them by id from a [`BackendRegistry`].
//!
//! | Backend | Problem classes | Duals | Time limit |
//! |---------|-----------------|-------|------------|
//! | `highs` (feature `solver-highs`) | MILP, LP | yes | yes |
//! | `microlp` | MILP, LP | no | ignored |
//! | `clarabel` | LP only | yes | yes |

mod registry;
mod solvers;
mod translate;

use std::time::Duration;

use thiserror::Error;

use super::model::{ConstraintId, UcModel};

pub use registry::BackendRegistry;
pub use solvers::{ClarabelBackend, MicroLpBackend};
#[cfg(feature = "solver-highs")]
pub use solvers::HighsBackend;

/// What a backend can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendCapabilities {
    /// Can branch on binary variables
    pub mixed_integer: bool,
    /// Reports row duals after an LP solve
    pub duals: bool,
}

/// How a successful solve terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationStatus {
    Optimal,
    /// Best incumbent when the time limit was hit
    TimeLimit,
    /// Stopped at the configured MIP gap
    GapLimit,
}

impl std::fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationStatus::Optimal => write!(f, "optimal"),
            TerminationStatus::TimeLimit => write!(f, "time limit"),
            TerminationStatus::GapLimit => write!(f, "gap limit"),
        }
    }
}

/// Backend failure for a single attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Backend id not registered, or compiled out
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// Backend cannot handle this model (e.g. binaries on an LP-only solver)
    #[error("unsupported model: {0}")]
    Unsupported(String),

    #[error("infeasible")]
    Infeasible,

    #[error("unbounded")]
    Unbounded,

    #[error("time limit reached without a solution")]
    TimedOut,

    #[error("solver failed: {0}")]
    Failed(String),
}

impl BackendError {
    /// Failure that reflects the model rather than the backend.
    pub fn is_model_property(&self) -> bool {
        matches!(self, BackendError::Infeasible | BackendError::Unbounded)
    }
}

/// Values returned by a successful solve.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSolution {
    pub status: TerminationStatus,
    /// Primal values indexed by `VarId`
    pub values: Vec<f64>,
    /// Shadow prices indexed by `ConstraintId`, normalized to
    /// `∂objective/∂rhs`. `None` when the backend reports no duals.
    pub duals: Option<Vec<Option<f64>>>,
}

impl BackendSolution {
    /// Shadow price of a constraint, if the backend produced one for it.
    pub fn read_dual(&self, constraint: ConstraintId) -> Option<f64> {
        self.duals
            .as_ref()
            .and_then(|d| d.get(constraint.index()).copied().flatten())
    }
}

/// A solver capable of handling [`UcModel`]s.
///
/// Implementations are blocking; there is no cancellation once
/// [`UcBackend::attempt_solve`] is running.
pub trait UcBackend: Send + Sync {
    /// Identifier used in candidate lists (e.g. "microlp").
    fn id(&self) -> &str;

    fn capabilities(&self) -> BackendCapabilities;

    /// Runtime availability check.
    fn is_available(&self) -> bool {
        true
    }

    /// Solve `model`, honoring `time_limit` where the backend supports one.
    fn attempt_solve(
        &self,
        model: &UcModel,
        time_limit: Option<Duration>,
    ) -> Result<BackendSolution, BackendError>;
}
