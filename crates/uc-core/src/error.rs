//! Unified error type for the unit-commitment engine
//!
//! [`UcError`] covers every failure the pipeline can surface: malformed input
//! data, exhausted solver candidates, infeasible models, and the non-fatal
//! loss of dual prices after a valid schedule has been found.
//!
//! # Example
//!
//! ```ignore
//! use uc_algo::{solve_unit_commitment, UcConfig};
//! use uc_core::{SystemSnapshot, UcResult};
//!
//! fn run(path: &str) -> UcResult<()> {
//!     let system = SystemSnapshot::from_json_file(path)?.build()?;
//!     let outcome = solve_unit_commitment(&system, &UcConfig::default())?;
//!     if let Some(warning) = outcome.warning {
//!         eprintln!("{warning}");
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One failed attempt against a solver backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendAttempt {
    /// Backend identifier as it appears in the candidate list
    pub backend: String,
    /// Human-readable failure cause reported by the backend
    pub reason: String,
}

impl BackendAttempt {
    pub fn new(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for BackendAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.backend, self.reason)
    }
}

/// Error type for all unit-commitment operations.
#[derive(Error, Debug)]
pub enum UcError {
    /// Malformed or inconsistent input, raised before any variable is created
    #[error("Data validation error: {0}")]
    DataValidation(String),

    /// No candidate backend completed the commitment (MILP) solve
    #[error("No solver backend completed the solve: {}", join_attempts(.attempts))]
    SolverUnavailable { attempts: Vec<BackendAttempt> },

    /// Backends ran to completion but reported the model infeasible or unbounded
    #[error("Model is infeasible: {}", join_attempts(.attempts))]
    SolveInfeasible { attempts: Vec<BackendAttempt> },

    /// The pricing LP failed on every attempted backend; the schedule stands
    #[error("Dual prices unavailable: {}", join_attempts(.attempts))]
    DualUnavailable { attempts: Vec<BackendAttempt> },

    /// The requested operation does not apply in the current solve stage
    #[error("Invalid solve stage: {0}")]
    InvalidStage(String),

    /// I/O errors while reading input snapshots
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl UcError {
    /// Shorthand for a [`UcError::DataValidation`] error.
    pub fn validation(msg: impl Into<String>) -> Self {
        UcError::DataValidation(msg.into())
    }

    /// Whether the error invalidates the run.
    ///
    /// Only [`UcError::DualUnavailable`] is non-fatal: it accompanies a valid
    /// schedule whose prices could not be computed.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, UcError::DualUnavailable { .. })
    }

    /// Backend attempts recorded by solver-stage errors.
    pub fn attempts(&self) -> &[BackendAttempt] {
        match self {
            UcError::SolverUnavailable { attempts }
            | UcError::SolveInfeasible { attempts }
            | UcError::DualUnavailable { attempts } => attempts,
            _ => &[],
        }
    }
}

/// Convenience type alias for Results using UcError.
pub type UcResult<T> = Result<T, UcError>;

fn join_attempts(attempts: &[BackendAttempt]) -> String {
    if attempts.is_empty() {
        return "no backends attempted".to_string();
    }
    attempts
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for UcError {
    fn from(err: serde_json::Error) -> Self {
        UcError::Parse(err.to_string())
    }
}
