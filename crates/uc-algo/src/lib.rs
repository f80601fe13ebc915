//! # uc-algo: Unit Commitment Optimization
//!
//! This crate turns a validated [`uc_core::SystemData`] into an explicit
//! mixed-integer model, solves it through pluggable backends, and projects
//! the result into schedule and price records.
//!
//! ## Architecture
//!
//! - **[`uc::ModelBuilder`]**: enumerates typed variables and constraint records
//! - **[`uc::UcBackend`]**: solver capability (MILP/LP solve, row duals)
//! - **[`uc::BackendRegistry`]**: lookup of backends by candidate id
//! - **[`uc::UcRun`]**: the two-stage solve state machine
//! - **[`uc::UcResults`]**: schedule/price projection and export
//!
//! | Backend | Problem Class | Duals |
//! |---------|---------------|-------|
//! | `highs` (feature `solver-highs`) | MILP, LP | yes |
//! | `microlp` | MILP, LP | no |
//! | `clarabel` | LP | yes |
//!
//! ## Example
//!
//! ```ignore
//! use uc_algo::{solve_unit_commitment, UcConfig};
//! use uc_core::SystemSnapshot;
//!
//! let system = SystemSnapshot::from_json_file("system.json")?.build()?;
//! let outcome = solve_unit_commitment(&system, &UcConfig::default())?;
//! println!("{}", outcome.results.summary());
//! ```

pub mod uc;

pub use uc::{
    build_model, solve_unit_commitment, solve_with_registry, BackendRegistry, SolveStage,
    UcConfig, UcOutcome, UcResults, UcRun,
};
#[cfg(feature = "csv")]
pub use uc::export_results;
