//! Day-ahead Unit Commitment (UC)
//!
//! This module builds a DC-network Mixed-Integer Linear Program deciding which
//! generators run in each period and at what output, solves it, and prices
//! energy at every bus.
//!
//! ## Problem Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UNIT COMMITMENT (UC)                                                    │
//! │  ────────────────────                                                    │
//! │                                                                          │
//! │  Given:                                                                  │
//! │    • Generator fleet (limits, ramps, run times, cost curves)            │
//! │    • DC network (buses, lines with reactance and thermal limits)        │
//! │    • Demand, renewable, and reserve forecasts for periods 1..H          │
//! │                                                                          │
//! │  Decide:                                                                 │
//! │    • Commitment, startup, shutdown per unit and period (binary)         │
//! │    • Dispatch, segment output, reserve allocation (continuous)          │
//! │    • Bus angles and line flows (continuous)                             │
//! │                                                                          │
//! │  Minimize:                                                               │
//! │    Piecewise energy cost + startup cost + shutdown cost                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Formulation
//!
//! ```text
//! minimize    Σ mc_gs · p_gst + Σ SU_g · v_gt + Σ SD_g · w_gt
//!
//! subject to:
//!   p_gt = Σ_s p_gst,  0 ≤ p_gst ≤ width_gs            Segment linearization
//!   Pmin_g·u_gt ≤ p_gt ≤ Pmax_g·u_gt                   Dispatch limits
//!   p_gt − p_g,t−1 ≤ RU_g,  p_g,t−1 − p_gt ≤ RD_g      Ramping
//!   v_gt ≥ u_gt − u_g,t−1,  w_gt ≥ u_g,t−1 − u_gt      Startup/shutdown logic
//!   Σ_{τ=t}^{t+UT−1} v_gτ ≤ u_g,t+UT−1                  Minimum up time
//!   Σ_{τ=t}^{t+DT−1} w_gτ ≤ 1 − u_g,t+DT−1              Minimum down time
//!   Σ p_bt + inflow_bt − outflow_bt = D_bt − R_bt       Nodal balance (→ LMP)
//!   f_lt = (θ_from − θ_to) / X_l,  |f_lt| ≤ F_l         DC flow
//!   Σ (Pmax_g·u_gt − p_gt) ≥ SR_t                      Spinning reserve
//! ```
//!
//! ## Solve Protocol
//!
//! 1. Solve the MILP with the first candidate backend that succeeds.
//! 2. Round and fix every binary.
//! 3. Re-solve the remaining LP and read nodal-balance duals as LMPs.
//!
//! Losing the prices in step 3 is reported as a warning; the schedule from
//! step 1 stands.
//!
//! ## References
//!
//! - **Carrión & Arroyo (2006)**: "A computationally efficient mixed-integer
//!   linear formulation for the thermal unit commitment problem"
//! - **O'Neill et al. (2005)**: "Efficient market-clearing prices in markets
//!   with nonconvexities"
//!   - Pricing by fixing integer decisions and re-solving the LP

pub mod backend;
mod builder;
mod config;
mod export;
pub mod model;
mod orchestrator;
mod solution;

pub use backend::{
    BackendCapabilities, BackendError, BackendRegistry, BackendSolution, ClarabelBackend,
    MicroLpBackend, TerminationStatus, UcBackend,
};
#[cfg(feature = "solver-highs")]
pub use backend::HighsBackend;
pub use builder::{build_model, ModelBuilder};
pub use config::UcConfig;
#[cfg(feature = "csv")]
pub use export::export_results;
pub use export::{ExportPaths, LMPS_FILE, RESULTS_FILE, SCHEDULES_FILE};
pub use model::{
    ConstraintId, ConstraintRecord, ConstraintTag, LinearExpr, Sense, UcModel, VarEntry, VarId,
    VarKey, VarKind,
};
pub use orchestrator::{
    solve_unit_commitment, solve_with_registry, SolveStage, UcOutcome, UcRun,
};
pub use solution::{CostBreakdown, PriceRecord, ScheduleRecord, UcResults};
