//! Two-stage solve protocol.
//!
//! ```text
//! Unsolved ──solve_milp──► MilpSolved ──fix_binaries──► BinariesFixed ──resolve_lp──► LpResolved
//!     │                                                      │
//!     └── every candidate failed ──► Failed                  └── no duals: stays BinariesFixed
//! ```
//!
//! Each transition is a separate method on [`UcRun`] so the stages can be
//! driven (and tested) one at a time. [`solve_unit_commitment`] runs the
//! whole sequence and projects the result.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};
use uc_core::{BackendAttempt, BusId, SystemData, UcError, UcResult};

use super::backend::{BackendError, BackendRegistry, BackendSolution, TerminationStatus};
use super::builder::build_model;
use super::config::UcConfig;
use super::model::UcModel;
use super::solution::UcResults;

/// Position in the solve state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStage {
    Unsolved,
    MilpSolved,
    BinariesFixed,
    LpResolved,
    Failed,
}

impl SolveStage {
    /// Stages that hold a valid schedule.
    pub fn has_schedule(&self) -> bool {
        matches!(
            self,
            SolveStage::MilpSolved | SolveStage::BinariesFixed | SolveStage::LpResolved
        )
    }
}

impl fmt::Display for SolveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveStage::Unsolved => "unsolved",
            SolveStage::MilpSolved => "milp-solved",
            SolveStage::BinariesFixed => "binaries-fixed",
            SolveStage::LpResolved => "lp-resolved",
            SolveStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Maximum backend calls for the pricing LP.
const MAX_LP_ATTEMPTS: usize = 2;

/// One build/solve run. Owns the model exclusively.
#[derive(Debug)]
pub struct UcRun {
    model: UcModel,
    stage: SolveStage,
    values: Option<Vec<f64>>,
    duals: Option<Vec<Option<f64>>>,
    milp_status: Option<TerminationStatus>,
    milp_objective: Option<f64>,
    milp_backend: Option<String>,
    lp_backend: Option<String>,
    attempts: Vec<BackendAttempt>,
    lp_attempts: Vec<BackendAttempt>,
    rounding_gap: f64,
}

impl UcRun {
    pub fn new(model: UcModel) -> Self {
        Self {
            model,
            stage: SolveStage::Unsolved,
            values: None,
            duals: None,
            milp_status: None,
            milp_objective: None,
            milp_backend: None,
            lp_backend: None,
            attempts: Vec::new(),
            lp_attempts: Vec::new(),
            rounding_gap: 0.0,
        }
    }

    pub fn stage(&self) -> SolveStage {
        self.stage
    }

    pub fn model(&self) -> &UcModel {
        &self.model
    }

    /// Primal values of the latest successful solve, indexed by `VarId`.
    pub fn values(&self) -> Option<&[f64]> {
        self.values.as_deref()
    }

    pub fn milp_status(&self) -> Option<TerminationStatus> {
        self.milp_status
    }

    /// Objective of the commitment solve, evaluated on its own values.
    pub fn milp_objective(&self) -> Option<f64> {
        self.milp_objective
    }

    /// Backend that produced the schedule.
    pub fn milp_backend(&self) -> Option<&str> {
        self.milp_backend.as_deref()
    }

    /// Backend that produced the prices.
    pub fn lp_backend(&self) -> Option<&str> {
        self.lp_backend.as_deref()
    }

    /// Failed commitment-stage attempts, in order.
    pub fn attempts(&self) -> &[BackendAttempt] {
        &self.attempts
    }

    /// Failed pricing-stage attempts, in order.
    pub fn lp_attempts(&self) -> &[BackendAttempt] {
        &self.lp_attempts
    }

    /// Largest distance of a solved binary from its rounded value.
    pub fn rounding_gap(&self) -> f64 {
        self.rounding_gap
    }

    /// Locational marginal price at `bus` in `period`, once prices exist.
    pub fn lmp(&self, bus: BusId, period: usize) -> Option<f64> {
        let row = self.model.balance_constraint(bus, period)?;
        self.duals.as_ref()?.get(row.index()).copied().flatten()
    }

    fn expect_stage(&self, expected: SolveStage, operation: &str) -> UcResult<()> {
        if self.stage != expected {
            return Err(UcError::InvalidStage(format!(
                "{operation} requires stage {expected}, run is {}",
                self.stage
            )));
        }
        Ok(())
    }

    /// Stage 1: try each candidate in order until one solves the MILP.
    pub fn solve_milp(
        &mut self,
        registry: &BackendRegistry,
        candidates: &[String],
        time_limit: Option<Duration>,
    ) -> UcResult<()> {
        self.expect_stage(SolveStage::Unsolved, "solve_milp")?;
        info!(
            "Solving commitment MILP: {} variables ({} binary), {} constraints",
            self.model.variables().len(),
            self.model.num_binaries(),
            self.model.constraints().len()
        );

        // Infeasible/unbounded verdicts versus backends that ran and broke
        let mut verdicts = 0usize;
        let mut breakdowns = 0usize;

        for id in candidates {
            let outcome = registry
                .resolve(id)
                .and_then(|backend| backend.attempt_solve(&self.model, time_limit))
                .and_then(|s| self.check_shape(s));
            let failure = match outcome {
                Ok(solution) => {
                    let objective = self.model.evaluate_objective(&solution.values);
                    info!(
                        "MILP solved by {} ({}), objective {:.4}",
                        id, solution.status, objective
                    );
                    if solution.status != TerminationStatus::Optimal {
                        warn!("{} stopped at {}; schedule may be suboptimal", id, solution.status);
                    }
                    self.milp_status = Some(solution.status);
                    self.milp_objective = Some(objective);
                    self.milp_backend = Some(id.clone());
                    self.values = Some(solution.values);
                    self.stage = SolveStage::MilpSolved;
                    return Ok(());
                }
                Err(err) => err,
            };
            warn!("Backend {} failed on commitment MILP: {}", id, failure);
            match failure {
                BackendError::Infeasible | BackendError::Unbounded => verdicts += 1,
                BackendError::Failed(_) | BackendError::TimedOut => breakdowns += 1,
                BackendError::Unavailable(_) | BackendError::Unsupported(_) => {}
            }
            self.attempts
                .push(BackendAttempt::new(id.as_str(), failure.to_string()));
        }

        self.stage = SolveStage::Failed;
        let attempts = self.attempts.clone();
        if verdicts > 0 && breakdowns == 0 {
            Err(UcError::SolveInfeasible { attempts })
        } else {
            Err(UcError::SolverUnavailable { attempts })
        }
    }

    fn check_shape(&self, solution: BackendSolution) -> Result<BackendSolution, BackendError> {
        let expected = self.model.variables().len();
        if solution.values.len() != expected {
            return Err(BackendError::Failed(format!(
                "returned {} values for {} variables",
                solution.values.len(),
                expected
            )));
        }
        Ok(solution)
    }

    /// Stage 2a: round and fix every commitment/startup/shutdown variable.
    ///
    /// Returns the largest rounding distance; a distance above `tolerance`
    /// is logged but does not stop the run.
    pub fn fix_binaries(&mut self, tolerance: f64) -> UcResult<f64> {
        self.expect_stage(SolveStage::MilpSolved, "fix_binaries")?;
        let values = self
            .values
            .as_deref()
            .ok_or_else(|| UcError::InvalidStage("no solved values to fix".into()))?;
        let gap = self.model.fix_binaries(values);
        if gap > tolerance {
            warn!(
                "Binary values were {:.3e} from integral (tolerance {:.1e}); rounded anyway",
                gap, tolerance
            );
        }
        debug!("Fixed {} binaries", self.model.num_binaries());
        self.rounding_gap = gap;
        self.stage = SolveStage::BinariesFixed;
        Ok(gap)
    }

    /// Backend ids for the pricing LP, at most [`MAX_LP_ATTEMPTS`].
    ///
    /// The commitment backend goes first when it reports duals; then the first
    /// dual-capable candidate not already planned, or failing that any
    /// registered dual-capable backend.
    ///
    /// A commitment backend without duals (e.g. `microlp`) is left out rather
    /// than re-run: its LP answer could never yield prices, so re-solving with
    /// it would only spend one of the two attempts. With the default
    /// candidates this leaves a single pricing attempt on `clarabel`.
    pub fn lp_plan(&self, registry: &BackendRegistry, candidates: &[String]) -> Vec<String> {
        let mut plan: Vec<String> = Vec::with_capacity(MAX_LP_ATTEMPTS);
        if let Some(milp) = self.milp_backend.as_deref() {
            match registry.get_backend(milp) {
                Some(backend) if backend.capabilities().duals => plan.push(milp.to_string()),
                _ => debug!("{} reports no duals; skipping it for pricing", milp),
            }
        }

        let dual_capable = registry.dual_capable();
        let alternate = candidates
            .iter()
            .map(String::as_str)
            .filter(|id| dual_capable.contains(id))
            .chain(dual_capable.iter().copied())
            .find(|id| Some(*id) != self.milp_backend.as_deref() && !plan.iter().any(|p| p == id));
        if let Some(id) = alternate {
            plan.push(id.to_string());
        }
        plan.truncate(MAX_LP_ATTEMPTS);
        plan
    }

    /// Stage 2b: re-solve the fixed model as an LP and read nodal prices.
    ///
    /// Failing every attempt leaves the run in `BinariesFixed` and returns
    /// [`UcError::DualUnavailable`]; the schedule is kept.
    pub fn resolve_lp(
        &mut self,
        registry: &BackendRegistry,
        candidates: &[String],
        time_limit: Option<Duration>,
    ) -> UcResult<()> {
        self.expect_stage(SolveStage::BinariesFixed, "resolve_lp")?;
        let plan = self.lp_plan(registry, candidates);
        if plan.is_empty() {
            self.lp_attempts.push(BackendAttempt::new(
                self.milp_backend.clone().unwrap_or_default(),
                "no dual-capable backend registered",
            ));
        }

        for id in &plan {
            let outcome = registry
                .resolve(id)
                .and_then(|backend| backend.attempt_solve(&self.model, time_limit))
                .and_then(|s| self.check_shape(s))
                .and_then(|s| match s.duals {
                    Some(_) => Ok(s),
                    None => Err(BackendError::Unsupported("no duals reported".into())),
                });
            match outcome {
                Ok(solution) => {
                    info!("Pricing LP solved by {} ({})", id, solution.status);
                    self.values = Some(solution.values);
                    self.duals = solution.duals;
                    self.lp_backend = Some(id.clone());
                    self.stage = SolveStage::LpResolved;
                    return Ok(());
                }
                Err(err) => {
                    warn!("Backend {} failed on pricing LP: {}", id, err);
                    self.lp_attempts
                        .push(BackendAttempt::new(id.as_str(), err.to_string()));
                }
            }
        }

        warn!("Prices unavailable; keeping the commitment schedule");
        Err(UcError::DualUnavailable {
            attempts: self.lp_attempts.clone(),
        })
    }
}

/// Results of a full run, with the non-fatal pricing warning if any.
#[derive(Debug)]
pub struct UcOutcome {
    pub results: UcResults,
    /// Always [`UcError::DualUnavailable`] when present
    pub warning: Option<UcError>,
}

/// Build, solve, fix, re-solve and project with the compiled-in backends.
pub fn solve_unit_commitment(system: &SystemData, config: &UcConfig) -> UcResult<UcOutcome> {
    solve_with_registry(system, config, &BackendRegistry::with_defaults())
}

/// As [`solve_unit_commitment`], resolving candidates against `registry`.
pub fn solve_with_registry(
    system: &SystemData,
    config: &UcConfig,
    registry: &BackendRegistry,
) -> UcResult<UcOutcome> {
    config.validate()?;
    let model = build_model(system, config.segments)?;
    let mut run = UcRun::new(model);
    let time_limit = config.time_limit();

    run.solve_milp(registry, &config.candidates, time_limit)?;
    run.fix_binaries(config.integrality_tolerance)?;
    let warning = match run.resolve_lp(registry, &config.candidates, time_limit) {
        Ok(()) => None,
        Err(err) if !err.is_fatal() => Some(err),
        Err(err) => return Err(err),
    };

    let results = UcResults::from_run(system, &run)?;
    info!("{}", results.summary());
    Ok(UcOutcome { results, warning })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uc::backend::{BackendCapabilities, UcBackend};
    use crate::uc::model::{ConstraintTag, LinearExpr, Sense, VarKey, VarKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Backend returning a canned answer and counting calls.
    struct MockBackend {
        id: &'static str,
        duals: bool,
        result: Result<Vec<f64>, BackendError>,
        calls: AtomicUsize,
    }

    impl MockBackend {
        fn new(id: &'static str, duals: bool, result: Result<Vec<f64>, BackendError>) -> Arc<Self> {
            Arc::new(Self {
                id,
                duals,
                result,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl UcBackend for MockBackend {
        fn id(&self) -> &str {
            self.id
        }
        fn capabilities(&self) -> BackendCapabilities {
            BackendCapabilities {
                mixed_integer: true,
                duals: self.duals,
            }
        }
        fn attempt_solve(
            &self,
            model: &UcModel,
            _time_limit: Option<Duration>,
        ) -> Result<BackendSolution, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let values = self.result.clone()?;
            let duals = self
                .duals
                .then(|| vec![Some(7.5); model.constraints().len()]);
            Ok(BackendSolution {
                status: TerminationStatus::Optimal,
                values,
                duals,
            })
        }
    }

    /// u binary, p in [0, 10], p == 4 at bus 1 period 1.
    fn tiny_model() -> UcModel {
        let mut model = UcModel::new();
        let u = model.add_variable(VarKey::Commit { gen: 0, period: 1 }, VarKind::Binary, 0.0, 1.0);
        let p = model.add_variable(
            VarKey::Dispatch { gen: 0, period: 1 },
            VarKind::Continuous,
            0.0,
            10.0,
        );
        model.add_objective_term(p, 3.0);
        model.add_constraint(
            ConstraintTag::Balance {
                bus: BusId::new(1),
                period: 1,
            },
            LinearExpr::new().term(p, 1.0),
            Sense::Eq,
            4.0,
        );
        model.add_constraint(
            ConstraintTag::DispatchMax { gen: 0, period: 1 },
            LinearExpr::new().term(p, 1.0).term(u, -10.0),
            Sense::Le,
            0.0,
        );
        model
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_stages_in_order() {
        let solver = MockBackend::new("mock", true, Ok(vec![0.9999, 4.0]));
        let mut registry = BackendRegistry::new();
        registry.register_backend(solver.clone());
        let candidates = ids(&["mock"]);

        let mut run = UcRun::new(tiny_model());
        assert_eq!(run.stage(), SolveStage::Unsolved);
        assert!(matches!(
            run.fix_binaries(1e-6),
            Err(UcError::InvalidStage(_))
        ));

        run.solve_milp(&registry, &candidates, None).unwrap();
        assert_eq!(run.stage(), SolveStage::MilpSolved);
        assert_eq!(run.milp_backend(), Some("mock"));

        let gap = run.fix_binaries(1e-6).unwrap();
        assert!((gap - 1e-4).abs() < 1e-9);
        assert_eq!(run.stage(), SolveStage::BinariesFixed);
        assert_eq!(run.model().variables()[0].fixed, Some(1.0));

        run.resolve_lp(&registry, &candidates, None).unwrap();
        assert_eq!(run.stage(), SolveStage::LpResolved);
        assert_eq!(run.lp_backend(), Some("mock"));
        assert_eq!(run.lmp(BusId::new(1), 1), Some(7.5));
        assert_eq!(run.lmp(BusId::new(2), 1), None);
        assert_eq!(solver.calls(), 2);
    }

    #[test]
    fn test_falls_back_to_next_candidate() {
        let broken = MockBackend::new("broken", true, Err(BackendError::Failed("crash".into())));
        let good = MockBackend::new("good", true, Ok(vec![1.0, 4.0]));
        let mut registry = BackendRegistry::new();
        registry.register_backend(broken.clone());
        registry.register_backend(good.clone());

        let mut run = UcRun::new(tiny_model());
        run.solve_milp(&registry, &ids(&["missing", "broken", "good"]), None)
            .unwrap();

        assert_eq!(run.milp_backend(), Some("good"));
        assert_eq!(run.attempts().len(), 2);
        assert_eq!(run.attempts()[0].backend, "missing");
        assert!(run.attempts()[0].reason.contains("not registered"));
        assert_eq!(run.attempts()[1].backend, "broken");
        assert_eq!(broken.calls(), 1);
        assert_eq!(good.calls(), 1);
    }

    #[test]
    fn test_all_candidates_fail() {
        let broken = MockBackend::new("broken", false, Err(BackendError::TimedOut));
        let mut registry = BackendRegistry::new();
        registry.register_backend(broken);

        let mut run = UcRun::new(tiny_model());
        let err = run
            .solve_milp(&registry, &ids(&["broken", "missing"]), None)
            .unwrap_err();
        assert!(matches!(err, UcError::SolverUnavailable { ref attempts } if attempts.len() == 2));
        assert_eq!(run.stage(), SolveStage::Failed);
        assert!(run.values().is_none());
    }

    #[test]
    fn test_infeasible_verdicts_surface_as_infeasible() {
        let a = MockBackend::new("a", false, Err(BackendError::Infeasible));
        let b = MockBackend::new("b", false, Err(BackendError::Unbounded));
        let mut registry = BackendRegistry::new();
        registry.register_backend(a.clone());
        registry.register_backend(b.clone());

        let mut run = UcRun::new(tiny_model());
        let err = run
            .solve_milp(&registry, &ids(&["a", "missing", "b"]), None)
            .unwrap_err();
        assert!(matches!(err, UcError::SolveInfeasible { ref attempts } if attempts.len() == 3));
        assert_eq!(a.calls() + b.calls(), 2);
    }

    #[test]
    fn test_wrong_value_count_is_a_failed_attempt() {
        let short = MockBackend::new("short", false, Ok(vec![1.0]));
        let mut registry = BackendRegistry::new();
        registry.register_backend(short);

        let mut run = UcRun::new(tiny_model());
        let err = run.solve_milp(&registry, &ids(&["short"]), None).unwrap_err();
        assert!(err.attempts()[0].reason.contains("1 values for 2 variables"));
    }

    #[test]
    fn test_pricing_skips_primal_only_backend() {
        let primal = MockBackend::new("primal", false, Ok(vec![1.0, 4.0]));
        let pricer = MockBackend::new("pricer", true, Ok(vec![1.0, 4.0]));
        let mut registry = BackendRegistry::new();
        registry.register_backend(primal.clone());
        registry.register_backend(pricer.clone());
        let candidates = ids(&["primal", "pricer"]);

        let mut run = UcRun::new(tiny_model());
        run.solve_milp(&registry, &candidates, None).unwrap();
        run.fix_binaries(1e-6).unwrap();
        assert_eq!(run.lp_plan(&registry, &candidates), vec!["pricer"]);

        run.resolve_lp(&registry, &candidates, None).unwrap();
        assert_eq!(run.milp_backend(), Some("primal"));
        assert_eq!(run.lp_backend(), Some("pricer"));
        assert_eq!(primal.calls(), 1);
        assert_eq!(pricer.calls(), 1);
    }

    #[test]
    fn test_default_backends_price_on_clarabel_only() {
        let registry = BackendRegistry::with_defaults();
        let candidates = ids(&["microlp", "clarabel"]);

        let mut run = UcRun::new(tiny_model());
        run.solve_milp(&registry, &candidates, None).unwrap();
        run.fix_binaries(1e-6).unwrap();
        assert_eq!(run.lp_plan(&registry, &candidates), vec!["clarabel"]);

        run.resolve_lp(&registry, &candidates, None).unwrap();
        assert_eq!(run.lp_backend(), Some("clarabel"));
        let lmp = run.lmp(BusId::new(1), 1).unwrap();
        assert!((lmp - 3.0).abs() < 1e-4, "lmp = {lmp}");
    }

    #[test]
    fn test_pricing_failure_keeps_schedule() {
        let milp = MockBackend::new("milp", false, Ok(vec![1.0, 4.0]));
        let bad_lp = MockBackend::new("bad-lp", true, Err(BackendError::Failed("numerical".into())));
        let mut registry = BackendRegistry::new();
        registry.register_backend(milp);
        registry.register_backend(bad_lp.clone());
        let candidates = ids(&["milp", "bad-lp"]);

        let mut run = UcRun::new(tiny_model());
        run.solve_milp(&registry, &candidates, None).unwrap();
        run.fix_binaries(1e-6).unwrap();
        let err = run.resolve_lp(&registry, &candidates, None).unwrap_err();

        assert!(!err.is_fatal());
        assert!(matches!(err, UcError::DualUnavailable { .. }));
        assert_eq!(run.stage(), SolveStage::BinariesFixed);
        assert!(run.stage().has_schedule());
        assert_eq!(run.values(), Some(&[1.0, 4.0][..]));
        assert_eq!(run.lmp(BusId::new(1), 1), None);
        assert_eq!(bad_lp.calls(), 1);
    }

    #[test]
    fn test_pricing_uses_at_most_two_attempts() {
        let first = MockBackend::new("first", true, Ok(vec![1.0, 4.0]));
        let mut registry = BackendRegistry::new();
        registry.register_backend(first.clone());
        for id in ["x", "y", "z"] {
            registry.register_backend(MockBackend::new(id, true, Err(BackendError::TimedOut)));
        }
        let candidates = ids(&["first", "x", "y", "z"]);

        let mut run = UcRun::new(tiny_model());
        run.solve_milp(&registry, &candidates, None).unwrap();
        run.fix_binaries(1e-6).unwrap();
        assert_eq!(run.lp_plan(&registry, &candidates), vec!["first", "x"]);
    }

    #[test]
    fn test_pricing_falls_back_to_registry() {
        let milp = MockBackend::new("milp", false, Ok(vec![1.0, 4.0]));
        let extra = MockBackend::new("extra", true, Ok(vec![1.0, 4.0]));
        let mut registry = BackendRegistry::new();
        registry.register_backend(milp);
        registry.register_backend(extra);
        let candidates = ids(&["milp"]);

        let mut run = UcRun::new(tiny_model());
        run.solve_milp(&registry, &candidates, None).unwrap();
        run.fix_binaries(1e-6).unwrap();
        assert_eq!(run.lp_plan(&registry, &candidates), vec!["extra"]);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(SolveStage::LpResolved.to_string(), "lp-resolved");
        assert!(!SolveStage::Failed.has_schedule());
        assert!(!SolveStage::Unsolved.has_schedule());
    }
}
