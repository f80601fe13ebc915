//! Schedule and price records projected from a solved run.

use serde::{Deserialize, Serialize};
use uc_core::{BackendAttempt, BusId, SystemData, UcError, UcResult};

use super::model::{UcModel, VarKey};
use super::orchestrator::{SolveStage, UcRun};

/// Operating decision of one generator in one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    /// Generator name
    pub gen: String,
    /// Period, 1-based
    pub time: usize,
    /// Commitment (0/1)
    pub u: u8,
    /// Dispatched power (MW)
    pub p: f64,
    /// Startup flag (0/1)
    pub v: u8,
    /// Shutdown flag (0/1)
    pub w: u8,
}

/// Nodal price for one bus and period; `None` when duals are unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub bus: BusId,
    pub time: usize,
    pub lmp: Option<f64>,
}

/// Objective split by cost component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub energy: f64,
    pub startup: f64,
    pub shutdown: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.energy + self.startup + self.shutdown
    }
}

/// Everything a caller gets back from a run that produced a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UcResults {
    pub stage: SolveStage,
    pub objective: f64,
    pub costs: CostBreakdown,
    /// Backend that solved the commitment MILP
    pub milp_backend: Option<String>,
    /// Backend that solved the pricing LP
    pub lp_backend: Option<String>,
    /// Failed attempts in either stage, in order
    pub attempts: Vec<BackendAttempt>,
    pub schedules: Vec<ScheduleRecord>,
    pub prices: Vec<PriceRecord>,
}

impl UcResults {
    /// Project `run` onto schedule and price records.
    ///
    /// Valid once the run holds a schedule (`MilpSolved`, `BinariesFixed` or
    /// `LpResolved`). Binary values are reported rounded.
    pub fn from_run(system: &SystemData, run: &UcRun) -> UcResult<Self> {
        let stage = run.stage();
        let values = match run.values() {
            Some(values) if stage.has_schedule() => values,
            _ => {
                return Err(UcError::InvalidStage(format!(
                    "no schedule to export in stage {stage}"
                )))
            }
        };
        let model = run.model();
        // Fixed binaries report their pinned value, not the solver's approximation
        let values: Vec<f64> = model
            .variables()
            .iter()
            .zip(values)
            .map(|(entry, &v)| entry.fixed.unwrap_or(v))
            .collect();
        let values = values.as_slice();
        let read = |key: VarKey| model.var(key).map(|id| values[id.index()]).unwrap_or(0.0);
        let flag = |key: VarKey| if read(key) >= 0.5 { 1u8 } else { 0u8 };

        let mut schedules = Vec::with_capacity(system.generators().len() * system.horizon());
        for (gen, generator) in system.generators().iter().enumerate() {
            for period in system.periods() {
                schedules.push(ScheduleRecord {
                    gen: generator.name.clone(),
                    time: period,
                    u: flag(VarKey::Commit { gen, period }),
                    p: read(VarKey::Dispatch { gen, period }),
                    v: flag(VarKey::Startup { gen, period }),
                    w: flag(VarKey::Shutdown { gen, period }),
                });
            }
        }

        let mut prices = Vec::with_capacity(system.buses().len() * system.horizon());
        for &bus in system.buses() {
            for period in system.periods() {
                prices.push(PriceRecord {
                    bus,
                    time: period,
                    lmp: run.lmp(bus, period),
                });
            }
        }

        let costs = cost_breakdown(model, values);
        let mut attempts = run.attempts().to_vec();
        attempts.extend_from_slice(run.lp_attempts());

        Ok(Self {
            stage,
            objective: model.evaluate_objective(values),
            costs,
            milp_backend: run.milp_backend().map(str::to_string),
            lp_backend: run.lp_backend().map(str::to_string),
            attempts,
            schedules,
            prices,
        })
    }

    pub fn schedule(&self, gen: &str, time: usize) -> Option<&ScheduleRecord> {
        self.schedules
            .iter()
            .find(|r| r.gen == gen && r.time == time)
    }

    pub fn lmp(&self, bus: BusId, time: usize) -> Option<f64> {
        self.prices
            .iter()
            .find(|r| r.bus == bus && r.time == time)
            .and_then(|r| r.lmp)
    }

    /// True when every price record carries a value.
    pub fn has_prices(&self) -> bool {
        !self.prices.is_empty() && self.prices.iter().all(|r| r.lmp.is_some())
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        let committed = self.schedules.iter().filter(|r| r.u == 1).count();
        let startups: usize = self.schedules.iter().map(|r| r.v as usize).sum();
        let prices = if self.has_prices() {
            let (lo, hi) = self
                .prices
                .iter()
                .filter_map(|r| r.lmp)
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                    (lo.min(p), hi.max(p))
                });
            format!("LMP {lo:.2}..{hi:.2}")
        } else {
            "LMP unavailable".to_string()
        };
        format!(
            "{}: objective {:.2} (energy {:.2}, startup {:.2}, shutdown {:.2}), \
             {} unit-periods committed, {} startups, {}, milp={}, lp={}",
            self.stage,
            self.objective,
            self.costs.energy,
            self.costs.startup,
            self.costs.shutdown,
            committed,
            startups,
            prices,
            self.milp_backend.as_deref().unwrap_or("-"),
            self.lp_backend.as_deref().unwrap_or("-"),
        )
    }
}

fn cost_breakdown(model: &UcModel, values: &[f64]) -> CostBreakdown {
    let coeffs = model.objective_coefficients();
    let mut costs = CostBreakdown::default();
    for (idx, entry) in model.variables().iter().enumerate() {
        let cost = coeffs[idx] * values[idx];
        match entry.key {
            VarKey::Startup { .. } => costs.startup += cost,
            VarKey::Shutdown { .. } => costs.shutdown += cost,
            _ => costs.energy += cost,
        }
    }
    costs
}
