//! # uc-core: Unit Commitment Data Model
//!
//! Provides the validated, immutable system snapshot consumed by the
//! unit-commitment engine in `uc-algo`.
//!
//! ## Data Flow
//!
//! ```text
//! SystemSnapshot (serde / builder)
//!        │  build() → validation
//!        ▼
//!   SystemData ──► segment_cost_curve() ──► model builder (uc-algo)
//! ```
//!
//! ## Core Data Structures
//!
//! - [`Generator`] - thermal/hydro unit with limits, ramps, run-time rules and cost curve
//! - [`Line`] - DC transmission line between two buses
//! - [`SystemSnapshot`] - serializable input, also usable as a builder
//! - [`SystemData`] - validated snapshot with sorted buses and dense forecast series
//! - [`CostSegment`] - one block of a piecewise-linear cost curve
//!
//! ## Quick Start
//!
//! ```rust
//! use uc_core::*;
//!
//! let system = SystemSnapshot::new(3)
//!     .bus(BusId::new(1))
//!     .generator(
//!         Generator::new("G1", BusId::new(1), 0.0, 200.0).with_cost(QuadraticCost::linear(20.0)),
//!     )
//!     .demand(BusId::new(1), vec![100.0, 120.0, 90.0])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(system.horizon(), 3);
//! assert_eq!(system.reference_bus(), Some(BusId::new(1)));
//! ```
//!
//! Periods are 1-based throughout: period `t` runs from `1` to `horizon`.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod error;
pub mod segment;
pub mod system;

pub use error::{BackendAttempt, UcError, UcResult};
pub use segment::{partition_range, segment_cost_curve, CostSegment, QuadraticCost};
pub use system::{SystemData, SystemSnapshot};

/// Bus identifier. Ordering is numeric; the smallest id is the reference bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusId(usize);

impl BusId {
    #[inline]
    pub fn new(value: usize) -> Self {
        BusId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn one() -> usize {
    1
}

/// A dispatchable generating unit.
///
/// Optional fields take the defaults used throughout the engine: ramp limits
/// fall back to `pmax_mw` (unconstrained), run-time minimums to one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub name: String,
    pub bus: BusId,
    pub pmin_mw: f64,
    pub pmax_mw: f64,
    /// Maximum increase between consecutive periods (MW/period)
    #[serde(default)]
    pub ramp_up_mw: Option<f64>,
    /// Maximum decrease between consecutive periods (MW/period)
    #[serde(default)]
    pub ramp_down_mw: Option<f64>,
    #[serde(default)]
    pub startup_cost: f64,
    #[serde(default)]
    pub shutdown_cost: f64,
    #[serde(default = "one")]
    pub min_up_periods: usize,
    #[serde(default = "one")]
    pub min_down_periods: usize,
    #[serde(default)]
    pub cost: QuadraticCost,
    /// Commitment status in the period before the horizon starts
    #[serde(default)]
    pub initially_on: bool,
}

impl Generator {
    pub fn new(name: impl Into<String>, bus: BusId, pmin_mw: f64, pmax_mw: f64) -> Self {
        Self {
            name: name.into(),
            bus,
            pmin_mw,
            pmax_mw,
            ramp_up_mw: None,
            ramp_down_mw: None,
            startup_cost: 0.0,
            shutdown_cost: 0.0,
            min_up_periods: 1,
            min_down_periods: 1,
            cost: QuadraticCost::default(),
            initially_on: false,
        }
    }

    pub fn with_ramps(mut self, ramp_up_mw: f64, ramp_down_mw: f64) -> Self {
        self.ramp_up_mw = Some(ramp_up_mw);
        self.ramp_down_mw = Some(ramp_down_mw);
        self
    }

    pub fn with_transition_costs(mut self, startup_cost: f64, shutdown_cost: f64) -> Self {
        self.startup_cost = startup_cost;
        self.shutdown_cost = shutdown_cost;
        self
    }

    pub fn with_min_run_times(mut self, min_up_periods: usize, min_down_periods: usize) -> Self {
        self.min_up_periods = min_up_periods;
        self.min_down_periods = min_down_periods;
        self
    }

    pub fn with_cost(mut self, cost: QuadraticCost) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_initially_on(mut self, on: bool) -> Self {
        self.initially_on = on;
        self
    }

    #[inline]
    pub fn ramp_up(&self) -> f64 {
        self.ramp_up_mw.unwrap_or(self.pmax_mw)
    }

    #[inline]
    pub fn ramp_down(&self) -> f64 {
        self.ramp_down_mw.unwrap_or(self.pmax_mw)
    }

    /// Piecewise-linear cost blocks over `[pmin, pmax]`.
    pub fn cost_segments(&self, segments: usize) -> UcResult<Vec<CostSegment>> {
        segment_cost_curve(self.pmin_mw, self.pmax_mw, segments, &self.cost)
    }
}

/// A transmission line under the DC approximation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub name: String,
    pub from_bus: BusId,
    pub to_bus: BusId,
    /// Series reactance; `None` or zero pins the flow to zero
    #[serde(default)]
    pub reactance: Option<f64>,
    /// Symmetric thermal limit (MW)
    pub limit_mw: f64,
}

impl Line {
    pub fn new(
        name: impl Into<String>,
        from_bus: BusId,
        to_bus: BusId,
        reactance: f64,
        limit_mw: f64,
    ) -> Self {
        Self {
            name: name.into(),
            from_bus,
            to_bus,
            reactance: Some(reactance),
            limit_mw,
        }
    }

    /// DC susceptance `1/X`, or `None` when the line carries no flow.
    pub fn susceptance(&self) -> Option<f64> {
        match self.reactance {
            Some(x) if x > 0.0 => Some(1.0 / x),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_ordering_is_numeric() {
        let mut buses = vec![BusId::new(10), BusId::new(2), BusId::new(7)];
        buses.sort();
        assert_eq!(buses, vec![BusId::new(2), BusId::new(7), BusId::new(10)]);
    }

    #[test]
    fn test_generator_defaults() {
        let gen = Generator::new("G", BusId::new(1), 20.0, 150.0);
        assert_eq!(gen.ramp_up(), 150.0);
        assert_eq!(gen.ramp_down(), 150.0);
        assert_eq!(gen.min_up_periods, 1);
        assert!(!gen.initially_on);
    }

    #[test]
    fn test_generator_json_defaults() {
        let gen: Generator =
            serde_json::from_str(r#"{"name":"G","bus":3,"pmin_mw":0,"pmax_mw":50}"#).unwrap();
        assert_eq!(gen.bus, BusId::new(3));
        assert_eq!(gen.min_down_periods, 1);
        assert_eq!(gen.ramp_down(), 50.0);
        assert_eq!(gen.cost, QuadraticCost::default());
    }

    #[test]
    fn test_line_susceptance() {
        let line = Line::new("L", BusId::new(1), BusId::new(2), 0.1, 100.0);
        assert!((line.susceptance().unwrap() - 10.0).abs() < 1e-12);

        let open = Line {
            reactance: Some(0.0),
            ..line.clone()
        };
        assert!(open.susceptance().is_none());

        let undefined = Line {
            reactance: None,
            ..line
        };
        assert!(undefined.susceptance().is_none());
    }
}
