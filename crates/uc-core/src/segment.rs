//! Piecewise-linear cost segmentation
//!
//! The commitment model must stay linear, so each generator's quadratic cost
//! curve `C(P) = a·P² + b·P` is replaced by a staircase of marginal costs:
//!
//! ```text
//!   $/MWh
//!     │                         ┌────
//!     │                 ┌───────┘
//!     │         ┌───────┘              marginal cost of segment k =
//!     │ ┌───────┘                      C'(midpoint_k) = 2·a·mid_k + b
//!     │─┘
//!     └─┬───────┬───────┬───────┬───── MW
//!     pmin                     pmax
//! ```
//!
//! With `a ≥ 0` the staircase is non-decreasing, so a cost-minimizing solver
//! fills the segments in order without any extra ordering constraints.

use serde::{Deserialize, Serialize};

use crate::{UcError, UcResult};

/// Quadratic generation cost `C(P) = a·P² + b·P`.
///
/// Either coefficient may be missing: a flat-priced unit only carries `b`,
/// and a unit with neither is treated as free energy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuadraticCost {
    #[serde(default)]
    pub a: Option<f64>,
    #[serde(default)]
    pub b: Option<f64>,
}

impl QuadraticCost {
    pub fn new(a: Option<f64>, b: Option<f64>) -> Self {
        Self { a, b }
    }

    /// Flat marginal cost, no quadratic term.
    pub fn linear(b: f64) -> Self {
        Self { a: None, b: Some(b) }
    }

    pub fn quadratic(a: f64, b: f64) -> Self {
        Self {
            a: Some(a),
            b: Some(b),
        }
    }

    /// Derivative of the cost curve at `p_mw`.
    ///
    /// A missing `b` next to a present `a` counts as zero.
    pub fn marginal_cost_at(&self, p_mw: f64) -> f64 {
        match (self.a, self.b) {
            (Some(a), b) => 2.0 * a * p_mw + b.unwrap_or(0.0),
            (None, Some(b)) => b,
            (None, None) => 0.0,
        }
    }
}

/// One block of a piecewise-linear cost curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSegment {
    pub lower_mw: f64,
    pub upper_mw: f64,
    /// Constant marginal cost ($/MWh) over the block
    pub marginal_cost: f64,
}

impl CostSegment {
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper_mw - self.lower_mw
    }

    #[inline]
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.lower_mw + self.upper_mw)
    }
}

/// Split `[pmin, pmax]` into `segments` equal sub-ranges.
///
/// When `pmax <= pmin` the range is degenerate and a single `(pmin, pmax)`
/// pair is returned regardless of the requested count.
pub fn partition_range(pmin: f64, pmax: f64, segments: usize) -> UcResult<Vec<(f64, f64)>> {
    if segments == 0 {
        return Err(UcError::validation("segment count must be at least 1"));
    }
    if !pmin.is_finite() || !pmax.is_finite() {
        return Err(UcError::validation(format!(
            "cannot segment non-finite range [{pmin}, {pmax}]"
        )));
    }
    if pmax <= pmin {
        return Ok(vec![(pmin, pmax)]);
    }

    let step = (pmax - pmin) / segments as f64;
    let bounds: Vec<f64> = (0..=segments)
        .map(|k| {
            if k == segments {
                pmax
            } else {
                pmin + step * k as f64
            }
        })
        .collect();

    Ok(bounds.windows(2).map(|w| (w[0], w[1])).collect())
}

/// Build the piecewise-linear approximation of `cost` over `[pmin, pmax]`.
///
/// Each segment is priced at the cost-curve derivative evaluated at its
/// midpoint. Pure function: no state, no logging.
pub fn segment_cost_curve(
    pmin: f64,
    pmax: f64,
    segments: usize,
    cost: &QuadraticCost,
) -> UcResult<Vec<CostSegment>> {
    Ok(partition_range(pmin, pmax, segments)?
        .into_iter()
        .map(|(lower_mw, upper_mw)| CostSegment {
            lower_mw,
            upper_mw,
            marginal_cost: cost.marginal_cost_at(0.5 * (lower_mw + upper_mw)),
        })
        .collect())
}
