//! Explicit optimization model
//!
//! The commitment model is plain data: one flat variable table, a sparse
//! linear objective, and a list of typed constraint records. Backends read it
//! without any knowledge of how it was built, and the orchestrator mutates it
//! only to fix binaries between the two solve stages.

use std::collections::HashMap;
use std::fmt;

use uc_core::BusId;

/// Index into [`UcModel::variables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Index into [`UcModel::constraints`]; the handle used to read duals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(usize);

impl ConstraintId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Decision variable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Binary,
    Continuous,
}

/// What a variable means. Generator and line indices refer to positions in
/// `SystemData::generators()` / `lines()`; periods are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKey {
    Commit { gen: usize, period: usize },
    Startup { gen: usize, period: usize },
    Shutdown { gen: usize, period: usize },
    Dispatch { gen: usize, period: usize },
    Segment { gen: usize, segment: usize, period: usize },
    SpinningReserve { gen: usize, period: usize },
    NonSpinningReserve { gen: usize, period: usize },
    Angle { bus: BusId, period: usize },
    Flow { line: usize, period: usize },
}

impl VarKey {
    pub fn period(&self) -> usize {
        match *self {
            VarKey::Commit { period, .. }
            | VarKey::Startup { period, .. }
            | VarKey::Shutdown { period, .. }
            | VarKey::Dispatch { period, .. }
            | VarKey::Segment { period, .. }
            | VarKey::SpinningReserve { period, .. }
            | VarKey::NonSpinningReserve { period, .. }
            | VarKey::Angle { period, .. }
            | VarKey::Flow { period, .. } => period,
        }
    }
}

/// One row of the variable table.
#[derive(Debug, Clone, PartialEq)]
pub struct VarEntry {
    pub key: VarKey,
    pub kind: VarKind,
    pub lower: f64,
    pub upper: f64,
    /// Set once the orchestrator has fixed the variable for stage 2
    pub fixed: Option<f64>,
}

impl VarEntry {
    /// Binary that still needs branching.
    #[inline]
    pub fn is_free_binary(&self) -> bool {
        self.kind == VarKind::Binary && self.fixed.is_none()
    }

    /// Effective bounds, collapsing to a point once fixed.
    #[inline]
    pub fn bounds(&self) -> (f64, f64) {
        match self.fixed {
            Some(v) => (v, v),
            None => (self.lower, self.upper),
        }
    }
}

/// Sparse linear expression `Σ coeff·var`.
///
/// Terms are combined explicitly; [`LinearExpr::compact`] merges repeated
/// variables and drops zero coefficients.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::with_capacity(capacity),
        }
    }

    /// Builder-style single term append.
    pub fn term(mut self, var: VarId, coeff: f64) -> Self {
        self.add_term(var, coeff);
        self
    }

    pub fn add_term(&mut self, var: VarId, coeff: f64) {
        self.terms.push((var, coeff));
    }

    /// `self += scale · other`
    pub fn add_scaled(&mut self, other: &LinearExpr, scale: f64) {
        self.terms
            .extend(other.terms.iter().map(|&(v, c)| (v, c * scale)));
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Merge duplicate variables (keeping first-seen order) and drop zeros.
    pub fn compact(mut self) -> Self {
        let mut position: HashMap<VarId, usize> = HashMap::with_capacity(self.terms.len());
        let mut merged: Vec<(VarId, f64)> = Vec::with_capacity(self.terms.len());
        for (var, coeff) in self.terms.drain(..) {
            match position.get(&var) {
                Some(&idx) => merged[idx].1 += coeff,
                None => {
                    position.insert(var, merged.len());
                    merged.push((var, coeff));
                }
            }
        }
        merged.retain(|&(_, c)| c != 0.0);
        Self { terms: merged }
    }

    /// Evaluate against a dense value vector indexed by [`VarId`].
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(v, c)| c * values.get(v.0).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Relation between a constraint's expression and its constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Eq,
    Le,
    Ge,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sense::Eq => "==",
            Sense::Le => "<=",
            Sense::Ge => ">=",
        })
    }
}

/// Which family a constraint row belongs to, with its indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintTag {
    SegmentSum { gen: usize, period: usize },
    DispatchMin { gen: usize, period: usize },
    DispatchMax { gen: usize, period: usize },
    SegmentCommit { gen: usize, period: usize },
    RampUp { gen: usize, period: usize },
    RampDown { gen: usize, period: usize },
    StartupLink { gen: usize, period: usize },
    ShutdownLink { gen: usize, period: usize },
    MinUp { gen: usize, start: usize },
    MinDown { gen: usize, start: usize },
    Balance { bus: BusId, period: usize },
    DcFlow { line: usize, period: usize },
    ReferenceAngle { period: usize },
    LineLimitForward { line: usize, period: usize },
    LineLimitReverse { line: usize, period: usize },
    SpinningCapacity { period: usize },
    SpinningRequirement { period: usize },
    NonSpinningRequirement { period: usize },
    SpinningHeadroom { gen: usize, period: usize },
    NonSpinningHeadroom { gen: usize, period: usize },
}

/// `expr (== | <= | >=) rhs` with every variable term on the left.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintRecord {
    pub tag: ConstraintTag,
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl ConstraintRecord {
    /// Whether `values` satisfies the row within `tol`.
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            Sense::Eq => (lhs - self.rhs).abs() <= tol,
            Sense::Le => lhs <= self.rhs + tol,
            Sense::Ge => lhs >= self.rhs - tol,
        }
    }
}

/// The complete optimization model.
#[derive(Debug, Clone, Default)]
pub struct UcModel {
    variables: Vec<VarEntry>,
    lookup: HashMap<VarKey, VarId>,
    objective: LinearExpr,
    constraints: Vec<ConstraintRecord>,
    balance: HashMap<(BusId, usize), ConstraintId>,
}

impl UcModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variable; returns the existing id when `key` is already present.
    pub fn add_variable(&mut self, key: VarKey, kind: VarKind, lower: f64, upper: f64) -> VarId {
        if let Some(&id) = self.lookup.get(&key) {
            return id;
        }
        let id = VarId(self.variables.len());
        self.variables.push(VarEntry {
            key,
            kind,
            lower,
            upper,
            fixed: None,
        });
        self.lookup.insert(key, id);
        id
    }

    pub fn add_constraint(
        &mut self,
        tag: ConstraintTag,
        expr: LinearExpr,
        sense: Sense,
        rhs: f64,
    ) -> ConstraintId {
        let id = ConstraintId(self.constraints.len());
        if let ConstraintTag::Balance { bus, period } = tag {
            self.balance.insert((bus, period), id);
        }
        self.constraints.push(ConstraintRecord {
            tag,
            expr: expr.compact(),
            sense,
            rhs,
        });
        id
    }

    pub fn add_objective_term(&mut self, var: VarId, coeff: f64) {
        self.objective.add_term(var, coeff);
    }

    pub fn var(&self, key: VarKey) -> Option<VarId> {
        self.lookup.get(&key).copied()
    }

    pub fn variables(&self) -> &[VarEntry] {
        &self.variables
    }

    /// # Panics
    ///
    /// If `id` was not issued by this model.
    pub fn entry(&self, id: VarId) -> &VarEntry {
        &self.variables[id.0]
    }

    pub fn constraints(&self) -> &[ConstraintRecord] {
        &self.constraints
    }

    /// # Panics
    ///
    /// If `id` was not issued by this model.
    pub fn constraint(&self, id: ConstraintId) -> &ConstraintRecord {
        &self.constraints[id.0]
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Dense objective coefficients indexed by [`VarId`].
    pub fn objective_coefficients(&self) -> Vec<f64> {
        let mut coeffs = vec![0.0; self.variables.len()];
        for &(v, c) in self.objective.terms() {
            coeffs[v.0] += c;
        }
        coeffs
    }

    /// Handle of the nodal-balance row for `(bus, period)`.
    pub fn balance_constraint(&self, bus: BusId, period: usize) -> Option<ConstraintId> {
        self.balance.get(&(bus, period)).copied()
    }

    pub fn num_binaries(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.kind == VarKind::Binary)
            .count()
    }

    /// True while any binary is still unfixed (the model is a MILP).
    pub fn has_free_binaries(&self) -> bool {
        self.variables.iter().any(VarEntry::is_free_binary)
    }

    /// Round every binary to the nearest integer in `values` and pin it there.
    ///
    /// Returns the largest distance between a solved value and its rounded
    /// counterpart, which callers compare against an integrality tolerance.
    pub fn fix_binaries(&mut self, values: &[f64]) -> f64 {
        let mut worst = 0.0f64;
        for (idx, entry) in self.variables.iter_mut().enumerate() {
            if entry.kind != VarKind::Binary {
                continue;
            }
            let raw = values.get(idx).copied().unwrap_or(0.0);
            let rounded = raw.round().clamp(entry.lower, entry.upper);
            worst = worst.max((raw - rounded).abs());
            entry.fixed = Some(rounded);
        }
        worst
    }

    pub fn evaluate_objective(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }

    /// Constraints violated by `values` beyond `tol`.
    pub fn violations(&self, values: &[f64], tol: f64) -> Vec<ConstraintId> {
        self.constraints
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_satisfied(values, tol))
            .map(|(i, _)| ConstraintId(i))
            .collect()
    }
}
