//! Unit-commitment model builder
//!
//! Enumerates every variable and constraint row of the commitment MILP from a
//! validated [`SystemData`]. All rows are emitted in normalized form: variable
//! terms on the left, a single constant on the right.

use tracing::debug;
use uc_core::{CostSegment, SystemData, UcResult};

use super::model::{ConstraintTag, LinearExpr, Sense, UcModel, VarId, VarKey, VarKind};

/// Per-generator variable handles, indexed by `period - 1`.
struct GenVars {
    commit: Vec<VarId>,
    startup: Vec<VarId>,
    shutdown: Vec<VarId>,
    dispatch: Vec<VarId>,
    /// `segments[s][t - 1]`
    segments: Vec<Vec<VarId>>,
    spinning: Vec<VarId>,
    non_spinning: Vec<VarId>,
}

/// Builds a [`UcModel`] for one system snapshot.
///
/// Cost segments are computed up front, so an invalid segment count fails
/// before any variable exists.
pub struct ModelBuilder<'a> {
    system: &'a SystemData,
    segments: Vec<Vec<CostSegment>>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(system: &'a SystemData, segment_count: usize) -> UcResult<Self> {
        let segments = system
            .generators()
            .iter()
            .map(|g| g.cost_segments(segment_count))
            .collect::<UcResult<Vec<_>>>()?;
        Ok(Self { system, segments })
    }

    /// Piecewise cost blocks of generator `gen`.
    pub fn segments(&self, gen: usize) -> &[CostSegment] {
        &self.segments[gen]
    }

    pub fn build(self) -> UcModel {
        let mut model = UcModel::new();
        let gens = self.add_generator_variables(&mut model);
        let (angles, flows) = self.add_network_variables(&mut model);

        self.add_objective(&mut model, &gens);
        self.add_dispatch_constraints(&mut model, &gens);
        self.add_ramp_constraints(&mut model, &gens);
        self.add_transition_constraints(&mut model, &gens);
        self.add_min_run_constraints(&mut model, &gens);
        self.add_network_constraints(&mut model, &gens, &angles, &flows);
        self.add_reserve_constraints(&mut model, &gens);

        debug!(
            variables = model.variables().len(),
            binaries = model.num_binaries(),
            constraints = model.constraints().len(),
            "built unit commitment model"
        );
        model
    }

    fn add_generator_variables(&self, model: &mut UcModel) -> Vec<GenVars> {
        let periods = self.system.periods();
        self.system
            .generators()
            .iter()
            .enumerate()
            .map(|(g, gen)| {
                let binary = |model: &mut UcModel, key| {
                    model.add_variable(key, VarKind::Binary, 0.0, 1.0)
                };
                let mut vars = GenVars {
                    commit: Vec::new(),
                    startup: Vec::new(),
                    shutdown: Vec::new(),
                    dispatch: Vec::new(),
                    segments: vec![Vec::new(); self.segments[g].len()],
                    spinning: Vec::new(),
                    non_spinning: Vec::new(),
                };
                for t in periods.clone() {
                    vars.commit.push(binary(model, VarKey::Commit { gen: g, period: t }));
                    vars.startup.push(binary(model, VarKey::Startup { gen: g, period: t }));
                    vars.shutdown.push(binary(model, VarKey::Shutdown { gen: g, period: t }));
                    vars.dispatch.push(model.add_variable(
                        VarKey::Dispatch { gen: g, period: t },
                        VarKind::Continuous,
                        0.0,
                        gen.pmax_mw,
                    ));
                    for (s, seg) in self.segments[g].iter().enumerate() {
                        vars.segments[s].push(model.add_variable(
                            VarKey::Segment {
                                gen: g,
                                segment: s,
                                period: t,
                            },
                            VarKind::Continuous,
                            0.0,
                            seg.width().max(0.0),
                        ));
                    }
                    vars.spinning.push(model.add_variable(
                        VarKey::SpinningReserve { gen: g, period: t },
                        VarKind::Continuous,
                        0.0,
                        f64::INFINITY,
                    ));
                    vars.non_spinning.push(model.add_variable(
                        VarKey::NonSpinningReserve { gen: g, period: t },
                        VarKind::Continuous,
                        0.0,
                        f64::INFINITY,
                    ));
                }
                vars
            })
            .collect()
    }

    /// Returns `(angles[bus_idx][t-1], flows[line][t-1])`.
    fn add_network_variables(&self, model: &mut UcModel) -> (Vec<Vec<VarId>>, Vec<Vec<VarId>>) {
        let angles: Vec<Vec<VarId>> = self
            .system
            .buses()
            .iter()
            .map(|&bus| {
                self.system
                    .periods()
                    .map(|t| {
                        model.add_variable(
                            VarKey::Angle { bus, period: t },
                            VarKind::Continuous,
                            f64::NEG_INFINITY,
                            f64::INFINITY,
                        )
                    })
                    .collect()
            })
            .collect();
        let flows: Vec<Vec<VarId>> = (0..self.system.lines().len())
            .map(|l| {
                self.system
                    .periods()
                    .map(|t| {
                        model.add_variable(
                            VarKey::Flow { line: l, period: t },
                            VarKind::Continuous,
                            f64::NEG_INFINITY,
                            f64::INFINITY,
                        )
                    })
                    .collect()
            })
            .collect();
        (angles, flows)
    }

    fn add_objective(&self, model: &mut UcModel, gens: &[GenVars]) {
        for (g, gen) in self.system.generators().iter().enumerate() {
            let vars = &gens[g];
            for t in 0..self.system.horizon() {
                for (s, seg) in self.segments[g].iter().enumerate() {
                    model.add_objective_term(vars.segments[s][t], seg.marginal_cost);
                }
                model.add_objective_term(vars.startup[t], gen.startup_cost);
                model.add_objective_term(vars.shutdown[t], gen.shutdown_cost);
            }
        }
    }

    /// Segment sum, dispatch bounds under commitment, segment coupling.
    fn add_dispatch_constraints(&self, model: &mut UcModel, gens: &[GenVars]) {
        for (g, gen) in self.system.generators().iter().enumerate() {
            let vars = &gens[g];
            for period in self.system.periods() {
                let t = period - 1;
                let segment_total = vars
                    .segments
                    .iter()
                    .fold(LinearExpr::new(), |e, seg| e.term(seg[t], 1.0));

                let mut seg_sum = LinearExpr::new().term(vars.dispatch[t], 1.0);
                seg_sum.add_scaled(&segment_total, -1.0);
                model.add_constraint(
                    ConstraintTag::SegmentSum { gen: g, period },
                    seg_sum,
                    Sense::Eq,
                    0.0,
                );

                model.add_constraint(
                    ConstraintTag::DispatchMin { gen: g, period },
                    LinearExpr::new()
                        .term(vars.dispatch[t], 1.0)
                        .term(vars.commit[t], -gen.pmin_mw),
                    Sense::Ge,
                    0.0,
                );
                model.add_constraint(
                    ConstraintTag::DispatchMax { gen: g, period },
                    LinearExpr::new()
                        .term(vars.dispatch[t], 1.0)
                        .term(vars.commit[t], -gen.pmax_mw),
                    Sense::Le,
                    0.0,
                );

                let mut coupling = segment_total;
                coupling.add_term(vars.commit[t], -gen.pmax_mw);
                model.add_constraint(
                    ConstraintTag::SegmentCommit { gen: g, period },
                    coupling,
                    Sense::Le,
                    0.0,
                );
            }
        }
    }

    fn add_ramp_constraints(&self, model: &mut UcModel, gens: &[GenVars]) {
        for (g, gen) in self.system.generators().iter().enumerate() {
            let p = &gens[g].dispatch;
            for period in 2..=self.system.horizon() {
                let (prev, cur) = (p[period - 2], p[period - 1]);
                model.add_constraint(
                    ConstraintTag::RampUp { gen: g, period },
                    LinearExpr::new().term(cur, 1.0).term(prev, -1.0),
                    Sense::Le,
                    gen.ramp_up(),
                );
                model.add_constraint(
                    ConstraintTag::RampDown { gen: g, period },
                    LinearExpr::new().term(prev, 1.0).term(cur, -1.0),
                    Sense::Le,
                    gen.ramp_down(),
                );
            }
        }
    }

    /// `v(t) ≥ u(t) − u(t−1)` and `w(t) ≥ u(t−1) − u(t)`.
    ///
    /// At period 1 the previous commitment is the constant `initially_on`.
    fn add_transition_constraints(&self, model: &mut UcModel, gens: &[GenVars]) {
        for (g, gen) in self.system.generators().iter().enumerate() {
            let vars = &gens[g];
            let initial = if gen.initially_on { 1.0 } else { 0.0 };
            for period in self.system.periods() {
                let t = period - 1;
                let mut startup = LinearExpr::new()
                    .term(vars.startup[t], 1.0)
                    .term(vars.commit[t], -1.0);
                let mut shutdown = LinearExpr::new()
                    .term(vars.shutdown[t], 1.0)
                    .term(vars.commit[t], 1.0);
                let (startup_rhs, shutdown_rhs) = if t == 0 {
                    (-initial, initial)
                } else {
                    startup.add_term(vars.commit[t - 1], 1.0);
                    shutdown.add_term(vars.commit[t - 1], -1.0);
                    (0.0, 0.0)
                };
                model.add_constraint(
                    ConstraintTag::StartupLink { gen: g, period },
                    startup,
                    Sense::Ge,
                    startup_rhs,
                );
                model.add_constraint(
                    ConstraintTag::ShutdownLink { gen: g, period },
                    shutdown,
                    Sense::Ge,
                    shutdown_rhs,
                );
            }
        }
    }

    /// Window rules for spans longer than one period, starts with `t + span − 1 ≤ H`.
    ///
    /// Minimum up:   `Σ_{k=t}^{t+span−1} v(k) ≤ u(t+span−1)`
    /// Minimum down: `Σ_{k=t}^{t+span−1} w(k) ≤ 1 − u(t+span−1)`
    fn add_min_run_constraints(&self, model: &mut UcModel, gens: &[GenVars]) {
        let horizon = self.system.horizon();
        for (g, gen) in self.system.generators().iter().enumerate() {
            let vars = &gens[g];

            let span = gen.min_up_periods;
            if span > 1 && span <= horizon {
                for start in 1..=(horizon + 1 - span) {
                    let last = start + span - 1;
                    let mut expr = (start..=last)
                        .fold(LinearExpr::new(), |e, k| e.term(vars.startup[k - 1], 1.0));
                    expr.add_term(vars.commit[last - 1], -1.0);
                    model.add_constraint(ConstraintTag::MinUp { gen: g, start }, expr, Sense::Le, 0.0);
                }
            }

            let span = gen.min_down_periods;
            if span > 1 && span <= horizon {
                for start in 1..=(horizon + 1 - span) {
                    let last = start + span - 1;
                    let mut expr = (start..=last)
                        .fold(LinearExpr::new(), |e, k| e.term(vars.shutdown[k - 1], 1.0));
                    expr.add_term(vars.commit[last - 1], 1.0);
                    model.add_constraint(
                        ConstraintTag::MinDown { gen: g, start },
                        expr,
                        Sense::Le,
                        1.0,
                    );
                }
            }
        }
    }

    fn add_network_constraints(
        &self,
        model: &mut UcModel,
        gens: &[GenVars],
        angles: &[Vec<VarId>],
        flows: &[Vec<VarId>],
    ) {
        let system = self.system;

        for &bus in system.buses() {
            for period in system.periods() {
                let t = period - 1;
                let mut expr = LinearExpr::new();
                for (g, gen) in system.generators().iter().enumerate() {
                    if gen.bus == bus {
                        expr.add_term(gens[g].dispatch[t], 1.0);
                    }
                }
                for (l, line) in system.lines().iter().enumerate() {
                    if line.to_bus == bus {
                        expr.add_term(flows[l][t], 1.0);
                    }
                    if line.from_bus == bus {
                        expr.add_term(flows[l][t], -1.0);
                    }
                }
                model.add_constraint(
                    ConstraintTag::Balance { bus, period },
                    expr,
                    Sense::Eq,
                    system.net_demand(bus, period),
                );
            }
        }

        for (l, line) in system.lines().iter().enumerate() {
            let from = system.bus_index(line.from_bus);
            let to = system.bus_index(line.to_bus);
            for period in system.periods() {
                let t = period - 1;
                let mut expr = LinearExpr::new().term(flows[l][t], 1.0);
                if let (Some(b), Some(f), Some(k)) = (line.susceptance(), from, to) {
                    expr.add_term(angles[f][t], -b);
                    expr.add_term(angles[k][t], b);
                }
                model.add_constraint(ConstraintTag::DcFlow { line: l, period }, expr, Sense::Eq, 0.0);

                model.add_constraint(
                    ConstraintTag::LineLimitForward { line: l, period },
                    LinearExpr::new().term(flows[l][t], 1.0),
                    Sense::Le,
                    line.limit_mw,
                );
                model.add_constraint(
                    ConstraintTag::LineLimitReverse { line: l, period },
                    LinearExpr::new().term(flows[l][t], -1.0),
                    Sense::Le,
                    line.limit_mw,
                );
            }
        }

        // Reference bus is index 0 after sorting
        if let Some(reference) = angles.first() {
            for period in system.periods() {
                model.add_constraint(
                    ConstraintTag::ReferenceAngle { period },
                    LinearExpr::new().term(reference[period - 1], 1.0),
                    Sense::Eq,
                    0.0,
                );
            }
        }
    }

    fn add_reserve_constraints(&self, model: &mut UcModel, gens: &[GenVars]) {
        let generators = self.system.generators();
        for period in self.system.periods() {
            let t = period - 1;
            let mut capacity = LinearExpr::with_capacity(2 * generators.len());
            let mut spinning = LinearExpr::with_capacity(generators.len());
            let mut non_spinning = LinearExpr::with_capacity(generators.len());

            for (g, gen) in generators.iter().enumerate() {
                let vars = &gens[g];
                capacity.add_term(vars.commit[t], gen.pmax_mw);
                capacity.add_term(vars.dispatch[t], -1.0);
                spinning.add_term(vars.spinning[t], 1.0);
                non_spinning.add_term(vars.non_spinning[t], 1.0);

                // r_sp ≤ pmax·u − p
                model.add_constraint(
                    ConstraintTag::SpinningHeadroom { gen: g, period },
                    LinearExpr::new()
                        .term(vars.spinning[t], 1.0)
                        .term(vars.dispatch[t], 1.0)
                        .term(vars.commit[t], -gen.pmax_mw),
                    Sense::Le,
                    0.0,
                );
                // r_ns ≤ pmax·(1 − u) + (pmax − p)
                model.add_constraint(
                    ConstraintTag::NonSpinningHeadroom { gen: g, period },
                    LinearExpr::new()
                        .term(vars.non_spinning[t], 1.0)
                        .term(vars.dispatch[t], 1.0)
                        .term(vars.commit[t], gen.pmax_mw),
                    Sense::Le,
                    2.0 * gen.pmax_mw,
                );
            }

            model.add_constraint(
                ConstraintTag::SpinningCapacity { period },
                capacity,
                Sense::Ge,
                self.system.spinning_reserve(period),
            );
            model.add_constraint(
                ConstraintTag::SpinningRequirement { period },
                spinning,
                Sense::Ge,
                self.system.spinning_reserve(period),
            );
            model.add_constraint(
                ConstraintTag::NonSpinningRequirement { period },
                non_spinning,
                Sense::Ge,
                self.system.non_spinning_reserve(period),
            );
        }
    }
}

/// Build the commitment model for `system` with `segment_count` cost blocks per unit.
pub fn build_model(system: &SystemData, segment_count: usize) -> UcResult<UcModel> {
    Ok(ModelBuilder::new(system, segment_count)?.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uc::model::ConstraintRecord;
    use uc_core::{BusId, Generator, Line, QuadraticCost, SystemSnapshot, UcError};

    fn count(model: &UcModel, pred: impl Fn(&ConstraintTag) -> bool) -> usize {
        model.constraints().iter().filter(|c| pred(&c.tag)).count()
    }

    fn find(model: &UcModel, tag: ConstraintTag) -> &ConstraintRecord {
        model
            .constraints()
            .iter()
            .find(|c| c.tag == tag)
            .expect("constraint present")
    }

    fn coeff(record: &ConstraintRecord, var: VarId) -> f64 {
        record
            .expr
            .terms()
            .iter()
            .filter(|(v, _)| *v == var)
            .map(|(_, c)| *c)
            .sum()
    }

    fn three_bus(horizon: usize) -> SystemData {
        SystemSnapshot::new(horizon)
            .buses([BusId::new(3), BusId::new(1), BusId::new(2)])
            .generator(
                Generator::new("G1", BusId::new(1), 10.0, 100.0)
                    .with_cost(QuadraticCost::quadratic(0.01, 10.0))
                    .with_min_run_times(3, 2)
                    .with_transition_costs(500.0, 50.0),
            )
            .generator(Generator::new("G2", BusId::new(2), 0.0, 50.0).with_cost(QuadraticCost::linear(30.0)))
            .line(Line::new("L12", BusId::new(1), BusId::new(2), 0.1, 80.0))
            .line(Line {
                reactance: None,
                ..Line::new("L23", BusId::new(2), BusId::new(3), 0.0, 80.0)
            })
            .demand(BusId::new(3), vec![40.0; horizon])
            .renewable(BusId::new(2), vec![5.0; horizon])
            .spinning_reserve(vec![10.0; horizon])
            .build()
            .unwrap()
    }

    #[test]
    fn test_variable_counts() {
        let system = three_bus(4);
        let model = build_model(&system, 3).unwrap();
        // per gen & period: u, v, w, p, r_sp, r_ns + segments (3 each)
        let per_period_gen = 6 + 3;
        let expected = 2 * 4 * per_period_gen + 3 * 4 + 2 * 4;
        assert_eq!(model.variables().len(), expected);
        assert_eq!(model.num_binaries(), 2 * 4 * 3);
        assert!(model.has_free_binaries());
    }

    #[test]
    fn test_invalid_segment_count_fails_before_building() {
        let system = three_bus(2);
        let err = ModelBuilder::new(&system, 0).err().unwrap();
        assert!(matches!(err, UcError::DataValidation(_)));
    }

    #[test]
    fn test_segment_bounds_match_widths() {
        let system = three_bus(1);
        let model = build_model(&system, 3).unwrap();
        let seg = model
            .var(VarKey::Segment {
                gen: 0,
                segment: 2,
                period: 1,
            })
            .unwrap();
        let (lo, hi) = model.entry(seg).bounds();
        assert_eq!(lo, 0.0);
        assert!((hi - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_up_windows_only_inside_horizon() {
        let system = three_bus(5);
        let model = build_model(&system, 1).unwrap();
        // G1: min_up 3 → starts 1..=3, min_down 2 → starts 1..=4; G2 has none
        assert_eq!(count(&model, |t| matches!(t, ConstraintTag::MinUp { .. })), 3);
        assert_eq!(count(&model, |t| matches!(t, ConstraintTag::MinDown { .. })), 4);

        let row = find(&model, ConstraintTag::MinUp { gen: 0, start: 2 });
        let u4 = model.var(VarKey::Commit { gen: 0, period: 4 }).unwrap();
        let v2 = model.var(VarKey::Startup { gen: 0, period: 2 }).unwrap();
        let v5 = model.var(VarKey::Startup { gen: 0, period: 5 }).unwrap();
        assert_eq!(coeff(row, u4), -1.0);
        assert_eq!(coeff(row, v2), 1.0);
        assert_eq!(coeff(row, v5), 0.0);
        assert_eq!(row.sense, Sense::Le);
    }

    #[test]
    fn test_window_longer_than_horizon_is_skipped() {
        let system = three_bus(2);
        let model = build_model(&system, 1).unwrap();
        assert_eq!(count(&model, |t| matches!(t, ConstraintTag::MinUp { .. })), 0);
        assert_eq!(count(&model, |t| matches!(t, ConstraintTag::MinDown { .. })), 1);
    }

    #[test]
    fn test_ramps_start_at_period_two() {
        let system = three_bus(3);
        let model = build_model(&system, 1).unwrap();
        assert_eq!(count(&model, |t| matches!(t, ConstraintTag::RampUp { .. })), 2 * 2);
        let row = find(&model, ConstraintTag::RampUp { gen: 1, period: 2 });
        assert_eq!(row.rhs, 50.0);
    }

    #[test]
    fn test_first_period_assumes_unit_off() {
        let system = three_bus(2);
        let model = build_model(&system, 1).unwrap();
        let row = find(&model, ConstraintTag::StartupLink { gen: 0, period: 1 });
        assert_eq!(row.expr.terms().len(), 2);
        assert_eq!(row.rhs, 0.0);
        let row = find(&model, ConstraintTag::StartupLink { gen: 0, period: 2 });
        assert_eq!(row.expr.terms().len(), 3);
    }

    #[test]
    fn test_initially_on_unit_links_to_constant() {
        let system = SystemSnapshot::new(2)
            .bus(BusId::new(1))
            .generator(Generator::new("G", BusId::new(1), 0.0, 10.0).with_initially_on(true))
            .build()
            .unwrap();
        let model = build_model(&system, 1).unwrap();
        assert_eq!(find(&model, ConstraintTag::StartupLink { gen: 0, period: 1 }).rhs, -1.0);
        assert_eq!(find(&model, ConstraintTag::ShutdownLink { gen: 0, period: 1 }).rhs, 1.0);
    }

    #[test]
    fn test_balance_rows_use_net_demand_and_flow_direction() {
        let system = three_bus(1);
        let model = build_model(&system, 1).unwrap();
        let id = model.balance_constraint(BusId::new(2), 1).unwrap();
        let row = model.constraint(id);
        assert_eq!(row.sense, Sense::Eq);
        assert_eq!(row.rhs, -5.0);

        let inflow = model.var(VarKey::Flow { line: 0, period: 1 }).unwrap();
        let outflow = model.var(VarKey::Flow { line: 1, period: 1 }).unwrap();
        let p2 = model.var(VarKey::Dispatch { gen: 1, period: 1 }).unwrap();
        assert_eq!(coeff(row, inflow), 1.0);
        assert_eq!(coeff(row, outflow), -1.0);
        assert_eq!(coeff(row, p2), 1.0);
        assert_eq!(count(&model, |t| matches!(t, ConstraintTag::Balance { .. })), 3);
    }

    #[test]
    fn test_dc_flow_rows() {
        let system = three_bus(1);
        let model = build_model(&system, 1).unwrap();
        let row = find(&model, ConstraintTag::DcFlow { line: 0, period: 1 });
        let th1 = model
            .var(VarKey::Angle {
                bus: BusId::new(1),
                period: 1,
            })
            .unwrap();
        assert!((coeff(row, th1) + 10.0).abs() < 1e-9);

        // Zero-reactance line: flow pinned to zero
        let row = find(&model, ConstraintTag::DcFlow { line: 1, period: 1 });
        assert_eq!(row.expr.terms().len(), 1);
        assert_eq!(row.rhs, 0.0);
    }

    #[test]
    fn test_reference_angle_on_first_sorted_bus() {
        let system = three_bus(2);
        let model = build_model(&system, 1).unwrap();
        let row = find(&model, ConstraintTag::ReferenceAngle { period: 2 });
        let th = model
            .var(VarKey::Angle {
                bus: BusId::new(1),
                period: 2,
            })
            .unwrap();
        assert_eq!(row.expr.terms(), &[(th, 1.0)]);
    }

    #[test]
    fn test_empty_bus_set_emits_no_reference_row() {
        let system = SystemSnapshot::new(2).build().unwrap();
        let model = build_model(&system, 1).unwrap();
        assert_eq!(
            count(&model, |t| matches!(t, ConstraintTag::ReferenceAngle { .. })),
            0
        );
    }

    #[test]
    fn test_objective_prices_segments_and_transitions() {
        let system = three_bus(1);
        let model = build_model(&system, 2).unwrap();
        let coeffs = model.objective_coefficients();
        let seg0 = model
            .var(VarKey::Segment {
                gen: 0,
                segment: 0,
                period: 1,
            })
            .unwrap();
        let v = model.var(VarKey::Startup { gen: 0, period: 1 }).unwrap();
        let w = model.var(VarKey::Shutdown { gen: 0, period: 1 }).unwrap();
        let u = model.var(VarKey::Commit { gen: 0, period: 1 }).unwrap();
        // first block [10, 55], midpoint 32.5 → 2·0.01·32.5 + 10
        assert!((coeffs[seg0.index()] - 10.65).abs() < 1e-9);
        assert_eq!(coeffs[v.index()], 500.0);
        assert_eq!(coeffs[w.index()], 50.0);
        assert_eq!(coeffs[u.index()], 0.0);
    }

    #[test]
    fn test_reserve_rows() {
        let system = three_bus(1);
        let model = build_model(&system, 1).unwrap();
        let row = find(&model, ConstraintTag::SpinningCapacity { period: 1 });
        assert_eq!(row.sense, Sense::Ge);
        assert_eq!(row.rhs, 10.0);
        let row = find(&model, ConstraintTag::NonSpinningHeadroom { gen: 1, period: 1 });
        assert_eq!(row.rhs, 100.0);
    }
}
