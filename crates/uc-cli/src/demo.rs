//! Built-in four-bus day-ahead case.
//!
//! Coal and combined-cycle baseload at buses 1 and 2, a peaker at bus 3, a
//! small hydro unit at bus 1, and wind plus solar injected at bus 4. Demand
//! follows a diurnal curve peaking at period 7.

use std::f64::consts::PI;

use uc_core::{BusId, Generator, Line, QuadraticCost, SystemSnapshot};

/// Segment count used for the demo unless overridden.
pub const DEMO_SEGMENTS: usize = 8;

const BASE_LOAD_MW: [(usize, f64); 4] = [(1, 200.0), (2, 180.0), (3, 150.0), (4, 70.0)];

/// Demo snapshot over `horizon` periods.
pub fn demo_snapshot(horizon: usize) -> SystemSnapshot {
    let bus = BusId::new;
    let mut snapshot = SystemSnapshot::new(horizon)
        .buses((1..=4).map(bus))
        .generator(
            Generator::new("Coal_1", bus(1), 150.0, 500.0)
                .with_ramps(50.0, 50.0)
                .with_transition_costs(1000.0, 200.0)
                .with_min_run_times(6, 4)
                .with_cost(QuadraticCost::quadratic(0.00025, 22.0)),
        )
        .generator(
            Generator::new("Gas_CC_1", bus(2), 100.0, 400.0)
                .with_ramps(80.0, 80.0)
                .with_transition_costs(800.0, 150.0)
                .with_min_run_times(3, 2)
                .with_cost(QuadraticCost::quadratic(0.0008, 35.0)),
        )
        .generator(
            Generator::new("Gas_Peak_1", bus(3), 0.0, 200.0)
                .with_ramps(100.0, 100.0)
                .with_transition_costs(300.0, 50.0)
                .with_cost(QuadraticCost::quadratic(0.002, 50.0)),
        )
        .generator(
            Generator::new("Hydro_1", bus(1), 10.0, 120.0)
                .with_ramps(60.0, 60.0)
                .with_cost(QuadraticCost::quadratic(0.0, 8.0)),
        )
        .line(Line::new("L12", bus(1), bus(2), 0.05, 300.0))
        .line(Line::new("L23", bus(2), bus(3), 0.08, 250.0))
        .line(Line::new("L13", bus(1), bus(3), 0.12, 200.0))
        .line(Line::new("L34", bus(3), bus(4), 0.06, 400.0))
        .line(Line::new("L24", bus(2), bus(4), 0.10, 180.0))
        .spinning_reserve(vec![50.0; horizon])
        .non_spinning_reserve(vec![30.0; horizon]);

    for (id, base) in BASE_LOAD_MW {
        let series = (1..=horizon)
            .map(|t| base * (0.8 + 0.4 * diurnal(t)))
            .collect();
        snapshot = snapshot.demand(bus(id), series);
    }
    let renewables = (1..=horizon).map(renewable_mw).collect();
    snapshot.renewable(bus(4), renewables)
}

/// Load shape in [0, 1] with its peak a quarter-day after period 1.
fn diurnal(period: usize) -> f64 {
    let t = (period - 1) as f64;
    0.5 + 0.5 * (t / 24.0 * 2.0 * PI).sin()
}

/// Solar (peak near midday) plus slowly varying wind, MW.
fn renewable_mw(period: usize) -> f64 {
    let t = period as f64;
    let solar = (100.0 * ((t - 6.0) / 24.0 * PI).sin()).max(0.0);
    let wind = 50.0 + 20.0 * ((t + 3.0) / 8.0).sin();
    solar + wind
}
