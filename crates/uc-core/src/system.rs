//! System snapshot and validation
//!
//! [`SystemSnapshot`] is the external input shape (JSON via serde, or built in
//! code with chained calls). [`SystemSnapshot::build`] checks every cross
//! reference and numeric range once and produces a [`SystemData`] that the
//! rest of the engine can index without further checks.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::ops::RangeInclusive;
use std::path::Path;

use crate::{BusId, Generator, Line, UcError, UcResult};

/// Serializable input snapshot.
///
/// Series are indexed by period `1..=horizon` and stored as plain vectors,
/// so `demand[&bus][0]` is the demand at period 1. Buses missing from the
/// demand or renewable maps have zero in every period; missing reserve
/// series are all-zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub horizon: usize,
    pub buses: Vec<BusId>,
    #[serde(default)]
    pub generators: Vec<Generator>,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub demand: BTreeMap<BusId, Vec<f64>>,
    #[serde(default)]
    pub renewable: BTreeMap<BusId, Vec<f64>>,
    #[serde(default)]
    pub spinning_reserve: Vec<f64>,
    #[serde(default)]
    pub non_spinning_reserve: Vec<f64>,
}

impl SystemSnapshot {
    pub fn new(horizon: usize) -> Self {
        Self {
            horizon,
            ..Self::default()
        }
    }

    pub fn bus(mut self, bus: BusId) -> Self {
        self.buses.push(bus);
        self
    }

    pub fn buses(mut self, buses: impl IntoIterator<Item = BusId>) -> Self {
        self.buses.extend(buses);
        self
    }

    pub fn generator(mut self, generator: Generator) -> Self {
        self.generators.push(generator);
        self
    }

    pub fn line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    pub fn demand(mut self, bus: BusId, series: Vec<f64>) -> Self {
        self.demand.insert(bus, series);
        self
    }

    pub fn renewable(mut self, bus: BusId, series: Vec<f64>) -> Self {
        self.renewable.insert(bus, series);
        self
    }

    pub fn spinning_reserve(mut self, series: Vec<f64>) -> Self {
        self.spinning_reserve = series;
        self
    }

    pub fn non_spinning_reserve(mut self, series: Vec<f64>) -> Self {
        self.non_spinning_reserve = series;
        self
    }

    /// Read a snapshot from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> UcResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Validate the snapshot and freeze it into [`SystemData`].
    pub fn build(self) -> UcResult<SystemData> {
        SystemData::try_from(self)
    }
}

/// Validated, immutable system description.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemData {
    horizon: usize,
    buses: Vec<BusId>,
    generators: Vec<Generator>,
    lines: Vec<Line>,
    demand: BTreeMap<BusId, Vec<f64>>,
    renewable: BTreeMap<BusId, Vec<f64>>,
    spinning_reserve: Vec<f64>,
    non_spinning_reserve: Vec<f64>,
}

impl TryFrom<SystemSnapshot> for SystemData {
    type Error = UcError;

    fn try_from(snapshot: SystemSnapshot) -> UcResult<Self> {
        let SystemSnapshot {
            horizon,
            mut buses,
            generators,
            lines,
            demand,
            renewable,
            spinning_reserve,
            non_spinning_reserve,
        } = snapshot;

        if horizon == 0 {
            return Err(UcError::validation("horizon must contain at least one period"));
        }

        buses.sort();
        if let Some(pair) = buses.windows(2).find(|w| w[0] == w[1]) {
            return Err(UcError::validation(format!("duplicate bus {}", pair[0])));
        }
        let known: HashSet<BusId> = buses.iter().copied().collect();

        let mut names = HashSet::new();
        for gen in &generators {
            validate_generator(gen, &known)?;
            if !names.insert(gen.name.as_str()) {
                return Err(UcError::validation(format!(
                    "duplicate generator name '{}'",
                    gen.name
                )));
            }
        }

        let mut names = HashSet::new();
        for line in &lines {
            validate_line(line, &known)?;
            if !names.insert(line.name.as_str()) {
                return Err(UcError::validation(format!(
                    "duplicate line name '{}'",
                    line.name
                )));
            }
        }

        validate_bus_series("demand", &demand, &known, horizon)?;
        validate_bus_series("renewable", &renewable, &known, horizon)?;
        let spinning_reserve = dense_series("spinning_reserve", spinning_reserve, horizon)?;
        let non_spinning_reserve =
            dense_series("non_spinning_reserve", non_spinning_reserve, horizon)?;

        Ok(SystemData {
            horizon,
            buses,
            generators,
            lines,
            demand,
            renewable,
            spinning_reserve,
            non_spinning_reserve,
        })
    }
}

impl SystemData {
    #[inline]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Periods `1..=horizon`.
    #[inline]
    pub fn periods(&self) -> RangeInclusive<usize> {
        1..=self.horizon
    }

    /// Buses in ascending order.
    pub fn buses(&self) -> &[BusId] {
        &self.buses
    }

    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// First bus in sorted order; its angle is pinned to zero.
    pub fn reference_bus(&self) -> Option<BusId> {
        self.buses.first().copied()
    }

    /// Position of `bus` in [`SystemData::buses`].
    pub fn bus_index(&self, bus: BusId) -> Option<usize> {
        self.buses.binary_search(&bus).ok()
    }

    pub fn demand(&self, bus: BusId, period: usize) -> f64 {
        series_value(self.demand.get(&bus), period)
    }

    pub fn renewable(&self, bus: BusId, period: usize) -> f64 {
        series_value(self.renewable.get(&bus), period)
    }

    /// Demand minus renewable injection; the right-hand side of nodal balance.
    pub fn net_demand(&self, bus: BusId, period: usize) -> f64 {
        self.demand(bus, period) - self.renewable(bus, period)
    }

    pub fn spinning_reserve(&self, period: usize) -> f64 {
        series_value(Some(&self.spinning_reserve), period)
    }

    pub fn non_spinning_reserve(&self, period: usize) -> f64 {
        series_value(Some(&self.non_spinning_reserve), period)
    }

    pub fn total_demand(&self, period: usize) -> f64 {
        self.buses.iter().map(|&b| self.demand(b, period)).sum()
    }

    /// Convert back to the serializable input shape.
    pub fn to_snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            horizon: self.horizon,
            buses: self.buses.clone(),
            generators: self.generators.clone(),
            lines: self.lines.clone(),
            demand: self.demand.clone(),
            renewable: self.renewable.clone(),
            spinning_reserve: self.spinning_reserve.clone(),
            non_spinning_reserve: self.non_spinning_reserve.clone(),
        }
    }
}

fn series_value(series: Option<&Vec<f64>>, period: usize) -> f64 {
    period
        .checked_sub(1)
        .and_then(|idx| series.and_then(|s| s.get(idx)))
        .copied()
        .unwrap_or(0.0)
}

fn check_non_negative(what: &str, value: f64) -> UcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(UcError::validation(format!(
            "{what} must be a finite non-negative number (got {value})"
        )));
    }
    Ok(())
}

fn validate_generator(gen: &Generator, known: &HashSet<BusId>) -> UcResult<()> {
    let name = &gen.name;
    if !known.contains(&gen.bus) {
        return Err(UcError::validation(format!(
            "generator '{name}' references unknown bus {}",
            gen.bus
        )));
    }
    check_non_negative(&format!("pmin of generator '{name}'"), gen.pmin_mw)?;
    check_non_negative(&format!("pmax of generator '{name}'"), gen.pmax_mw)?;
    if gen.pmax_mw < gen.pmin_mw {
        return Err(UcError::validation(format!(
            "generator '{name}' has pmax {} < pmin {}",
            gen.pmax_mw, gen.pmin_mw
        )));
    }
    if let Some(ru) = gen.ramp_up_mw {
        check_non_negative(&format!("ramp_up of generator '{name}'"), ru)?;
    }
    if let Some(rd) = gen.ramp_down_mw {
        check_non_negative(&format!("ramp_down of generator '{name}'"), rd)?;
    }
    check_non_negative(&format!("startup_cost of generator '{name}'"), gen.startup_cost)?;
    check_non_negative(&format!("shutdown_cost of generator '{name}'"), gen.shutdown_cost)?;
    if let Some(a) = gen.cost.a {
        check_non_negative(&format!("cost coefficient a of generator '{name}'"), a)?;
    }
    if let Some(b) = gen.cost.b {
        check_non_negative(&format!("cost coefficient b of generator '{name}'"), b)?;
    }
    if gen.min_up_periods < 1 || gen.min_down_periods < 1 {
        return Err(UcError::validation(format!(
            "generator '{name}' needs min_up/min_down of at least 1 period (got {}/{})",
            gen.min_up_periods, gen.min_down_periods
        )));
    }
    Ok(())
}

fn validate_line(line: &Line, known: &HashSet<BusId>) -> UcResult<()> {
    for bus in [line.from_bus, line.to_bus] {
        if !known.contains(&bus) {
            return Err(UcError::validation(format!(
                "line '{}' references unknown bus {bus}",
                line.name
            )));
        }
    }
    if let Some(x) = line.reactance {
        if x.is_nan() || x < 0.0 {
            return Err(UcError::validation(format!(
                "line '{}' has negative or undefined reactance {x}",
                line.name
            )));
        }
    }
    if line.limit_mw.is_nan() || line.limit_mw < 0.0 {
        return Err(UcError::validation(format!(
            "line '{}' has negative limit {}",
            line.name, line.limit_mw
        )));
    }
    Ok(())
}

fn validate_bus_series(
    what: &str,
    series: &BTreeMap<BusId, Vec<f64>>,
    known: &HashSet<BusId>,
    horizon: usize,
) -> UcResult<()> {
    for (bus, values) in series {
        if !known.contains(bus) {
            return Err(UcError::validation(format!("{what} series for unknown bus {bus}")));
        }
        if values.len() != horizon {
            return Err(UcError::validation(format!(
                "{what} series for bus {bus} has {} periods, expected {horizon}",
                values.len()
            )));
        }
        for (idx, &v) in values.iter().enumerate() {
            check_non_negative(&format!("{what} at bus {bus}, period {}", idx + 1), v)?;
        }
    }
    Ok(())
}

fn dense_series(what: &str, values: Vec<f64>, horizon: usize) -> UcResult<Vec<f64>> {
    if values.is_empty() {
        return Ok(vec![0.0; horizon]);
    }
    if values.len() != horizon {
        return Err(UcError::validation(format!(
            "{what} series has {} periods, expected {horizon}",
            values.len()
        )));
    }
    for (idx, &v) in values.iter().enumerate() {
        check_non_negative(&format!("{what} at period {}", idx + 1), v)?;
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuadraticCost;

    fn two_bus() -> SystemSnapshot {
        SystemSnapshot::new(2)
            .buses([BusId::new(2), BusId::new(1)])
            .generator(Generator::new("G1", BusId::new(1), 0.0, 100.0))
            .line(Line::new("L12", BusId::new(1), BusId::new(2), 0.1, 50.0))
            .demand(BusId::new(2), vec![30.0, 40.0])
    }

    fn validation_message(snapshot: SystemSnapshot) -> String {
        match snapshot.build() {
            Err(UcError::DataValidation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_buses_sorted_and_reference_is_first() {
        let system = two_bus().build().unwrap();
        assert_eq!(system.buses(), &[BusId::new(1), BusId::new(2)]);
        assert_eq!(system.reference_bus(), Some(BusId::new(1)));
        assert_eq!(system.bus_index(BusId::new(2)), Some(1));
    }

    #[test]
    fn test_missing_series_default_to_zero() {
        let system = two_bus().build().unwrap();
        assert_eq!(system.demand(BusId::new(1), 1), 0.0);
        assert_eq!(system.demand(BusId::new(2), 2), 40.0);
        assert_eq!(system.renewable(BusId::new(2), 1), 0.0);
        assert_eq!(system.spinning_reserve(2), 0.0);
        assert_eq!(system.non_spinning_reserve(1), 0.0);
        assert_eq!(system.total_demand(2), 40.0);
    }

    #[test]
    fn test_net_demand_subtracts_renewables() {
        let system = two_bus()
            .renewable(BusId::new(2), vec![10.0, 50.0])
            .build()
            .unwrap();
        assert_eq!(system.net_demand(BusId::new(2), 1), 20.0);
        assert_eq!(system.net_demand(BusId::new(2), 2), -10.0);
    }

    #[test]
    fn test_unknown_generator_bus() {
        let msg =
            validation_message(two_bus().generator(Generator::new("G9", BusId::new(9), 0.0, 1.0)));
        assert!(msg.contains("unknown bus 9"));
    }

    #[test]
    fn test_unknown_line_bus() {
        let msg = validation_message(two_bus().line(Line::new(
            "L13",
            BusId::new(1),
            BusId::new(3),
            0.1,
            10.0,
        )));
        assert!(msg.contains("L13"));
    }

    #[test]
    fn test_pmax_below_pmin() {
        let msg =
            validation_message(two_bus().generator(Generator::new("Bad", BusId::new(1), 50.0, 10.0)));
        assert!(msg.contains("pmax"));
    }

    #[test]
    fn test_negative_ramp_and_cost_rejected() {
        let ramp = Generator::new("R", BusId::new(1), 0.0, 10.0).with_ramps(-1.0, 5.0);
        assert!(validation_message(two_bus().generator(ramp)).contains("ramp_up"));

        let cost = Generator::new("C", BusId::new(1), 0.0, 10.0)
            .with_cost(QuadraticCost::quadratic(-0.1, 5.0));
        assert!(validation_message(two_bus().generator(cost)).contains("cost coefficient a"));

        let startup =
            Generator::new("S", BusId::new(1), 0.0, 10.0).with_transition_costs(-5.0, 0.0);
        assert!(validation_message(two_bus().generator(startup)).contains("startup_cost"));
    }

    #[test]
    fn test_min_run_time_below_one() {
        let gen = Generator::new("M", BusId::new(1), 0.0, 10.0).with_min_run_times(0, 1);
        assert!(validation_message(two_bus().generator(gen)).contains("min_up"));
    }

    #[test]
    fn test_series_length_mismatch() {
        let msg = validation_message(two_bus().demand(BusId::new(1), vec![1.0]));
        assert!(msg.contains("expected 2"));

        let msg = validation_message(two_bus().spinning_reserve(vec![1.0, 2.0, 3.0]));
        assert!(msg.contains("spinning_reserve"));
    }

    #[test]
    fn test_negative_forecast_rejected() {
        let msg = validation_message(two_bus().demand(BusId::new(1), vec![1.0, -2.0]));
        assert!(msg.contains("period 2"));
    }

    #[test]
    fn test_duplicates_rejected() {
        assert!(validation_message(two_bus().bus(BusId::new(1))).contains("duplicate bus"));
        let dup = Generator::new("G1", BusId::new(2), 0.0, 10.0);
        assert!(validation_message(two_bus().generator(dup)).contains("duplicate generator"));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let msg = validation_message(SystemSnapshot::new(0));
        assert!(msg.contains("horizon"));
    }

    #[test]
    fn test_zero_reactance_is_accepted() {
        let open = Line {
            reactance: None,
            ..Line::new("L21", BusId::new(2), BusId::new(1), 0.0, 10.0)
        };
        assert!(two_bus().line(open).build().is_ok());

        let negative = Line::new("Lneg", BusId::new(2), BusId::new(1), -0.2, 10.0);
        assert!(validation_message(two_bus().line(negative)).contains("reactance"));
    }

    #[test]
    fn test_empty_bus_set_has_no_reference() {
        let system = SystemSnapshot::new(1).build().unwrap();
        assert!(system.reference_bus().is_none());
    }

    #[test]
    fn test_snapshot_roundtrip_through_json() {
        let system = two_bus().build().unwrap();
        let json = serde_json::to_string(&system.to_snapshot()).unwrap();
        let back: SystemSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.build().unwrap(), system);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("system.json");
        std::fs::write(
            &path,
            r#"{"horizon":1,"buses":[1],"generators":[{"name":"G","bus":1,"pmin_mw":0,"pmax_mw":5}],
               "demand":{"1":[3.0]}}"#,
        )
        .unwrap();
        let system = SystemSnapshot::from_json_file(&path).unwrap().build().unwrap();
        assert_eq!(system.demand(BusId::new(1), 1), 3.0);
    }
}
