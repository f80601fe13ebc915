//! `uc solve`: snapshot in, schedules and prices out.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};
use uc_algo::{export_results, solve_unit_commitment, UcConfig};
use uc_cli::SolverArgs;
use uc_core::{SystemData, SystemSnapshot};

pub fn handle(input: &Path, out: &Path, solver: &SolverArgs) -> Result<()> {
    let system = SystemSnapshot::from_json_file(input)
        .with_context(|| format!("reading system snapshot {}", input.display()))?
        .build()
        .context("validating system snapshot")?;
    let config = resolve_config(solver, UcConfig::default())?;
    run(&system, &config, out)
}

/// Layer the config file and command-line flags over `base`.
pub fn resolve_config(args: &SolverArgs, base: UcConfig) -> Result<UcConfig> {
    let mut config = match &args.config {
        Some(path) => UcConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => base,
    };
    if let Some(segments) = args.segments {
        config.segments = segments;
    }
    if let Some(solvers) = &args.solvers {
        config.candidates = solvers.clone();
    }
    if let Some(limit) = args.time_limit {
        config.time_limit_seconds = Some(limit);
    }
    config.validate().context("invalid solve settings")?;
    Ok(config)
}

/// Solve, export, and print the summary.
pub fn run(system: &SystemData, config: &UcConfig, out: &Path) -> Result<()> {
    info!(
        "System: {} buses, {} generators, {} lines, {} periods",
        system.buses().len(),
        system.generators().len(),
        system.lines().len(),
        system.horizon()
    );
    let outcome = solve_unit_commitment(system, config).context("unit commitment solve failed")?;
    if let Some(warning) = &outcome.warning {
        warn!("{}", warning);
    }

    let paths = export_results(&outcome.results, out)?;
    println!("{}", outcome.results.summary());
    println!("Schedules: {}", paths.schedules.display());
    println!("LMPs:      {}", paths.lmps.display());
    println!("Results:   {}", paths.results.display());
    Ok(())
}
