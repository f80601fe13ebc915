//! `uc demo`: the built-in four-bus case.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use uc_algo::UcConfig;
use uc_cli::demo::{demo_snapshot, DEMO_SEGMENTS};
use uc_cli::SolverArgs;

use super::solve;

pub fn handle(
    horizon: usize,
    out: &Path,
    write_input: Option<&Path>,
    solver: &SolverArgs,
) -> Result<()> {
    let snapshot = demo_snapshot(horizon);

    if let Some(path) = write_input {
        let json = serde_json::to_string_pretty(&snapshot).context("serializing demo snapshot")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing demo snapshot to {}", path.display()))?;
        println!("Demo system written to {}", path.display());
        return Ok(());
    }

    let system = snapshot.build().context("building demo system")?;
    let base = UcConfig::default().with_segments(DEMO_SEGMENTS);
    let config = solve::resolve_config(solver, base)?;
    info!("Running demo over {} periods", horizon);
    solve::run(&system, &config, out)
}
