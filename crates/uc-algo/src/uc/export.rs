//! Writers for [`UcResults`].
//!
//! Output directory layout:
//! - `unit_schedules.csv`: `gen,time,u,p,v,w`
//! - `lmps.csv`: `bus,time,lmp` (empty `lmp` cell when prices are unavailable)
//! - `results.json`: the full results record

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::solution::UcResults;

pub const SCHEDULES_FILE: &str = "unit_schedules.csv";
pub const LMPS_FILE: &str = "lmps.csv";
pub const RESULTS_FILE: &str = "results.json";

/// Files produced by [`export_results`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub schedules: PathBuf,
    pub lmps: PathBuf,
    pub results: PathBuf,
}

impl UcResults {
    /// Export to JSON format
    pub fn to_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing UcResults to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing JSON to {}", path.display()))?;
        Ok(())
    }

    /// Convert to JSON value (for streaming/stdout)
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).context("converting UcResults to JSON value")
    }

    /// Write the unit schedule table.
    #[cfg(feature = "csv")]
    pub fn schedules_to_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("creating CSV writer for {}", path.display()))?;
        for record in &self.schedules {
            wtr.serialize(record).context("writing schedule record")?;
        }
        wtr.flush().context("flushing CSV writer")?;
        Ok(())
    }

    /// Write the nodal price table.
    #[cfg(feature = "csv")]
    pub fn lmps_to_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("creating CSV writer for {}", path.display()))?;
        for record in &self.prices {
            wtr.serialize(record).context("writing LMP record")?;
        }
        wtr.flush().context("flushing CSV writer")?;
        Ok(())
    }
}

/// Write every results artifact into `outdir`, creating it if needed.
#[cfg(feature = "csv")]
pub fn export_results(results: &UcResults, outdir: &Path) -> Result<ExportPaths> {
    std::fs::create_dir_all(outdir)
        .with_context(|| format!("creating output directory {}", outdir.display()))?;
    let paths = ExportPaths {
        schedules: outdir.join(SCHEDULES_FILE),
        lmps: outdir.join(LMPS_FILE),
        results: outdir.join(RESULTS_FILE),
    };
    results.schedules_to_csv(&paths.schedules)?;
    results.lmps_to_csv(&paths.lmps)?;
    results.to_json(&paths.results)?;
    tracing::info!("Results written to {}", outdir.display());
    Ok(paths)
}
