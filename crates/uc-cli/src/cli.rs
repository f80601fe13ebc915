use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "uc",
    author,
    version,
    about = "Day-ahead unit commitment with nodal prices",
    long_about = None
)]
pub struct Cli {
    /// Set the logging level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve the unit commitment for a JSON system snapshot
    Solve {
        /// Path to the system snapshot (JSON)
        input: PathBuf,

        /// Directory for unit_schedules.csv, lmps.csv and results.json
        #[arg(short, long, default_value = "uc_results")]
        out: PathBuf,

        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Run the built-in four-bus day-ahead case
    Demo {
        /// Number of periods
        #[arg(long, default_value_t = 24)]
        horizon: usize,

        /// Directory for unit_schedules.csv, lmps.csv and results.json
        #[arg(short, long, default_value = "uc_results_demo")]
        out: PathBuf,

        /// Write the demo system as a JSON snapshot to this path and exit
        #[arg(long)]
        write_input: Option<PathBuf>,

        #[command(flatten)]
        solver: SolverArgs,
    },
    /// List registered solver backends and their capabilities
    Backends,
}

/// Options shared by every command that solves.
#[derive(Args, Debug, Clone, Default)]
pub struct SolverArgs {
    /// TOML file with solve settings (segments, candidates, time_limit_seconds)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Piecewise-linear cost segments per generator
    #[arg(long)]
    pub segments: Option<usize>,

    /// Comma-separated backend ids in priority order (e.g. "microlp,clarabel")
    #[arg(long, value_delimiter = ',')]
    pub solvers: Option<Vec<String>>,

    /// Wall-clock limit per backend call, in seconds
    #[arg(long)]
    pub time_limit: Option<f64>,
}
