use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use uc_cli::{Cli, Commands};

mod commands;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_string().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Solve { input, out, solver } => commands::solve::handle(input, out, solver),
        Commands::Demo {
            horizon,
            out,
            write_input,
            solver,
        } => commands::demo::handle(*horizon, out, write_input.as_deref(), solver),
        Commands::Backends => commands::backends::handle(),
    };

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
