//! `uc backends`: what this build can solve with.

use std::io::{self, Write};

use anyhow::Result;
use tabwriter::TabWriter;
use uc_algo::BackendRegistry;

pub fn handle() -> Result<()> {
    let registry = BackendRegistry::with_defaults();
    let defaults = BackendRegistry::default_candidates();

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "BACKEND\tMILP\tDUALS\tAVAILABLE\tDEFAULT ORDER")?;
    for id in registry.list_backends() {
        let Some(backend) = registry.get_backend(id) else {
            continue;
        };
        let caps = backend.capabilities();
        let order = defaults
            .iter()
            .position(|d| d == id)
            .map(|i| (i + 1).to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            id,
            yes_no(caps.mixed_integer),
            yes_no(caps.duals),
            yes_no(backend.is_available()),
            order
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
