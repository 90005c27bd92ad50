use anyhow::{Context, Result};
use chartflow::scenarios::journey::{run, Config};
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    chartflow::init_tracing();

    let out_dir = Path::new("output").join("journey");
    let outcome = run(&Config::default(), &out_dir)
        .with_context(|| format!("journey run failed (output in {})", out_dir.display()))?;
    info!(rows = outcome.rows, links = outcome.links, total = outcome.flows.total(), "journey diagram complete");
    info!("{} files written to {}", outcome.artifacts.len(), out_dir.display());
    Ok(())
}
