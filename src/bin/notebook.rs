use anyhow::{Context, Result};
use chartflow::scenarios::notebook::{run, Config};
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    chartflow::init_tracing();

    let out_dir = Path::new("output").join("notebook");
    let outcome = run(&Config::default(), &out_dir)
        .with_context(|| format!("notebook run failed (output in {})", out_dir.display()))?;
    info!("Correlation strength: {} ({:.4})", outcome.strength, outcome.actual_correlation);
    info!("{} files written to {}", outcome.artifacts.len(), out_dir.display());
    Ok(())
}
