use anyhow::{Context, Result};
use chartflow::scenarios::retention::{run, Config};
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    chartflow::init_tracing();

    let out_dir = Path::new("output").join("retention");
    let outcome = run(&Config::default(), &out_dir)
        .with_context(|| format!("retention run failed (output in {})", out_dir.display()))?;
    info!("Average retention {}%, gap to benchmark {}%", outcome.average, outcome.gap);
    info!("{} files written to {}", outcome.artifacts.len(), out_dir.display());
    Ok(())
}
