use anyhow::{Context, Result};
use chartflow::scenarios::segments::{run, Config};
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    chartflow::init_tracing();

    let out_dir = Path::new("output").join("segments");
    let outcome = run(&Config::default(), &out_dir)
        .with_context(|| format!("segments run failed (output in {})", out_dir.display()))?;
    for (segment, median) in outcome.medians() {
        info!("{segment}: median ${median:.2}");
    }
    info!("{} files written to {}", outcome.artifacts.len(), out_dir.display());
    Ok(())
}
