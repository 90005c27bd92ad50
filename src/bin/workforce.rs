use anyhow::{Context, Result};
use chartflow::scenarios::workforce::{run, Config};
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    chartflow::init_tracing();

    let out_dir = Path::new("output").join("workforce");
    let outcome = run(&Config::default(), &out_dir)
        .with_context(|| format!("workforce run failed (output in {})", out_dir.display()))?;
    info!("Marketing Department Count: {} ({:.1}%)", outcome.focus_count, outcome.focus_share);
    info!("{} files written to {}", outcome.artifacts.len(), out_dir.display());
    Ok(())
}
