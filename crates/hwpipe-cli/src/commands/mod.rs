//! CLI command implementations

pub mod apply;
pub mod filters;
pub mod kernel;
pub mod run;

use anyhow::{Context, Result};
use hwpipe_ops::{NumericMode, Pipeline};
use std::path::Path;

/// Parse a `--numeric` value
pub fn parse_numeric(value: &str) -> Result<NumericMode> {
    value
        .parse::<NumericMode>()
        .with_context(|| format!("Invalid --numeric value: {value}"))
}

/// Run a built pipeline from file to file
pub fn run_pipeline(pipeline: &mut Pipeline, input: &Path, output: &Path) -> Result<()> {
    pipeline
        .try_run(input, output)
        .with_context(|| format!("Pipeline failed: {} -> {}", input.display(), output.display()))
}

/// Print a one-line stage summary when verbose
pub fn print_stages(pipeline: &Pipeline, verbose: u8) {
    if verbose > 0 {
        let names = pipeline.stage_names();
        if names.is_empty() {
            println!("Stages: (none, grayscale only)");
        } else {
            println!("Stages: {}", names.join(" -> "));
        }
    }
}
