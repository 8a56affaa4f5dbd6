//! Apply command
//!
//! Builds a pipeline from a YAML description and/or `--stage` names.

use crate::ApplyArgs;
use anyhow::{bail, Context, Result};
use hwpipe_ops::PipelineConfig;
use tracing::{info, trace};

pub fn run(args: ApplyArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), stages = ?args.stages, "apply::run");

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load pipeline config: {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(numeric) = &args.numeric {
        config.numeric = super::parse_numeric(numeric)?;
    }

    let mut pipeline = config.build_pipeline().context("Invalid pipeline config")?;
    for name in &args.stages {
        if !pipeline.add_stage_by_name(name) {
            bail!(
                "Unknown filter '{name}'. Available: {}",
                pipeline.registered_filters().join(", ")
            );
        }
    }

    info!(stages = pipeline.stage_count(), numeric = %config.numeric, "Applying pipeline");
    super::print_stages(&pipeline, verbose);
    super::run_pipeline(&mut pipeline, &args.input, &args.output)?;

    if verbose > 0 {
        println!("Wrote {}", args.output.display());
    }
    Ok(())
}
