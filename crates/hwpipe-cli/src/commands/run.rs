//! Run command
//!
//! Preset pipelines: `basic` (smooth -> edge), `conv` (gaussian -> sharpen),
//! or `all`, which runs both and writes suffixed outputs.

use crate::{Mode, RunArgs};
use anyhow::{bail, Context, Result};
use hwpipe_ops::PipelineConfig;
use std::path::{Path, PathBuf};
use tracing::{info, trace};

pub fn run(args: RunArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), mode = ?args.mode, numeric = %args.numeric, "run::run");
    let numeric = super::parse_numeric(&args.numeric)?;

    let presets: Vec<(&str, PathBuf)> = match args.mode {
        Mode::Basic => vec![("basic", args.output.clone())],
        Mode::Conv => vec![("conv", args.output.clone())],
        Mode::All => vec![
            ("basic", suffixed(&args.output, "basic")),
            ("conv", suffixed(&args.output, "conv")),
        ],
    };

    if presets.len() == 1 {
        let (name, output) = &presets[0];
        let mut pipeline = build(name, numeric)?;
        super::print_stages(&pipeline, verbose);
        super::run_pipeline(&mut pipeline, &args.input, output)?;
        if verbose > 0 {
            println!("Wrote {}", output.display());
        }
        return Ok(());
    }

    // `all`: a failing preset does not stop the other one
    let mut succeeded = 0;
    for (name, output) in &presets {
        let mut pipeline = build(name, numeric)?;
        super::print_stages(&pipeline, verbose);
        if pipeline.run(&args.input, output) {
            info!(preset = name, output = %output.display(), "preset done");
            if verbose > 0 {
                println!("Wrote {}", output.display());
            }
            succeeded += 1;
        } else {
            eprintln!("{name} pipeline failed for {}", args.input.display());
        }
    }

    if succeeded == 0 {
        bail!("All pipelines failed for {}", args.input.display());
    }
    Ok(())
}

fn build(name: &str, numeric: hwpipe_ops::NumericMode) -> Result<hwpipe_ops::Pipeline> {
    let config = PipelineConfig::preset(name)
        .with_context(|| format!("Unknown preset: {name}"))?
        .with_numeric(numeric);
    config
        .build_pipeline()
        .with_context(|| format!("Failed to build {name} pipeline"))
}

/// `out.ppm` + `basic` -> `out_basic.ppm`
fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{suffix}"),
    };
    path.with_file_name(name)
}
