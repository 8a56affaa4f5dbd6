//! Filters command - lists stage names usable with `apply --stage`.

use crate::FiltersArgs;
use anyhow::Result;
use hwpipe_ops::Pipeline;

pub fn run(args: FiltersArgs) -> Result<()> {
    let numeric = super::parse_numeric(&args.numeric)?;
    let pipeline = Pipeline::with_numeric_mode(numeric);
    let registry = pipeline.registry();

    println!("Registered filters ({numeric} arithmetic):");
    for name in registry.names() {
        // Instantiate to report the stage's own name
        let stage = registry.instantiate(name).map(|f| f.name().to_string()).unwrap_or_default();
        println!("  {name:<10} {stage}");
    }
    Ok(())
}
