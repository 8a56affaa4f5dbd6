//! hwpipe - spatial filter pipeline CLI
//!
//! Runs grayscale + filter pipelines over plain-text PPM/PGM images.

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "hwpipe")]
#[command(author, version, about = "Spatial filter pipeline for text pixel-array images")]
#[command(long_about = "
Applies a sequence of spatial filters (smoothing, Sobel edges, convolution
kernels) to a PPM (P3) or PGM (P2) image. Every run converts the input to
grayscale first; filters then alternate between two working buffers.

Examples:
  hwpipe run input.ppm output.ppm                 # smooth -> edge
  hwpipe run input.ppm output.ppm --mode conv     # gaussian -> sharpen
  hwpipe run input.ppm out.ppm --mode all --numeric fixed
  hwpipe apply input.ppm -o out.ppm -s gaussian -s sobel_x
  hwpipe apply input.ppm -o out.ppm --config pipeline.yaml
  hwpipe filters                                  # list stage names
  hwpipe kernel gaussian --size 7 --sigma 1.5     # print a kernel
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a preset pipeline (basic: smooth -> edge, conv: gaussian -> sharpen)
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Run named stages or a YAML pipeline description
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// List registered filter names
    Filters(FiltersArgs),

    /// Print a kernel matrix
    #[command(visible_alias = "k")]
    Kernel(KernelArgs),
}

/// Preset selection for `run`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Smoothing then edge detection
    Basic,
    /// 5x5 Gaussian then sharpen
    Conv,
    /// Both presets, written to `<stem>_basic` and `<stem>_conv`
    All,
}

#[derive(Args)]
struct RunArgs {
    /// Input image (P3 or P2)
    input: PathBuf,

    /// Output image
    output: PathBuf,

    /// Pipeline preset
    #[arg(short, long, value_enum, default_value = "basic")]
    mode: Mode,

    /// Convolution arithmetic: float or fixed
    #[arg(short, long, default_value = "float")]
    numeric: String,
}

#[derive(Args)]
struct ApplyArgs {
    /// Input image (P3 or P2)
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Stage name, repeatable, run in order
    #[arg(short, long = "stage")]
    stages: Vec<String>,

    /// YAML pipeline description (stages run before any --stage)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Convolution arithmetic, overrides the config file
    #[arg(short, long)]
    numeric: Option<String>,
}

#[derive(Args)]
struct FiltersArgs {
    /// Convolution arithmetic used by the listed constructors
    #[arg(short, long, default_value = "float")]
    numeric: String,
}

#[derive(Args)]
struct KernelArgs {
    /// Kernel name: gaussian, sharpen, sobel_x, sobel_y, box, identity
    name: String,

    /// Side length (odd)
    #[arg(short, long)]
    size: Option<usize>,

    /// Gaussian sigma
    #[arg(long, default_value = "1.0")]
    sigma: f32,
}

/// Installs the fmt subscriber; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => commands::run::run(args, cli.verbose),
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
        Commands::Filters(args) => commands::filters::run(args),
        Commands::Kernel(args) => commands::kernel::run(args),
    }
}
