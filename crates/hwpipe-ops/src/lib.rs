//! # hwpipe-ops
//!
//! Spatial filter engine for the hwpipe datapath.
//!
//! # Modules
//!
//! - [`kernel`] - odd-sized square convolution kernels
//! - [`numeric`] - float vs fixed-point (Q8) accumulation
//! - [`convolution`] - generic kernel convolution, border copy
//! - [`smoothing`] - 3x3 box blur on intensity, border copy
//! - [`edge`] - Sobel gradient magnitude, black border
//! - [`color`] - luminance grayscale reduction
//! - [`registry`] - name to constructor mapping
//! - [`pipeline`] - ordered stages over ping-pong buffers
//! - [`config`] - YAML pipeline descriptions
//!
//! # Example
//!
//! ```rust,ignore
//! use hwpipe_ops::{Pipeline, PipelineConfig};
//!
//! // Smoothing then edge detection
//! let mut pipeline = PipelineConfig::basic().build_pipeline()?;
//! assert!(pipeline.run("input.ppm", "edges.ppm"));
//!
//! // Hand-assembled
//! let mut pipeline = Pipeline::new();
//! pipeline.add_stage_by_name("gaussian");
//! pipeline.add_stage_by_name("sharpen");
//! pipeline.try_run("input.ppm", "sharp.ppm")?;
//! ```
//!
//! # Border Policies
//!
//! | Filter | Interior | Border | Degenerate (`w <= 2 \|\| h <= 2`) |
//! |--------|----------|--------|-----------------------------------|
//! | Convolution | weighted sum per channel | copied | all border, copied |
//! | Smoothing | `⌊Σ9 red / 9⌋` | copied | copied |
//! | Edge | `min(255, \|gx\| + \|gy\|)` | black | black |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod color;
pub mod config;
pub mod convolution;
pub mod edge;
pub mod filter;
pub mod kernel;
pub mod numeric;
pub mod pipeline;
pub mod registry;
pub mod smoothing;

pub use config::{PipelineConfig, StageConfig};
pub use convolution::ConvolutionFilter;
pub use edge::EdgeFilter;
pub use error::{OpsError, OpsResult};
pub use filter::Filter;
pub use kernel::Kernel;
pub use numeric::NumericMode;
pub use pipeline::{Pipeline, StageEvent, StagePhase};
pub use registry::FilterRegistry;
pub use smoothing::SmoothingFilter;
