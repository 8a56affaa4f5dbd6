//! # hwpipe-io
//!
//! Frame I/O for the hwpipe filter datapath.
//!
//! Images travel in and out of the pipeline as plain-text Netpbm files:
//!
//! - **PPM `P3`** - RGB triples, the default output format
//! - **PGM `P2`** - single grayscale sample per pixel
//!
//! # Architecture
//!
//! - [`ImageReader`] - Trait for format readers
//! - [`ImageWriter`] - Trait for format writers
//! - [`registry::FormatRegistry`] - magic/extension detection and dispatch
//! - [`read`] / [`write`] - High-level functions with format auto-detection
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hwpipe_io::{read, write};
//!
//! let frame = read("input.ppm")?;
//! write("output.ppm", &frame)?;
//! ```
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Extensions |
//! |--------|------|-------|------------|
//! | PPM `P3` | Yes | Yes | ppm, pnm |
//! | PGM `P2` | Yes | Yes | pgm |
//!
//! Binary `P5`/`P6` files are reported as [`IoError::UnsupportedFormat`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod traits;
pub mod pnm;
pub mod registry;

pub use error::{IoError, IoResult};
pub use pnm::{PnmKind, PnmReader, PnmWriter};
pub use traits::{ImageReader, ImageWriter};

use hwpipe_core::FrameBuffer;
use std::path::Path;

/// Reads an image from a file, auto-detecting the format.
///
/// The format is detected by magic bytes first, then by file extension.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The format is not supported
/// - The header or pixel stream is malformed
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<FrameBuffer<'static>> {
    registry::FormatRegistry::global().read(path.as_ref())
}

/// Writes an image to a file, detecting format from extension.
///
/// Paths without a registered extension are written as PPM `P3`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write<P: AsRef<Path>>(path: P, frame: &FrameBuffer<'_>) -> IoResult<()> {
    registry::FormatRegistry::global().write(path.as_ref(), frame)
}
