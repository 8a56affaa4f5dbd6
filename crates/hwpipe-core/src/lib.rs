//! # hwpipe-core
//!
//! Core types for the hwpipe filter datapath.
//!
//! - [`Pixel`] - 3-channel, 8-bit color sample with a fixed `#[repr(C)]` layout
//! - [`FrameBuffer`] - row-major pixel array of fixed geometry, owned or wrapped
//! - [`Error`] / [`Result`] - buffer management failures
//!
//! ## Crate Structure
//!
//! ```text
//! hwpipe-core (this crate)
//!    ^
//!    |
//!    +-- hwpipe-io  (text pixel-array decode/encode)
//!    +-- hwpipe-ops (filters, pipeline)
//!    +-- hwpipe-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod pixel;

pub use buffer::FrameBuffer;
pub use error::{Error, Result};
pub use pixel::Pixel;

/// Prelude module for convenient imports.
///
/// ```
/// use hwpipe_core::prelude::*;
///
/// let fb = FrameBuffer::new(2, 2).unwrap();
/// assert_eq!(fb.pixel(0, 0).unwrap(), Pixel::BLACK);
/// ```
pub mod prelude {
    pub use crate::buffer::FrameBuffer;
    pub use crate::error::{Error, Result};
    pub use crate::pixel::Pixel;
}
