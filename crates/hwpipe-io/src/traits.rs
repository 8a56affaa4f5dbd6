//! I/O traits for frame readers and writers.
//!
//! These traits define the interface for format-specific implementations.

use crate::IoResult;
use hwpipe_core::FrameBuffer;
use std::path::Path;

/// Trait for image format readers.
///
/// A reader produces a freshly allocated, owned [`FrameBuffer`] sized to the
/// decoded geometry.
///
/// # Example
///
/// ```rust,ignore
/// use hwpipe_io::{ImageReader, IoResult};
/// use hwpipe_core::FrameBuffer;
///
/// struct MyFormatReader;
///
/// impl ImageReader for MyFormatReader {
///     fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<FrameBuffer<'static>> {
///         // Read implementation
///     }
///
///     fn read_from_memory(&self, data: &[u8]) -> IoResult<FrameBuffer<'static>> {
///         // Memory read implementation
///     }
/// }
/// ```
pub trait ImageReader {
    /// Reads an image from a file path.
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<FrameBuffer<'static>>;

    /// Reads an image from memory.
    fn read_from_memory(&self, data: &[u8]) -> IoResult<FrameBuffer<'static>>;
}

/// Trait for image format writers.
pub trait ImageWriter {
    /// Writes an image to a file path.
    fn write<P: AsRef<Path>>(&self, path: P, frame: &FrameBuffer<'_>) -> IoResult<()>;

    /// Writes an image to memory.
    fn write_to_memory(&self, frame: &FrameBuffer<'_>) -> IoResult<Vec<u8>>;
}
