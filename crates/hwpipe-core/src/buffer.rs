//! Frame buffer: a fixed-size, row-major array of [`Pixel`]s.
//!
//! A [`FrameBuffer`] either owns its pixel storage or wraps memory that
//! belongs to the caller. In both cases the geometry is fixed for the
//! buffer's lifetime; a buffer is never resized, only replaced.
//!
//! # Memory Layout
//!
//! ```text
//! index(x, y) = y * width + x
//!
//! [P(0,0) P(1,0) ... P(w-1,0)]  <- row 0
//! [P(0,1) P(1,1) ... P(w-1,1)]  <- row 1
//! ...
//! ```
//!
//! `capacity()` is always `width * height * size_of::<Pixel>()` bytes.
//!
//! # Ownership
//!
//! | Constructor | Storage | `owns_memory()` |
//! |-------------|---------|-----------------|
//! | [`FrameBuffer::new`] | freshly allocated, black | `true` |
//! | [`FrameBuffer::from_pixels`] | takes the `Vec` | `true` |
//! | [`FrameBuffer::wrap`] | borrows `&mut [Pixel]` | `false` |
//!
//! Owned storage is released exactly once when the buffer is dropped;
//! wrapped storage is left untouched.
//!
//! # Example
//!
//! ```rust
//! use hwpipe_core::{FrameBuffer, Pixel};
//!
//! let mut fb = FrameBuffer::new(4, 3).unwrap();
//! fb.set_pixel(1, 2, Pixel::WHITE).unwrap();
//! assert_eq!(fb.pixel(1, 2).unwrap(), Pixel::WHITE);
//! assert_eq!(fb.capacity(), 4 * 3 * 3);
//! ```

use crate::{Error, Pixel, Result};
use std::mem::size_of;
use tracing::{debug, info, trace};

/// Backing store of a frame buffer.
enum Storage<'a> {
    Owned(Vec<Pixel>),
    Wrapped(&'a mut [Pixel]),
}

/// Fixed-geometry pixel buffer, owned or wrapping caller memory.
pub struct FrameBuffer<'a> {
    storage: Storage<'a>,
    width: u32,
    height: u32,
}

/// Validates geometry and returns the pixel count.
fn pixel_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(width, height, "width and height must be > 0"));
    }
    let count = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows"))?;
    count
        .checked_mul(size_of::<Pixel>())
        .ok_or_else(|| Error::invalid_dimensions(width, height, "byte size overflows"))?;
    Ok(count)
}

impl FrameBuffer<'static> {
    /// Allocates a black buffer of `width * height` pixels.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] for zero or overflowing geometry
    /// - [`Error::AllocationFailed`] if the allocator refuses the request
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let count = pixel_count(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(count)
            .map_err(|e| Error::allocation_failed(count * size_of::<Pixel>(), e.to_string()))?;
        data.resize(count, Pixel::BLACK);

        debug!(width, height, bytes = count * size_of::<Pixel>(), "FrameBuffer allocated");
        Ok(Self {
            storage: Storage::Owned(data),
            width,
            height,
        })
    }

    /// Takes ownership of an existing pixel vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `data.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, data: Vec<Pixel>) -> Result<Self> {
        let count = pixel_count(width, height)?;
        if data.len() != count {
            return Err(Error::dimension_mismatch(count, data.len()));
        }
        trace!(width, height, "FrameBuffer took ownership of pixel data");
        Ok(Self {
            storage: Storage::Owned(data),
            width,
            height,
        })
    }
}

impl<'a> FrameBuffer<'a> {
    /// Wraps caller-owned memory without taking ownership.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `data.len() != width * height`.
    pub fn wrap(data: &'a mut [Pixel], width: u32, height: u32) -> Result<Self> {
        let count = pixel_count(width, height)?;
        if data.len() != count {
            return Err(Error::dimension_mismatch(count, data.len()));
        }
        trace!(width, height, "FrameBuffer wrapped existing memory");
        Ok(Self {
            storage: Storage::Wrapped(data),
            width,
            height,
        })
    }

    /// Buffer width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels().len()
    }

    /// Always `false`: zero-sized buffers cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the pixel storage in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.len() * size_of::<Pixel>()
    }

    /// Whether dropping this buffer releases its storage.
    #[inline]
    pub fn owns_memory(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    /// Pixel data, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        match &self.storage {
            Storage::Owned(v) => v,
            Storage::Wrapped(s) => s,
        }
    }

    /// Mutable pixel data, row-major.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        match &mut self.storage {
            Storage::Owned(v) => v,
            Storage::Wrapped(s) => s,
        }
    }

    /// Linear index of `(x, y)`. Does not check bounds.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Reads the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Result<Pixel> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        Ok(self.pixels()[self.index(x, y)])
    }

    /// Writes the pixel at `(x, y)`.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: Pixel) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        let idx = self.index(x, y);
        self.pixels_mut()[idx] = value;
        Ok(())
    }

    /// Sets every pixel to black.
    pub fn clear(&mut self) {
        self.pixels_mut().fill(Pixel::BLACK);
        trace!("FrameBuffer cleared");
    }

    /// Copies `source` into this buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the lengths differ.
    pub fn copy_from(&mut self, source: &[Pixel]) -> Result<()> {
        if source.len() != self.len() {
            return Err(Error::dimension_mismatch(self.len(), source.len()));
        }
        self.pixels_mut().copy_from_slice(source);
        trace!("FrameBuffer copied from source");
        Ok(())
    }

    /// Copies this buffer into `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the lengths differ.
    pub fn copy_to(&self, dest: &mut [Pixel]) -> Result<()> {
        if dest.len() != self.len() {
            return Err(Error::dimension_mismatch(self.len(), dest.len()));
        }
        dest.copy_from_slice(self.pixels());
        trace!("FrameBuffer copied to destination");
        Ok(())
    }

    /// Returns `true` if `other` has the same width and height.
    #[inline]
    pub fn same_dimensions(&self, other: &FrameBuffer<'_>) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Allocates an owned copy of this buffer.
    pub fn try_clone_owned(&self) -> Result<FrameBuffer<'static>> {
        let mut copy = FrameBuffer::new(self.width, self.height)?;
        copy.copy_from(self.pixels())?;
        Ok(copy)
    }

    /// Consumes the buffer and returns its pixels.
    ///
    /// Wrapped buffers return a copy; the caller's memory is not touched.
    pub fn into_pixels(mut self) -> Vec<Pixel> {
        match &mut self.storage {
            Storage::Owned(v) => std::mem::take(v),
            Storage::Wrapped(s) => s.to_vec(),
        }
    }

    /// Logs geometry and ownership at `info` level.
    pub fn dump_info(&self) {
        info!(
            width = self.width,
            height = self.height,
            pixels = self.len(),
            capacity = self.capacity(),
            owned = self.owns_memory(),
            "FrameBuffer info"
        );
    }
}

impl Drop for FrameBuffer<'_> {
    fn drop(&mut self) {
        if let Storage::Owned(v) = &self.storage {
            if !v.is_empty() {
                trace!(width = self.width, height = self.height, "FrameBuffer released");
            }
        }
    }
}

impl std::fmt::Debug for FrameBuffer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("owns_memory", &self.owns_memory())
            .finish()
    }
}
