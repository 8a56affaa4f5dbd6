//! Generic weighted-kernel convolution.
//!
//! For every interior pixel `(x, y)` with `radius <= x < width - radius` and
//! `radius <= y < height - radius`, each channel independently receives
//!
//! ```text
//! sum = Σ input[(y+ky)*width + (x+kx)].c * kernel[ky+radius][kx+radius]
//! ```
//!
//! clamped to `[0, 255]`. Pixels within `radius` of any edge are copied from
//! the input unchanged (no zero padding, no mirroring).
//!
//! # Example
//!
//! ```rust
//! use hwpipe_core::{FrameBuffer, Pixel};
//! use hwpipe_ops::{ConvolutionFilter, Filter};
//!
//! let input = FrameBuffer::from_pixels(4, 4, vec![Pixel::gray(80); 16]).unwrap();
//! let mut output = FrameBuffer::new(4, 4).unwrap();
//! ConvolutionFilter::gaussian(3, 1.0).unwrap().apply(&input, &mut output).unwrap();
//! assert_eq!(output.pixel(1, 1).unwrap(), Pixel::gray(80));
//! ```

use crate::filter::{ensure_same_size, sweep_interior_copy_border};
use crate::kernel::Kernel;
use crate::numeric::{clamp_fixed, clamp_float, to_fixed, NumericMode};
use crate::{Filter, OpsResult};
use hwpipe_core::{FrameBuffer, Pixel};
use tracing::trace;

/// Convolution with an arbitrary odd-sized kernel.
#[derive(Debug, Clone)]
pub struct ConvolutionFilter {
    kernel: Kernel,
    mode: NumericMode,
}

impl ConvolutionFilter {
    /// Creates a float-mode filter from a kernel.
    pub fn new(kernel: Kernel) -> Self {
        Self {
            kernel,
            mode: NumericMode::Float,
        }
    }

    /// Sets the accumulation arithmetic.
    pub fn with_mode(mut self, mode: NumericMode) -> Self {
        self.mode = mode;
        self
    }

    /// Gaussian blur of the given odd size.
    pub fn gaussian(size: usize, sigma: f32) -> OpsResult<Self> {
        Ok(Self::new(Kernel::gaussian(size, sigma)?))
    }

    /// 3x3 sharpen.
    pub fn sharpen() -> Self {
        Self::new(Kernel::sharpen())
    }

    /// 3x3 Sobel X. Negative responses clamp to 0.
    pub fn sobel_x() -> Self {
        Self::new(Kernel::sobel_x())
    }

    /// 3x3 Sobel Y. Negative responses clamp to 0.
    pub fn sobel_y() -> Self {
        Self::new(Kernel::sobel_y())
    }

    /// Box blur of the given odd size.
    pub fn box_blur(size: usize) -> OpsResult<Self> {
        Ok(Self::new(Kernel::box_blur(size)?))
    }

    /// The kernel.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// The accumulation arithmetic.
    pub fn mode(&self) -> NumericMode {
        self.mode
    }
}

impl Filter for ConvolutionFilter {
    fn name(&self) -> &str {
        "convolution"
    }

    fn apply(&self, input: &FrameBuffer<'_>, output: &mut FrameBuffer<'_>) -> OpsResult<()> {
        ensure_same_size(input, output)?;
        let (width, height) = input.dimensions();
        let size = self.kernel.size();
        let radius = self.kernel.radius();
        trace!(width, height, size, radius, mode = %self.mode, "convolve");

        let w = width as usize;
        let src = input.pixels();

        match self.mode {
            NumericMode::Float => {
                let weights = self.kernel.weights();
                sweep_interior_copy_border(input, output, radius, |x, y| {
                    let (mut r, mut g, mut b) = (0.0f32, 0.0f32, 0.0f32);
                    for ky in 0..size {
                        let row = (y + ky - radius) * w + x - radius;
                        for (kx, &k) in weights[ky * size..(ky + 1) * size].iter().enumerate() {
                            let p = src[row + kx];
                            r += p.r as f32 * k;
                            g += p.g as f32 * k;
                            b += p.b as f32 * k;
                        }
                    }
                    Pixel::new(clamp_float(r), clamp_float(g), clamp_float(b))
                });
            }
            NumericMode::Fixed => {
                let weights: Vec<i64> =
                    self.kernel.weights().iter().map(|&k| to_fixed(k) as i64).collect();
                sweep_interior_copy_border(input, output, radius, |x, y| {
                    let (mut r, mut g, mut b) = (0i64, 0i64, 0i64);
                    for ky in 0..size {
                        let row = (y + ky - radius) * w + x - radius;
                        for (kx, &k) in weights[ky * size..(ky + 1) * size].iter().enumerate() {
                            let p = src[row + kx];
                            r += p.r as i64 * k;
                            g += p.g as i64 * k;
                            b += p.b as i64 * k;
                        }
                    }
                    Pixel::new(clamp_fixed(r), clamp_fixed(g), clamp_fixed(b))
                });
            }
        }
        Ok(())
    }
}
