//! Sobel gradient magnitude on the red-channel intensity.
//!
//! `gx` and `gy` are taken against the 3x3 Sobel kernels in integer
//! arithmetic, and the magnitude is the Manhattan approximation
//! `min(255, |gx| + |gy|)`, replicated to all channels. Unlike the blur
//! filters, the one-pixel border is forced to black. Frames with
//! `width <= 2` or `height <= 2` come out entirely black.

use crate::filter::ensure_same_size;
use crate::{Filter, OpsResult};
use hwpipe_core::{FrameBuffer, Pixel};
use tracing::trace;

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Sobel edge detector with black borders.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeFilter;

impl EdgeFilter {
    /// Creates the filter.
    pub fn new() -> Self {
        Self
    }
}

impl Filter for EdgeFilter {
    fn name(&self) -> &str {
        "edge"
    }

    fn apply(&self, input: &FrameBuffer<'_>, output: &mut FrameBuffer<'_>) -> OpsResult<()> {
        ensure_same_size(input, output)?;
        let (width, height) = input.dimensions();
        output.clear();
        if width <= 2 || height <= 2 {
            trace!(width, height, "edge: degenerate frame, black fill");
            return Ok(());
        }

        let w = width as usize;
        let h = height as usize;
        let src = input.pixels();
        let out = output.pixels_mut();

        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let (mut gx, mut gy) = (0i32, 0i32);
                for ky in 0..3 {
                    let row = (y + ky - 1) * w + x - 1;
                    for kx in 0..3 {
                        let v = src[row + kx].r as i32;
                        gx += v * SOBEL_X[ky][kx];
                        gy += v * SOBEL_Y[ky][kx];
                    }
                }
                let mag = (gx.abs() + gy.abs()).min(255) as u8;
                out[y * w + x] = Pixel::gray(mag);
            }
        }
        Ok(())
    }
}
