//! Fixed 3x3 box blur on the red-channel intensity.
//!
//! Input is expected to be grayscale already, so the red channel stands in
//! for intensity. Each interior pixel becomes `⌊Σ9 red / 9⌋` replicated to
//! all channels; the one-pixel border is copied from input. Frames with
//! `width <= 2` or `height <= 2` have no interior and are copied unchanged.

use crate::filter::{ensure_same_size, sweep_interior_copy_border};
use crate::{Filter, OpsResult};
use hwpipe_core::{FrameBuffer, Pixel};
use tracing::trace;

/// 3x3 average of the red channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothingFilter;

impl SmoothingFilter {
    /// Creates the filter.
    pub fn new() -> Self {
        Self
    }
}

impl Filter for SmoothingFilter {
    fn name(&self) -> &str {
        "smooth"
    }

    fn apply(&self, input: &FrameBuffer<'_>, output: &mut FrameBuffer<'_>) -> OpsResult<()> {
        ensure_same_size(input, output)?;
        let (width, height) = input.dimensions();
        if width <= 2 || height <= 2 {
            trace!(width, height, "smooth: degenerate frame, copying");
            output.copy_from(input.pixels())?;
            return Ok(());
        }

        let w = width as usize;
        let src = input.pixels();
        sweep_interior_copy_border(input, output, 1, |x, y| {
            let mut sum = 0u32;
            for row in [(y - 1) * w, y * w, (y + 1) * w] {
                sum += src[row + x - 1..=row + x + 1].iter().map(|p| p.r as u32).sum::<u32>();
            }
            Pixel::gray((sum / 9) as u8)
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_5x5_unchanged() {
        let input = FrameBuffer::from_pixels(5, 5, vec![Pixel::WHITE; 25]).unwrap();
        let mut output = FrameBuffer::new(5, 5).unwrap();
        SmoothingFilter.apply(&input, &mut output).unwrap();
        assert_eq!(output.pixels(), input.pixels());
    }

    #[test]
    fn test_interior_is_floor_average_of_red() {
        let pixels: Vec<Pixel> = (0..20u8)
            .map(|i| Pixel::new(i * 12, 255 - i, i))
            .collect();
        let input = FrameBuffer::from_pixels(5, 4, pixels.clone()).unwrap();
        let mut output = FrameBuffer::new(5, 4).unwrap();
        SmoothingFilter.apply(&input, &mut output).unwrap();

        for y in 1..3usize {
            for x in 1..4usize {
                let mut sum = 0u32;
                for dy in 0..3 {
                    for dx in 0..3 {
                        sum += pixels[(y + dy - 1) * 5 + x + dx - 1].r as u32;
                    }
                }
                let got = output.pixel(x as u32, y as u32).unwrap();
                assert_eq!(got, Pixel::gray((sum / 9) as u8));
                assert!(got.is_gray());
            }
        }
        // Border copied verbatim, colour and all
        assert_eq!(output.pixel(0, 0).unwrap(), pixels[0]);
        assert_eq!(output.pixel(4, 3).unwrap(), pixels[19]);
    }

    #[test]
    fn test_degenerate_copies() {
        for (w, h) in [(2, 2), (1, 5), (7, 2)] {
            let pixels: Vec<Pixel> = (0..w * h).map(|i| Pixel::new(i as u8, 3, 200)).collect();
            let input = FrameBuffer::from_pixels(w, h, pixels).unwrap();
            let mut output = FrameBuffer::new(w, h).unwrap();
            SmoothingFilter.apply(&input, &mut output).unwrap();
            assert_eq!(output.pixels(), input.pixels());
        }
    }

    #[test]
    fn test_dimensions_preserved() {
        let input = FrameBuffer::new(3, 3).unwrap();
        let mut output = FrameBuffer::new(3, 3).unwrap();
        SmoothingFilter.apply(&input, &mut output).unwrap();
        assert_eq!(output.dimensions(), (3, 3));

        let mut wrong = FrameBuffer::new(4, 3).unwrap();
        assert!(SmoothingFilter.apply(&input, &mut wrong).is_err());
    }
}
