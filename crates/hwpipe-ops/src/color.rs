//! Luminance-weighted grayscale reduction.
//!
//! Uses the Rec. 601 weights `0.299 R + 0.587 G + 0.114 B`, evaluated as
//! `(299 R + 587 G + 114 B) / 1000` in integers. The result is replicated to
//! all three channels, and since the weights sum to exactly 1000 a gray pixel
//! maps to itself, so the conversion is idempotent.

use hwpipe_core::{FrameBuffer, Pixel};
use tracing::trace;

/// Integer luminance of a pixel (floor of the weighted sum).
#[inline]
pub fn luminance(p: Pixel) -> u8 {
    let y = 299 * p.r as u32 + 587 * p.g as u32 + 114 * p.b as u32;
    (y / 1000) as u8
}

/// Replaces every pixel with its luminance on all channels.
pub fn convert_to_grayscale(frame: &mut FrameBuffer<'_>) {
    trace!(width = frame.width(), height = frame.height(), "grayscale");
    for p in frame.pixels_mut() {
        *p = Pixel::gray(luminance(*p));
    }
}
