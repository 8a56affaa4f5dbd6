//! The [`Filter`] trait shared by every pipeline stage.
//!
//! A filter is a stateless-per-call neighbourhood transform: it reads one
//! buffer and writes another of identical geometry. Filters own no buffers.
//! Because `input` is shared and `output` is exclusive, the two can never
//! alias.

use crate::{OpsError, OpsResult};
use hwpipe_core::FrameBuffer;

/// One neighbourhood transform.
///
/// Implementations must write every output pixel.
pub trait Filter {
    /// Short stage name used in logs and stage callbacks.
    fn name(&self) -> &str;

    /// Transforms `input` into `output`.
    ///
    /// # Errors
    ///
    /// [`OpsError::SizeMismatch`] if the buffers differ in geometry.
    fn apply(&self, input: &FrameBuffer<'_>, output: &mut FrameBuffer<'_>) -> OpsResult<()>;
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn apply(&self, input: &FrameBuffer<'_>, output: &mut FrameBuffer<'_>) -> OpsResult<()> {
        (**self).apply(input, output)
    }
}

/// Fails unless both buffers have the same width and height.
pub(crate) fn ensure_same_size(input: &FrameBuffer<'_>, output: &FrameBuffer<'_>) -> OpsResult<()> {
    if input.same_dimensions(output) {
        return Ok(());
    }
    let (input_w, input_h) = input.dimensions();
    let (output_w, output_h) = output.dimensions();
    Err(OpsError::SizeMismatch {
        input_w,
        input_h,
        output_w,
        output_h,
    })
}

/// Writes `f(x, y)` into interior pixels and copies the border from input.
///
/// The border is copied in a second full pass over the buffer, so a
/// `radius` larger than half the image copies everything.
pub(crate) fn sweep_interior_copy_border(
    input: &FrameBuffer<'_>,
    output: &mut FrameBuffer<'_>,
    radius: usize,
    mut f: impl FnMut(usize, usize) -> hwpipe_core::Pixel,
) {
    let (w, h) = (input.width() as usize, input.height() as usize);
    let out = output.pixels_mut();

    if w > 2 * radius && h > 2 * radius {
        for y in radius..h - radius {
            let row = y * w;
            for x in radius..w - radius {
                out[row + x] = f(x, y);
            }
        }
    }

    let src = input.pixels();
    for y in 0..h {
        let row = y * w;
        for x in 0..w {
            if x < radius || x + radius >= w || y < radius || y + radius >= h {
                out[row + x] = src[row + x];
            }
        }
    }
}
