//! The 8-bit RGB sample every frame buffer is made of.
//!
//! # Memory Layout
//!
//! [`Pixel`] is `#[repr(C)]` with three `u8` fields, so a `[Pixel]` slice is a
//! tightly packed `R G B R G B ...` byte stream, exactly what a hardware frame
//! buffer would hold.
//!
//! ```
//! use hwpipe_core::Pixel;
//!
//! let p = Pixel::new(255, 128, 0);
//! assert_eq!(std::mem::size_of::<Pixel>(), 3);
//! assert!(!p.is_gray());
//! assert!(Pixel::gray(42).is_gray());
//! ```

use std::fmt;

/// A three-channel, 8-bit color sample.
///
/// Channel values are always in `[0, 255]`. Filters that accumulate beyond
/// that range clamp before they store back into a `Pixel`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    /// Red channel value.
    pub r: u8,
    /// Green channel value.
    pub g: u8,
    /// Blue channel value.
    pub b: u8,
}

impl Pixel {
    /// All channels zero.
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);

    /// All channels at full intensity.
    pub const WHITE: Pixel = Pixel::new(255, 255, 255);

    /// Create a new pixel.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a pixel with the same value replicated to all three channels.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Returns `true` when `r == g == b`.
    #[inline]
    pub const fn is_gray(&self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// Channels as an `[r, g, b]` array.
    #[inline]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Pixel {
    #[inline]
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Pixel> for [u8; 3] {
    #[inline]
    fn from(p: Pixel) -> Self {
        p.to_array()
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}
