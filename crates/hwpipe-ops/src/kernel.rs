//! Square convolution kernels.
//!
//! # Kernels
//!
//! - [`Kernel::gaussian`] - normalized Gaussian blur
//! - [`Kernel::sharpen`] - 4-neighbour sharpen
//! - [`Kernel::sobel_x`] / [`Kernel::sobel_y`] - directional gradients
//! - [`Kernel::box_blur`] - simple average
//! - [`Kernel::identity`] - passes the centre sample through
//!
//! # Example
//!
//! ```rust
//! use hwpipe_ops::kernel::Kernel;
//!
//! let k = Kernel::gaussian(5, 1.0).unwrap();
//! assert_eq!(k.size(), 5);
//! assert_eq!(k.radius(), 2);
//! assert!((k.sum() - 1.0).abs() < 1e-4);
//! ```

use crate::{OpsError, OpsResult};
use std::f32::consts::PI;
use std::fmt;
use tracing::trace;

/// Side length of [`Kernel::default_gaussian`].
pub const DEFAULT_GAUSSIAN_SIZE: usize = 5;

/// Sigma of [`Kernel::default_gaussian`].
pub const DEFAULT_GAUSSIAN_SIGMA: f32 = 1.0;

/// Largest accepted side length.
pub const MAX_KERNEL_SIZE: usize = 1023;

/// Validates an odd side length and returns the weight count.
fn checked_count(size: usize, what: &str) -> OpsResult<usize> {
    if size == 0 || size % 2 == 0 {
        return Err(OpsError::InvalidKernel(format!(
            "{what} size must be odd and >= 1, got {size}"
        )));
    }
    if size > MAX_KERNEL_SIZE {
        return Err(OpsError::InvalidKernel(format!(
            "{what} size {size} exceeds {MAX_KERNEL_SIZE}"
        )));
    }
    size.checked_mul(size)
        .ok_or_else(|| OpsError::InvalidKernel(format!("{what} size {size} overflows")))
}

/// Raw Gaussian weights, normalized by their sum.
fn gaussian_weights(size: usize, sigma: f32) -> Vec<f32> {
    let half = (size / 2) as i32;
    let two_sigma2 = 2.0 * sigma * sigma;
    let norm = 1.0 / (PI * two_sigma2);

    let mut weights = Vec::with_capacity(size * size);
    let mut sum = 0.0f32;
    for y in -half..=half {
        for x in -half..=half {
            let d = (x * x + y * y) as f32;
            let w = norm * (-d / two_sigma2).exp();
            weights.push(w);
            sum += w;
        }
    }
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Immutable odd-sized square matrix of weights.
///
/// Weights are stored row-major; `radius` is `size / 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    radius: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Creates a kernel from row-major weights.
    ///
    /// `size` must be odd, between 1 and [`MAX_KERNEL_SIZE`], and `weights`
    /// must hold exactly `size * size` finite values.
    pub fn new(weights: Vec<f32>, size: usize) -> OpsResult<Self> {
        let count = checked_count(size, "kernel")?;
        if weights.len() != count {
            return Err(OpsError::InvalidKernel(format!(
                "{} weights don't match {size}x{size}",
                weights.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(OpsError::InvalidKernel("weights must be finite".into()));
        }
        Ok(Self {
            size,
            radius: size / 2,
            weights,
        })
    }

    /// Gaussian kernel, `exp(-(x²+y²)/2σ²) / 2πσ²`, normalized to sum to 1.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hwpipe_ops::kernel::Kernel;
    ///
    /// let k = Kernel::gaussian(3, 0.8).unwrap();
    /// assert!(k.weight(1, 1) > k.weight(0, 0));
    /// assert!(Kernel::gaussian(4, 1.0).is_err());
    /// ```
    pub fn gaussian(size: usize, sigma: f32) -> OpsResult<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(OpsError::InvalidParameter(format!(
                "gaussian sigma must be > 0, got {sigma}"
            )));
        }
        checked_count(size, "gaussian")?;
        trace!(size, sigma, "gaussian kernel");
        // Extreme sigmas underflow to NaN weights, which `new` rejects.
        Self::new(gaussian_weights(size, sigma), size)
    }

    /// The 5x5, sigma 1.0 Gaussian used by the built-in `gaussian` stage.
    pub fn default_gaussian() -> Self {
        Self {
            size: DEFAULT_GAUSSIAN_SIZE,
            radius: DEFAULT_GAUSSIAN_SIZE / 2,
            weights: gaussian_weights(DEFAULT_GAUSSIAN_SIZE, DEFAULT_GAUSSIAN_SIGMA),
        }
    }

    /// 3x3 sharpen: centre 5, 4-neighbours -1.
    pub fn sharpen() -> Self {
        Self::fixed3([
            0.0, -1.0, 0.0,
            -1.0, 5.0, -1.0,
            0.0, -1.0, 0.0,
        ])
    }

    /// 3x3 Sobel horizontal gradient.
    pub fn sobel_x() -> Self {
        Self::fixed3([
            -1.0, 0.0, 1.0,
            -2.0, 0.0, 2.0,
            -1.0, 0.0, 1.0,
        ])
    }

    /// 3x3 Sobel vertical gradient.
    pub fn sobel_y() -> Self {
        Self::fixed3([
            -1.0, -2.0, -1.0,
            0.0, 0.0, 0.0,
            1.0, 2.0, 1.0,
        ])
    }

    /// 3x3 box blur.
    pub fn box3() -> Self {
        Self::fixed3([1.0 / 9.0; 9])
    }

    /// Box blur (equal weights summing to 1).
    pub fn box_blur(size: usize) -> OpsResult<Self> {
        let count = checked_count(size, "box")?;
        Self::new(vec![1.0 / count as f32; count], size)
    }

    /// Kernel with a single 1 in the centre.
    pub fn identity(size: usize) -> OpsResult<Self> {
        let count = checked_count(size, "identity")?;
        let mut weights = vec![0.0; count];
        weights[count / 2] = 1.0;
        Self::new(weights, size)
    }

    fn fixed3(weights: [f32; 9]) -> Self {
        Self {
            size: 3,
            radius: 1,
            weights: weights.to_vec(),
        }
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// `size / 2`.
    #[inline]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Row-major weights.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight at column `kx`, row `ky` (both `0..size`).
    #[inline]
    pub fn weight(&self, kx: usize, ky: usize) -> f32 {
        self.weights[ky * self.size + kx]
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Kernel {0}x{0} (radius {1})", self.size, self.radius)?;
        for row in self.weights.chunks(self.size) {
            let cells: Vec<String> = row.iter().map(|w| format!("{w:8.4}")).collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_new_validates() {
        assert!(Kernel::new(vec![1.0; 4], 2).is_err());
        assert!(Kernel::new(vec![], 0).is_err());
        assert!(Kernel::new(vec![1.0; 8], 3).is_err());
        assert!(Kernel::new(vec![f32::NAN; 1], 1).is_err());

        let k = Kernel::new(vec![0.5], 1).unwrap();
        assert_eq!(k.radius(), 0);
    }

    #[test]
    fn test_gaussian_normalized() {
        for size in [1, 3, 5, 7, 9, 15] {
            for sigma in [0.3, 1.0, 2.5, 10.0] {
                let k = Kernel::gaussian(size, sigma).unwrap();
                assert_eq!(k.weights().len(), size * size);
                assert_abs_diff_eq!(k.sum(), 1.0, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_default_gaussian() {
        assert_eq!(Kernel::default_gaussian(), Kernel::gaussian(5, 1.0).unwrap());
        assert_abs_diff_eq!(Kernel::box3().sum(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_gaussian_shape() {
        let k = Kernel::gaussian(5, 1.0).unwrap();
        // Centre highest, symmetric
        assert!(k.weight(2, 2) > k.weight(1, 2));
        assert!(k.weight(1, 2) > k.weight(0, 0));
        assert_abs_diff_eq!(k.weight(0, 1), k.weight(4, 3), epsilon = 1e-7);
        assert_abs_diff_eq!(k.weight(1, 0), k.weight(0, 1), epsilon = 1e-7);
    }

    #[test]
    fn test_gaussian_rejects_bad_params() {
        assert!(matches!(Kernel::gaussian(5, 0.0), Err(OpsError::InvalidParameter(_))));
        assert!(matches!(Kernel::gaussian(5, -1.0), Err(OpsError::InvalidParameter(_))));
        assert!(matches!(Kernel::gaussian(6, 1.0), Err(OpsError::InvalidKernel(_))));
    }

    #[test]
    fn test_fixed_kernels() {
        assert_abs_diff_eq!(Kernel::sharpen().sum(), 1.0);
        assert_abs_diff_eq!(Kernel::sobel_x().sum(), 0.0);
        assert_abs_diff_eq!(Kernel::sobel_y().sum(), 0.0);
        assert_eq!(Kernel::sobel_x().weight(2, 1), 2.0);
        assert_eq!(Kernel::sobel_y().weight(1, 0), -2.0);
    }

    #[test]
    fn test_box_and_identity() {
        let b = Kernel::box_blur(3).unwrap();
        assert_abs_diff_eq!(b.sum(), 1.0, epsilon = 1e-6);
        assert!(Kernel::box_blur(4).is_err());

        let i = Kernel::identity(5).unwrap();
        assert_eq!(i.weight(2, 2), 1.0);
        assert_eq!(i.sum(), 1.0);
    }

    #[test]
    fn test_oversized_kernels_rejected() {
        let huge = 4_294_967_297;
        assert!(matches!(Kernel::new(vec![1.0], huge), Err(OpsError::InvalidKernel(_))));
        assert!(matches!(Kernel::box_blur(huge), Err(OpsError::InvalidKernel(_))));
        assert!(matches!(Kernel::identity(usize::MAX), Err(OpsError::InvalidKernel(_))));
        assert!(matches!(Kernel::gaussian(huge, 1.0), Err(OpsError::InvalidKernel(_))));
        assert!(Kernel::box_blur(MAX_KERNEL_SIZE + 2).is_err());
        assert_eq!(Kernel::identity(MAX_KERNEL_SIZE).unwrap().size(), MAX_KERNEL_SIZE);
    }

    #[test]
    fn test_display() {
        let text = Kernel::sobel_x().to_string();
        assert!(text.starts_with("Kernel 3x3 (radius 1)\n"));
        assert_eq!(text.lines().count(), 4);
    }
}
