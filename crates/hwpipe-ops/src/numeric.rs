//! Accumulation arithmetic for convolution.
//!
//! [`NumericMode::Float`] multiplies and accumulates in `f32`.
//! [`NumericMode::Fixed`] models a constrained hardware datapath: weights are
//! quantized to Q8 (scaled by [`FIXED_POINT_SCALE`] and rounded), products are
//! summed in `i64`, and the sum is shifted back down before clamping.

use crate::OpsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scale applied to kernel weights in fixed-point mode.
pub const FIXED_POINT_SCALE: i32 = 256;

/// Fractional bits of the fixed-point weights.
pub const FIXED_POINT_SHIFT: u32 = 8;

/// Arithmetic used by convolution filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericMode {
    /// `f32` multiply-accumulate, clamp, truncate.
    #[default]
    #[serde(alias = "floating")]
    Float,
    /// Q8 integer multiply-accumulate, floor shift, clamp.
    Fixed,
}

impl NumericMode {
    /// Lowercase mode name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for NumericMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumericMode {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "float" | "floating" => Ok(Self::Float),
            "fixed" => Ok(Self::Fixed),
            other => Err(OpsError::InvalidParameter(format!(
                "unknown numeric mode '{other}' (expected float or fixed)"
            ))),
        }
    }
}

/// Quantizes a weight to Q8.
#[inline]
pub fn to_fixed(weight: f32) -> i32 {
    (weight * FIXED_POINT_SCALE as f32).round() as i32
}

/// Clamps a float accumulator to `[0, 255]` and truncates.
#[inline]
pub fn clamp_float(sum: f32) -> u8 {
    sum.clamp(0.0, 255.0) as u8
}

/// Shifts a Q8 accumulator back to integer scale (floor) and clamps.
#[inline]
pub fn clamp_fixed(sum: i64) -> u8 {
    (sum >> FIXED_POINT_SHIFT).clamp(0, 255) as u8
}

/// Clamps an integer accumulator to `[0, 255]`.
#[inline]
pub fn clamp_int(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}
