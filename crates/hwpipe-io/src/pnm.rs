//! Plain-text Netpbm formats: PPM `P3` (RGB) and PGM `P2` (grayscale).
//!
//! # Layout
//!
//! ```text
//! P3            <- magic
//! # comment     <- '#' to end of line, allowed between any tokens
//! 4 2           <- width height
//! 255           <- maxval (1..=255)
//! r g b r g b ...  <- width*height triples, row-major
//! ```
//!
//! `P2` is identical except that each pixel is a single sample, which is
//! replicated to all three channels on decode. Samples are rescaled to the
//! 0..=255 range when `maxval < 255`.
//!
//! The binary variants (`P5`, `P6`) are rejected as unsupported.

use crate::{ImageReader, ImageWriter, IoError, IoResult};
use hwpipe_core::{FrameBuffer, Pixel};
use std::path::Path;
use tracing::{debug, trace};

/// Plain-text Netpbm variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnmKind {
    /// `P3`: three samples per pixel.
    Pixmap,
    /// `P2`: one sample per pixel.
    Graymap,
}

impl PnmKind {
    /// Magic token that opens a file of this kind.
    pub fn magic(self) -> &'static str {
        match self {
            Self::Pixmap => "P3",
            Self::Graymap => "P2",
        }
    }

    /// Parses a magic token.
    pub fn from_magic(magic: &str) -> Option<Self> {
        match magic {
            "P3" => Some(Self::Pixmap),
            "P2" => Some(Self::Graymap),
            _ => None,
        }
    }

    /// Samples stored per pixel.
    pub fn samples_per_pixel(self) -> usize {
        match self {
            Self::Pixmap => 3,
            Self::Graymap => 1,
        }
    }
}

/// Whitespace-separated tokens with `#` comments stripped.
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| line.split_once('#').map_or(line, |(head, _)| head))
        .flat_map(str::split_whitespace)
}

fn header_value<'a>(tokens: &mut impl Iterator<Item = &'a str>, field: &str) -> IoResult<u32> {
    let token = tokens
        .next()
        .ok_or_else(|| IoError::DecodeError(format!("missing {field} in header")))?;
    token
        .parse::<u32>()
        .map_err(|_| IoError::DecodeError(format!("invalid {field}: '{token}'")))
}

/// Decodes plain-text PPM/PGM content.
///
/// Decoding stops at the first problem; no geometry is guessed.
pub fn decode(text: &str) -> IoResult<FrameBuffer<'static>> {
    let mut tokens = tokens(text);

    let magic = tokens
        .next()
        .ok_or_else(|| IoError::DecodeError("empty file".into()))?;
    let kind = PnmKind::from_magic(magic).ok_or_else(|| {
        IoError::UnsupportedFormat(format!("'{magic}' (expected P3 or P2)"))
    })?;

    let width = header_value(&mut tokens, "width")?;
    let height = header_value(&mut tokens, "height")?;
    let maxval = header_value(&mut tokens, "maxval")?;
    if width == 0 || height == 0 {
        return Err(IoError::DecodeError(format!("invalid dimensions {width}x{height}")));
    }
    if !(1..=255).contains(&maxval) {
        return Err(IoError::DecodeError(format!("maxval {maxval} outside 1..=255")));
    }
    trace!(magic, width, height, maxval, "pnm header");

    // Every sample takes at least one digit and one separator
    let expected = (u64::from(width) * u64::from(height))
        .saturating_mul(kind.samples_per_pixel() as u64);
    let available = (text.len() as u64).div_ceil(2);
    if expected > available {
        return Err(IoError::DecodeError(format!(
            "truncated pixel data: {width}x{height} needs {expected} samples, input holds at most {available}"
        )));
    }

    let mut frame = FrameBuffer::new(width, height)?;
    let mut read = 0usize;

    let mut sample = || -> IoResult<u8> {
        let token = tokens.next().ok_or_else(|| {
            IoError::DecodeError(format!(
                "truncated pixel data: expected {expected} samples, got {read}"
            ))
        })?;
        let v = token
            .parse::<u32>()
            .map_err(|_| IoError::DecodeError(format!("invalid sample '{token}' at {read}")))?;
        if v > maxval {
            return Err(IoError::DecodeError(format!(
                "sample {v} at {read} exceeds maxval {maxval}"
            )));
        }
        read += 1;
        Ok(if maxval == 255 { v as u8 } else { (v * 255 / maxval) as u8 })
    };

    for px in frame.pixels_mut() {
        *px = match kind {
            PnmKind::Pixmap => Pixel::new(sample()?, sample()?, sample()?),
            PnmKind::Graymap => Pixel::gray(sample()?),
        };
    }

    debug!(width, height, kind = kind.magic(), "decoded image");
    Ok(frame)
}

/// Encodes a frame as plain-text PPM or PGM.
///
/// PGM output stores the red channel.
pub fn encode(frame: &FrameBuffer<'_>, kind: PnmKind) -> String {
    let (width, height) = frame.dimensions();
    // "255 255 255\n" is the longest line
    let mut out = String::with_capacity(16 + frame.len() * 4 * kind.samples_per_pixel());
    out.push_str(&format!("{}\n{width} {height}\n255\n", kind.magic()));
    for px in frame.pixels() {
        match kind {
            PnmKind::Pixmap => out.push_str(&format!("{} {} {}\n", px.r, px.g, px.b)),
            PnmKind::Graymap => out.push_str(&format!("{}\n", px.r)),
        }
    }
    out
}

/// Reader for plain-text PPM/PGM files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PnmReader;

impl PnmReader {
    /// Creates a new reader.
    pub fn new() -> Self {
        Self
    }
}

impl ImageReader for PnmReader {
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<FrameBuffer<'static>> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading image");
        let bytes = std::fs::read(path)?;
        self.read_from_memory(&bytes)
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<FrameBuffer<'static>> {
        let text = std::str::from_utf8(data)
            .map_err(|e| IoError::DecodeError(format!("not a text file: {e}")))?;
        decode(text)
    }
}

/// Writer for plain-text PPM/PGM files.
#[derive(Debug, Clone, Copy)]
pub struct PnmWriter {
    kind: PnmKind,
}

impl PnmWriter {
    /// Writer producing `P3` output.
    pub fn ppm() -> Self {
        Self { kind: PnmKind::Pixmap }
    }

    /// Writer producing `P2` output.
    pub fn pgm() -> Self {
        Self { kind: PnmKind::Graymap }
    }

    /// Output variant.
    pub fn kind(&self) -> PnmKind {
        self.kind
    }
}

impl Default for PnmWriter {
    fn default() -> Self {
        Self::ppm()
    }
}

impl ImageWriter for PnmWriter {
    fn write<P: AsRef<Path>>(&self, path: P, frame: &FrameBuffer<'_>) -> IoResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.write_to_memory(frame)?)?;
        debug!(path = %path.display(), kind = self.kind.magic(), "saved image");
        Ok(())
    }

    fn write_to_memory(&self, frame: &FrameBuffer<'_>) -> IoResult<Vec<u8>> {
        Ok(encode(frame, self.kind).into_bytes())
    }
}

/// Reads a PPM/PGM file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<FrameBuffer<'static>> {
    PnmReader::new().read(path)
}

/// Writes a `P3` file.
pub fn write<P: AsRef<Path>>(path: P, frame: &FrameBuffer<'_>) -> IoResult<()> {
    PnmWriter::ppm().write(path, frame)
}

/// Writes a `P2` file.
pub fn write_pgm<P: AsRef<Path>>(path: P, frame: &FrameBuffer<'_>) -> IoResult<()> {
    PnmWriter::pgm().write(path, frame)
}
