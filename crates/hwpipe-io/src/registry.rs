//! Format registry for format detection and dispatch.
//!
//! The registry provides a centralized way to:
//! - Register format readers and writers
//! - Auto-detect formats by magic bytes or extension
//! - Get format handlers by name
//!
//! # Architecture
//!
//! The registry uses a singleton pattern via [`FormatRegistry::global()`].
//! Built-in formats are registered on first access.
//!
//! # Example
//!
//! ```
//! use hwpipe_io::registry::FormatRegistry;
//!
//! let registry = FormatRegistry::global();
//! assert!(registry.supports_extension("ppm"));
//! assert_eq!(registry.detect_format(b"P3\n"), Some("PPM"));
//! ```

use crate::pnm::{self, PnmKind};
use crate::{ImageReader, IoError, IoResult};
use hwpipe_core::FrameBuffer;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

/// Format information entry in the registry.
#[derive(Clone)]
pub struct FormatInfo {
    /// Human-readable format name (e.g., "PPM").
    pub name: &'static str,
    /// File extensions without dots (e.g., ["ppm", "pnm"]).
    pub extensions: &'static [&'static str],
    /// Function to check if header bytes match this format.
    pub can_read: fn(&[u8]) -> bool,
    /// Function to read from memory.
    pub read_memory: fn(&[u8]) -> IoResult<FrameBuffer<'static>>,
    /// Function to write to memory.
    pub write_memory: fn(&FrameBuffer<'_>) -> IoResult<Vec<u8>>,
}

/// Central registry for image format handlers.
pub struct FormatRegistry {
    formats: HashMap<&'static str, Arc<FormatInfo>>,
    by_extension: HashMap<&'static str, &'static str>,
}

/// Matches a two-byte magic followed by whitespace or `#`.
fn magic_matches(header: &[u8], magic: &[u8; 2]) -> bool {
    header.len() >= 3
        && header[..2] == magic[..]
        && (header[2].is_ascii_whitespace() || header[2] == b'#')
}

impl FormatRegistry {
    /// Name used when an output extension is not registered.
    pub const DEFAULT_FORMAT: &'static str = "PPM";

    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            formats: HashMap::new(),
            by_extension: HashMap::new(),
        }
    }

    /// Returns the global registry instance with built-in formats.
    pub fn global() -> &'static FormatRegistry {
        static INSTANCE: OnceLock<FormatRegistry> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let mut registry = FormatRegistry::new();
            registry.register_builtin_formats();
            registry
        })
    }

    fn register_builtin_formats(&mut self) {
        self.register(FormatInfo {
            name: "PPM",
            extensions: &["ppm", "pnm"],
            can_read: |h| magic_matches(h, b"P3"),
            read_memory: |d| pnm::PnmReader::new().read_from_memory(d),
            write_memory: |f| Ok(pnm::encode(f, PnmKind::Pixmap).into_bytes()),
        });

        self.register(FormatInfo {
            name: "PGM",
            extensions: &["pgm"],
            can_read: |h| magic_matches(h, b"P2"),
            read_memory: |d| pnm::PnmReader::new().read_from_memory(d),
            write_memory: |f| Ok(pnm::encode(f, PnmKind::Graymap).into_bytes()),
        });
    }

    /// Registers a format in the registry.
    ///
    /// A format registered under an existing name replaces it.
    pub fn register(&mut self, info: FormatInfo) {
        let name = info.name;
        for ext in info.extensions {
            self.by_extension.insert(*ext, name);
        }
        self.formats.insert(name, Arc::new(info));
    }

    /// Returns registered format names, sorted.
    pub fn format_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.formats.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Returns format info by name.
    pub fn get(&self, name: &str) -> Option<&FormatInfo> {
        self.formats.get(name).map(|arc| arc.as_ref())
    }

    /// Returns format info by file extension (case-insensitive).
    pub fn get_by_extension(&self, ext: &str) -> Option<&FormatInfo> {
        let ext_lower = ext.to_lowercase();
        self.by_extension
            .get(ext_lower.as_str())
            .and_then(|name| self.formats.get(name))
            .map(|arc| arc.as_ref())
    }

    /// Checks if an extension is supported.
    pub fn supports_extension(&self, ext: &str) -> bool {
        self.by_extension.contains_key(ext.to_lowercase().as_str())
    }

    /// Detects format from file header bytes.
    pub fn detect_format(&self, header: &[u8]) -> Option<&'static str> {
        self.formats
            .iter()
            .find(|(_, info)| (info.can_read)(header))
            .map(|(name, _)| *name)
    }

    /// Decodes bytes, detecting the format by magic first, then by extension hint.
    pub fn read_memory(&self, data: &[u8], ext_hint: Option<&str>) -> IoResult<FrameBuffer<'static>> {
        let header = &data[..data.len().min(16)];
        if let Some(info) = self.detect_format(header).and_then(|name| self.get(name)) {
            trace!(format = info.name, "format detected by magic");
            return (info.read_memory)(data);
        }
        if let Some(info) = ext_hint.and_then(|ext| self.get_by_extension(ext)) {
            trace!(format = info.name, "format selected by extension");
            return (info.read_memory)(data);
        }
        let magic: String = header
            .iter()
            .take_while(|b| b.is_ascii_graphic())
            .take(4)
            .map(|&b| b as char)
            .collect();
        Err(IoError::UnsupportedFormat(if magic.is_empty() {
            ext_hint.unwrap_or("unknown").to_string()
        } else {
            magic
        }))
    }

    /// Reads an image from a file using auto-detection.
    pub fn read(&self, path: &Path) -> IoResult<FrameBuffer<'static>> {
        let data = std::fs::read(path)?;
        let ext = path.extension().and_then(|e| e.to_str());
        self.read_memory(&data, ext)
    }

    /// Writes an image, choosing the format by extension.
    ///
    /// Unknown or missing extensions fall back to [`Self::DEFAULT_FORMAT`].
    pub fn write(&self, path: &Path, frame: &FrameBuffer<'_>) -> IoResult<()> {
        let info = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.get_by_extension(ext))
            .or_else(|| self.get(Self::DEFAULT_FORMAT))
            .ok_or_else(|| IoError::UnsupportedFormat(path.display().to_string()))?;
        let bytes = (info.write_memory)(frame)?;
        std::fs::write(path, bytes)?;
        debug!(path = %path.display(), format = info.name, "saved image");
        Ok(())
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
