//! In-memory image source, used for images piped through stdin.

use std::io::Read;

use anyhow::{Context, Result};
use emorec_core::pipeline::decode_image;
use emorec_core::{ImageInfo, ImageSource, SourceItem};

/// Path reported for images read from standard input.
pub const STDIN_PATH: &str = "-";

/// A single encoded image held in memory.
pub struct MemoryImageSource {
    path: String,
    bytes: Vec<u8>,
}

impl MemoryImageSource {
    /// Wraps encoded image bytes, reported under `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }

    /// Reads one encoded image from `reader` until EOF.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .context("Failed to read image from stdin")?;
        Ok(Self::new(STDIN_PATH, bytes))
    }

    fn decode(&self) -> Result<ImageInfo> {
        let image = decode_image(&self.bytes)
            .with_context(|| format!("Failed to decode image: {}", self.path))?;
        Ok(ImageInfo::new(self.path.clone(), image))
    }
}

impl ImageSource for MemoryImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = SourceItem> + Send + '_> {
        Box::new(std::iter::once(SourceItem {
            path: self.path.clone(),
            image: self.decode(),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(1)
    }
}
