//! Image to tensor preprocessing.
//!
//! Images are stretched (not letterboxed) to 48x48, alpha is dropped and
//! the 8-bit sRGB-encoded channel values are divided by 255. No gamma
//! linearization or channel reordering is applied; the model weights
//! assume exactly this encoding.

use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{InputTensor, INPUT_SIZE};
use crate::error::PreprocessingError;

/// Resampling filter used to shrink or enlarge images to the model input size.
///
/// Only bilinear or better filters are offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    /// Bilinear (triangle) filter.
    #[default]
    Triangle,
    /// Bicubic Catmull-Rom filter.
    CatmullRom,
    /// Gaussian filter.
    Gaussian,
    /// Lanczos filter with window 3.
    Lanczos3,
}

impl ResizeFilter {
    /// All filters, default first.
    pub const ALL: [Self; 4] = [Self::Triangle, Self::CatmullRom, Self::Gaussian, Self::Lanczos3];

    /// Configuration name of the filter.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Triangle => "triangle",
            Self::CatmullRom => "catmull_rom",
            Self::Gaussian => "gaussian",
            Self::Lanczos3 => "lanczos3",
        }
    }

    const fn filter_type(self) -> FilterType {
        match self {
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResizeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "triangle" | "bilinear" => Ok(Self::Triangle),
            "catmull_rom" | "bicubic" => Ok(Self::CatmullRom),
            "gaussian" => Ok(Self::Gaussian),
            "lanczos3" | "lanczos" => Ok(Self::Lanczos3),
            other => Err(format!(
                "unknown resize filter '{other}' (expected triangle, catmull_rom, gaussian or lanczos3)"
            )),
        }
    }
}

/// Converts images into classifier input tensors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preprocessor {
    filter: ResizeFilter,
}

impl Preprocessor {
    /// Creates a preprocessor using the given resampling filter.
    #[must_use]
    pub const fn new(filter: ResizeFilter) -> Self {
        Self { filter }
    }

    /// Returns the configured resampling filter.
    #[must_use]
    pub const fn filter(&self) -> ResizeFilter {
        self.filter
    }

    /// Resizes `image` to 48x48 and normalizes its RGB channels into `[0, 1]`.
    ///
    /// The output is bit-identical for identical input and filter.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessingError::EmptyImage`] if the image has zero width
    /// or height.
    #[allow(clippy::cast_possible_truncation)]
    pub fn transform(&self, image: &DynamicImage) -> Result<InputTensor, PreprocessingError> {
        let (width, height) = (image.width(), image.height());
        // imageops::resize silently returns a black buffer for empty input.
        if width == 0 || height == 0 {
            return Err(PreprocessingError::EmptyImage { width, height });
        }

        debug!(
            "Preprocessing {width}x{height} image with {} filter",
            self.filter
        );

        let side = INPUT_SIZE as u32;
        let rgb = image.to_rgb8();
        // Always exactly side x side, so the buffer length is INPUT_LEN.
        let resized = imageops::resize(&rgb, side, side, self.filter.filter_type());

        let data: Vec<f32> = resized
            .pixels()
            .flat_map(|p| p.0.map(|v| f32::from(v) / 255.0))
            .collect();

        Ok(InputTensor::from_vec_unchecked(data))
    }

    /// Decodes an encoded image and preprocesses it.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessingError::Decode`] for corrupt or unsupported data,
    /// or any error from [`Preprocessor::transform`].
    pub fn transform_bytes(&self, bytes: &[u8]) -> Result<InputTensor, PreprocessingError> {
        let image = decode_image(bytes)?;
        self.transform(&image)
    }
}

/// Decodes an in-memory encoded image (PNG, JPEG, ...).
///
/// # Errors
///
/// Returns [`PreprocessingError::Decode`] if the data cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, PreprocessingError> {
    Ok(image::load_from_memory(bytes)?)
}
