//! Synthetic image builders for testing.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use emorec_core::domain::ImageInfo;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

/// Builder for creating synthetic test images.
///
/// Images carry a `synthetic://` path so they are easy to tell apart from
/// files in test output.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    /// Creates a single-color RGB image.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> ImageInfo {
        let img = RgbImage::from_pixel(width, height, Rgb([r, g, b]));
        ImageInfo::new("synthetic://rgb_uniform", DynamicImage::ImageRgb8(img))
    }

    /// Creates a uniform gray RGB image.
    #[must_use]
    pub fn gray(width: u32, height: u32, value: u8) -> ImageInfo {
        let mut info = Self::rgb_uniform(width, height, value, value, value);
        info.path = "synthetic://gray".into();
        info
    }

    /// Creates an RGBA image with a uniform color and alpha.
    #[must_use]
    pub fn rgba_uniform(width: u32, height: u32, rgba: [u8; 4]) -> ImageInfo {
        let img = RgbaImage::from_pixel(width, height, Rgba(rgba));
        ImageInfo::new("synthetic://rgba_uniform", DynamicImage::ImageRgba8(img))
    }

    /// Creates a horizontal red ramp over a constant green and blue.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn red_ramp(width: u32, height: u32) -> ImageInfo {
        let img = RgbImage::from_fn(width, height, |x, _| {
            let val = ((u32::from(u8::MAX) * x) / width.saturating_sub(1).max(1)) as u8;
            Rgb([val, 64, 192])
        });
        ImageInfo::new("synthetic://red_ramp", DynamicImage::ImageRgb8(img))
    }

    /// Creates a black and white checkerboard with the given cell size.
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell_size: u32) -> ImageInfo {
        let cell = cell_size.max(1);
        let img = RgbImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        ImageInfo::new("synthetic://checkerboard", DynamicImage::ImageRgb8(img))
    }

    /// Creates a crude face: a light oval with dark eyes and mouth.
    ///
    /// Enough structure to exercise the resize path with non-uniform input.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn face(size: u32) -> ImageInfo {
        let s = size.max(1) as f32;
        let img = RgbImage::from_fn(size, size, |x, y| {
            let (u, v) = (x as f32 / s, y as f32 / s);
            let in_oval = ((u - 0.5) / 0.4).powi(2) + ((v - 0.5) / 0.48).powi(2) <= 1.0;
            let eye = |cx: f32| ((u - cx).powi(2) + (v - 0.38).powi(2)).sqrt() < 0.06;
            let mouth = (0.35..0.65).contains(&u) && (0.68..0.74).contains(&v);

            if !in_oval {
                Rgb([30, 30, 40])
            } else if eye(0.35) || eye(0.65) || mouth {
                Rgb([20, 10, 10])
            } else {
                Rgb([224, 182, 150])
            }
        });
        ImageInfo::new("synthetic://face", DynamicImage::ImageRgb8(img))
    }

    /// Creates an image with zero width or height.
    #[must_use]
    pub fn empty(width: u32, height: u32) -> ImageInfo {
        ImageInfo::new("synthetic://empty", DynamicImage::new_rgb8(width, height))
    }
}

/// Encodes an image as PNG bytes.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(out.into_inner())
}

/// Writes an image to `path`, choosing the format from its extension.
///
/// # Errors
///
/// Returns an error if the format is unknown or writing fails.
pub fn write_image(image: &DynamicImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    image
        .save(path)
        .with_context(|| format!("Failed to write image: {}", path.display()))
}
