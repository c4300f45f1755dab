//! Classification result records.

use serde::{Deserialize, Serialize};

use super::{Emotion, Prediction};
use crate::pipeline::PracticeOutcome;

/// Result record for a single classified image.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationRecord {
    /// Path of the classified image (`-` for stdin).
    pub path: String,
    /// Timestamp of classification (ISO 8601).
    pub timestamp: String,
    /// Source image dimensions.
    pub dimensions: ImageDimensions,
    /// The prediction.
    pub prediction: PredictionSummary,
    /// Practice evaluation, when a target emotion was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practice: Option<PracticeOutcome>,
}

/// Serializable view of a [`Prediction`] with display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSummary {
    /// Winning emotion.
    pub emotion: Emotion,
    /// Capitalized label.
    pub label: String,
    /// Emoji.
    pub emoji: String,
    /// Normalized confidence.
    pub score: f32,
    /// Confidence as a whole percentage.
    pub percent: String,
}

impl From<&Prediction> for PredictionSummary {
    fn from(p: &Prediction) -> Self {
        Self {
            emotion: p.emotion,
            label: p.label().to_string(),
            emoji: p.emoji.to_string(),
            score: p.score,
            percent: p.percent(),
        }
    }
}

/// Image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates a new dimensions value.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A decoded image together with where it came from.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Path to the image file.
    pub path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded image data.
    pub image: image::DynamicImage,
}

impl ImageInfo {
    /// Wraps a decoded image, reading its dimensions.
    #[must_use]
    pub fn new(path: impl Into<String>, image: image::DynamicImage) -> Self {
        Self {
            path: path.into(),
            width: image.width(),
            height: image.height(),
            image,
        }
    }

    /// Returns the image dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }
}

impl std::ops::Deref for ImageInfo {
    type Target = image::DynamicImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}
