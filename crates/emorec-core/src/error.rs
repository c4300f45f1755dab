//! Error kinds raised by the inference pipeline.

use thiserror::Error;

/// Failure while turning an image into a model input tensor.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// The image has no pixels.
    #[error("image has zero size ({width}x{height})")]
    EmptyImage {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// Encoded image data could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Failure while running the classifier or interpreting its output.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The tensor handed to the model has the wrong number of entries.
    #[error("input tensor has {actual} entries, expected {expected}")]
    TensorShape {
        /// Expected entry count.
        expected: usize,
        /// Actual entry count.
        actual: usize,
    },

    /// The model itself failed.
    #[error("model invocation failed: {0:#}")]
    Model(anyhow::Error),

    /// The model returned the wrong number of class scores.
    #[error("model returned {actual} scores, expected {expected}")]
    ScoreCount {
        /// Expected score count.
        expected: usize,
        /// Actual score count.
        actual: usize,
    },

    /// The scores cannot be normalized (negative, non-finite or zero sum).
    #[error("invalid model scores: {0}")]
    InvalidScores(String),
}

/// Failure anywhere in the preprocess-infer-map round trip.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Preprocessing stage failed.
    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),

    /// Classification stage failed.
    #[error(transparent)]
    Inference(#[from] InferenceError),
}
