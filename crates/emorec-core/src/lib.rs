//! Emorec Core - Domain logic and inference pipeline
//!
//! This crate contains the emotion catalog, the preprocessing and
//! classification stages, the ports implemented by adapters, and the
//! Candle-based `EmotionNet` model.

pub mod domain;
pub mod error;
pub mod inference;
pub mod pipeline;
pub mod ports;

pub use domain::{
    ClassificationRecord, Emotion, ImageDimensions, ImageInfo, InputTensor, Prediction,
    PredictionSummary, ScoreVector,
};
pub use error::{InferenceError, PipelineError, PreprocessingError};
pub use pipeline::{EmotionClassifier, EmotionPipeline, PracticeOutcome, Preprocessor, ResizeFilter};
pub use ports::{EmotionModel, ImageSource, ProgressEvent, ProgressSink, ResultOutput, SourceItem};
