//! Core domain types for emotion classification.

mod emotion;
mod prediction;
mod result;
mod tensor;

pub use emotion::{Emotion, UnknownEmotion, NUM_EMOTIONS};
pub use prediction::Prediction;
pub use result::{ClassificationRecord, ImageDimensions, ImageInfo, PredictionSummary};
pub use tensor::{InputTensor, ScoreVector, INPUT_CHANNELS, INPUT_LEN, INPUT_SIZE};
