//! The preprocess, infer, map pipeline.
//!
//! Each classification is one synchronous, stateless round trip:
//! [`Preprocessor::transform`] then [`EmotionClassifier::predict`].

mod classifier;
mod practice;
mod preprocess;

pub use classifier::EmotionClassifier;
pub use practice::PracticeOutcome;
pub use preprocess::{decode_image, Preprocessor, ResizeFilter};

use image::DynamicImage;

use crate::domain::Prediction;
use crate::error::PipelineError;
use crate::ports::EmotionModel;

/// Preprocessor and classifier bound to one loaded model.
///
/// Shareable across threads; every call is independent.
#[derive(Debug, Clone)]
pub struct EmotionPipeline<M> {
    preprocessor: Preprocessor,
    classifier: EmotionClassifier<M>,
}

impl<M: EmotionModel> EmotionPipeline<M> {
    /// Creates a pipeline with the default (bilinear) preprocessor.
    #[must_use]
    pub fn new(model: M) -> Self {
        Self::with_preprocessor(model, Preprocessor::default())
    }

    /// Creates a pipeline with a custom preprocessor.
    #[must_use]
    pub const fn with_preprocessor(model: M, preprocessor: Preprocessor) -> Self {
        Self {
            preprocessor,
            classifier: EmotionClassifier::new(model),
        }
    }

    /// Returns the preprocessor.
    #[must_use]
    pub const fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// Returns the classifier adapter.
    #[must_use]
    pub const fn classifier(&self) -> &EmotionClassifier<M> {
        &self.classifier
    }

    /// Classifies a decoded image.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Preprocessing`] or [`PipelineError::Inference`];
    /// there is no fallback prediction.
    pub fn classify(&self, image: &DynamicImage) -> Result<Prediction, PipelineError> {
        let tensor = self.preprocessor.transform(image)?;
        Ok(self.classifier.predict(tensor)?)
    }

    /// Decodes and classifies an encoded image.
    ///
    /// # Errors
    ///
    /// As [`EmotionPipeline::classify`], plus decode failures.
    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<Prediction, PipelineError> {
        let tensor = self.preprocessor.transform_bytes(bytes)?;
        Ok(self.classifier.predict(tensor)?)
    }
}
