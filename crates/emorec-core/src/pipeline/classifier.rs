//! Classifier adapter: tensor in, labeled prediction out.

use tracing::{debug, trace};

use crate::domain::{InputTensor, Prediction, ScoreVector};
use crate::error::InferenceError;
use crate::ports::EmotionModel;

/// Runs an [`EmotionModel`] and maps its scores onto the emotion table.
///
/// Holds no state besides the shared, read-only model.
#[derive(Debug, Clone)]
pub struct EmotionClassifier<M> {
    model: M,
}

impl<M: EmotionModel> EmotionClassifier<M> {
    /// Wraps a loaded model.
    #[must_use]
    pub const fn new(model: M) -> Self {
        Self { model }
    }

    /// Returns the underlying model.
    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Runs the model and validates its raw output.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::Model`] if the model fails, or a validation
    /// error if its output is not seven finite non-negative scores with a
    /// positive sum.
    pub fn scores(&self, tensor: &InputTensor) -> Result<ScoreVector, InferenceError> {
        let raw = self.model.infer(tensor).map_err(InferenceError::Model)?;
        trace!("Raw model output: {raw:?}");
        ScoreVector::new(&raw)
    }

    /// Classifies a preprocessed tensor.
    ///
    /// The winning class is the first index holding the maximum score and
    /// its confidence is `max / sum` over the raw scores.
    ///
    /// # Errors
    ///
    /// See [`EmotionClassifier::scores`].
    pub fn predict(&self, tensor: InputTensor) -> Result<Prediction, InferenceError> {
        let scores = self.scores(&tensor)?;
        let prediction = Prediction::from_scores(&scores, tensor);
        debug!(
            "Predicted {} with confidence {:.4}",
            prediction.emotion, prediction.score
        );
        Ok(prediction)
    }
}
