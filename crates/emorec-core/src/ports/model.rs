//! Classifier model port.

use crate::domain::InputTensor;

/// Port for a pre-trained, pre-loaded 7-class emotion model.
///
/// Implementations must be safe to call concurrently; inference must not
/// mutate model state.
pub trait EmotionModel: Send + Sync {
    /// Runs the model on a `(1, 48, 48, 3)` input and returns one raw score
    /// per emotion class, in class-table order.
    ///
    /// # Errors
    ///
    /// Returns an error if the model invocation fails.
    fn infer(&self, input: &InputTensor) -> anyhow::Result<Vec<f32>>;
}

impl<M: EmotionModel + ?Sized> EmotionModel for std::sync::Arc<M> {
    fn infer(&self, input: &InputTensor) -> anyhow::Result<Vec<f32>> {
        (**self).infer(input)
    }
}

impl<M: EmotionModel + ?Sized> EmotionModel for Box<M> {
    fn infer(&self, input: &InputTensor) -> anyhow::Result<Vec<f32>> {
        (**self).infer(input)
    }
}
