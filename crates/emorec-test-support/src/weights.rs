//! Deterministic `EmotionNet` weight files.
//!
//! Every weight is zero except the final bias, so the network's output is
//! `softmax(bias)` for any input. That makes CLI and adapter tests
//! predictable without a trained model.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use emorec_core::domain::NUM_EMOTIONS;
use emorec_core::inference::EmotionNet;
use safetensors::tensor::TensorView;
use safetensors::Dtype;

/// Name of the tensor that decides the predicted class.
const OUTPUT_BIAS: &str = "fc2.bias";

/// Serializes an `EmotionNet` weight file with the given output bias.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn emotion_net_weights(bias: [f32; NUM_EMOTIONS]) -> Result<Vec<u8>> {
    let buffers: Vec<(String, Vec<usize>, Vec<f32>)> = EmotionNet::parameter_shapes()
        .into_iter()
        .map(|(name, shape)| {
            let data = if name == OUTPUT_BIAS {
                bias.to_vec()
            } else {
                vec![0.0; shape.iter().product()]
            };
            (name, shape, data)
        })
        .collect();

    let views = buffers
        .iter()
        .map(|(name, shape, data)| {
            TensorView::new(Dtype::F32, shape.clone(), bytemuck::cast_slice(data))
                .map(|view| (name.clone(), view))
                .map_err(|e| anyhow!("Invalid tensor '{name}': {e:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    safetensors::serialize(views, &None).map_err(|e| anyhow!("Failed to serialize weights: {e:?}"))
}

/// Writes weights that give every class the same score.
///
/// The network then predicts anger with confidence 1/7.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_uniform_weights(path: impl AsRef<Path>) -> Result<()> {
    write_weights(path, [0.0; NUM_EMOTIONS])
}

/// Writes weights that strongly favor the class at `index`.
///
/// With a bias of 5 the winning probability is `e^5 / (e^5 + 6)`, about 0.961.
///
/// # Errors
///
/// Returns an error if `index` is out of range or writing fails.
pub fn write_biased_weights(path: impl AsRef<Path>, index: usize) -> Result<()> {
    let mut bias = [0.0; NUM_EMOTIONS];
    *bias
        .get_mut(index)
        .ok_or_else(|| anyhow!("class index {index} out of range"))? = 5.0;
    write_weights(path, bias)
}

/// Writes a weight file with the given output bias.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_weights(path: impl AsRef<Path>, bias: [f32; NUM_EMOTIONS]) -> Result<()> {
    let path = path.as_ref();
    let bytes = emotion_net_weights(bias)?;
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
