//! `EmotionNet`: a compact CNN over 48x48 RGB face crops.
//!
//! Three conv/ReLU/max-pool stages followed by two fully connected layers
//! and a softmax over the seven emotion classes. Weights are loaded from a
//! safetensors file with the tensor names listed by
//! [`EmotionNet::parameter_shapes`].

// Allow common ML code patterns
#![allow(clippy::cast_possible_truncation)]

use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{Device, Module, Tensor, D};
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Linear, VarBuilder};

use super::load_safetensors;
use crate::domain::{InputTensor, INPUT_CHANNELS, INPUT_SIZE, NUM_EMOTIONS};
use crate::ports::EmotionModel;

/// Output channels of the three conv stages.
const CONV_CHANNELS: [usize; 3] = [32, 64, 128];

/// Width of the hidden fully connected layer.
const HIDDEN: usize = 256;

/// Spatial size after three 2x2 max pools: 48 -> 24 -> 12 -> 6.
const POOLED_SIZE: usize = INPUT_SIZE / 8;

/// Flattened feature count fed to `fc1`.
const FLAT_FEATURES: usize = CONV_CHANNELS[2] * POOLED_SIZE * POOLED_SIZE;

/// Pre-trained 7-class emotion classifier.
pub struct EmotionNet {
    conv1: Conv2d,
    conv2: Conv2d,
    conv3: Conv2d,
    fc1: Linear,
    fc2: Linear,
    device: Device,
}

impl EmotionNet {
    /// Creates the network from weights.
    ///
    /// # Errors
    ///
    /// Returns an error if a weight is missing or has the wrong shape.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder) -> Result<Self> {
        let device = vb.device().clone();

        let same = Conv2dConfig {
            padding: 1,
            ..Conv2dConfig::default()
        };

        let conv1 = conv2d(INPUT_CHANNELS, CONV_CHANNELS[0], 3, same, vb.pp("conv1"))
            .context("Failed to load conv1")?;
        let conv2 = conv2d(CONV_CHANNELS[0], CONV_CHANNELS[1], 3, same, vb.pp("conv2"))
            .context("Failed to load conv2")?;
        let conv3 = conv2d(CONV_CHANNELS[1], CONV_CHANNELS[2], 3, same, vb.pp("conv3"))
            .context("Failed to load conv3")?;

        let fc1 = linear(FLAT_FEATURES, HIDDEN, vb.pp("fc1")).context("Failed to load fc1")?;
        let fc2 = linear(HIDDEN, NUM_EMOTIONS, vb.pp("fc2")).context("Failed to load fc2")?;

        Ok(Self {
            conv1,
            conv2,
            conv3,
            fc1,
            fc2,
            device,
        })
    }

    /// Loads the network from a safetensors file onto `device`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the weights do not fit.
    pub fn load(path: impl AsRef<Path>, device: &Device) -> Result<Self> {
        let path = path.as_ref();
        let vb = load_safetensors(path, device)?;
        Self::new(vb).with_context(|| format!("Invalid EmotionNet weights: {}", path.display()))
    }

    /// Names and shapes of every weight the network expects.
    #[must_use]
    pub fn parameter_shapes() -> Vec<(String, Vec<usize>)> {
        let conv = |name: &str, cin: usize, cout: usize| {
            [
                (format!("{name}.weight"), vec![cout, cin, 3, 3]),
                (format!("{name}.bias"), vec![cout]),
            ]
        };
        let fc = |name: &str, fin: usize, fout: usize| {
            [
                (format!("{name}.weight"), vec![fout, fin]),
                (format!("{name}.bias"), vec![fout]),
            ]
        };

        [
            conv("conv1", INPUT_CHANNELS, CONV_CHANNELS[0]),
            conv("conv2", CONV_CHANNELS[0], CONV_CHANNELS[1]),
            conv("conv3", CONV_CHANNELS[1], CONV_CHANNELS[2]),
            fc("fc1", FLAT_FEATURES, HIDDEN),
            fc("fc2", HIDDEN, NUM_EMOTIONS),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Converts the NHWC input into an NCHW tensor on the model device.
    fn to_device_tensor(&self, input: &InputTensor) -> Result<Tensor> {
        let shape = (1, INPUT_SIZE, INPUT_SIZE, INPUT_CHANNELS);
        Tensor::from_slice(input.as_slice(), shape, &self.device)?
            .permute((0, 3, 1, 2))?
            .contiguous()
            .context("Failed to build input tensor")
    }

    /// Runs the network, returning class probabilities in class-table order.
    ///
    /// # Errors
    ///
    /// Returns an error if any tensor operation fails.
    pub fn probabilities(&self, input: &InputTensor) -> Result<Vec<f32>> {
        let x = self.to_device_tensor(input)?;
        let logits = self.forward(&x)?;
        let probs = candle_nn::ops::softmax(&logits, D::Minus1)?;
        probs
            .squeeze(0)?
            .to_vec1::<f32>()
            .context("Failed to read model output")
    }
}

impl Module for EmotionNet {
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        let x = self.conv1.forward(x)?.relu()?.max_pool2d(2)?;
        let x = self.conv2.forward(&x)?.relu()?.max_pool2d(2)?;
        let x = self.conv3.forward(&x)?.relu()?.max_pool2d(2)?;

        let x = x.flatten_from(1)?;
        let x = self.fc1.forward(&x)?.relu()?;
        self.fc2.forward(&x)
    }
}

impl EmotionModel for EmotionNet {
    fn infer(&self, input: &InputTensor) -> Result<Vec<f32>> {
        self.probabilities(input)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;

    use candle_core::DType;

    use super::*;

    /// Builds a network whose weights are all zero except the final bias.
    fn bias_only_net(bias: [f32; NUM_EMOTIONS]) -> EmotionNet {
        let device = Device::Cpu;
        let mut tensors = HashMap::new();
        for (name, shape) in EmotionNet::parameter_shapes() {
            let t = if name == "fc2.bias" {
                Tensor::from_slice(&bias, NUM_EMOTIONS, &device).unwrap()
            } else {
                Tensor::zeros(shape, DType::F32, &device).unwrap()
            };
            tensors.insert(name, t);
        }
        EmotionNet::new(VarBuilder::from_tensors(tensors, DType::F32, &device)).unwrap()
    }

    fn input() -> InputTensor {
        InputTensor::from_fn(|x, y, c| ((x * 5 + y * 3 + c) % 11) as f32 / 10.0)
    }

    #[test]
    fn test_flat_features() {
        assert_eq!(POOLED_SIZE, 6);
        assert_eq!(FLAT_FEATURES, 4608);
    }

    #[test]
    fn test_parameter_shapes() {
        let shapes: HashMap<_, _> = EmotionNet::parameter_shapes().into_iter().collect();
        assert_eq!(shapes.len(), 10);
        assert_eq!(shapes["conv1.weight"], vec![32, 3, 3, 3]);
        assert_eq!(shapes["fc1.weight"], vec![256, 4608]);
        assert_eq!(shapes["fc2.bias"], vec![7]);
    }

    #[test]
    fn test_zero_weights_give_uniform_scores() {
        let net = bias_only_net([0.0; NUM_EMOTIONS]);
        let scores = net.infer(&input()).unwrap();
        assert_eq!(scores.len(), NUM_EMOTIONS);
        for s in scores {
            assert!((s - 1.0 / 7.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_bias_steers_prediction() {
        let mut bias = [0.0; NUM_EMOTIONS];
        bias[3] = 5.0;
        let net = bias_only_net(bias);
        let scores = net.infer(&input()).unwrap();

        let expected = 5.0_f32.exp() / (5.0_f32.exp() + 6.0);
        assert!((scores[3] - expected).abs() < 1e-5);
        let sum: f32 = scores.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_missing_weight_rejected() {
        let device = Device::Cpu;
        let vb = VarBuilder::from_tensors(HashMap::new(), DType::F32, &device);
        assert!(EmotionNet::new(vb).is_err());
    }
}
