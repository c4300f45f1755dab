//! Model input tensor and raw classifier scores.

use image::{Rgb, RgbImage};

use super::emotion::{Emotion, NUM_EMOTIONS};
use crate::error::InferenceError;

/// Side length of the square classifier input.
pub const INPUT_SIZE: usize = 48;

/// Number of color channels in the classifier input.
pub const INPUT_CHANNELS: usize = 3;

/// Total number of entries in an [`InputTensor`].
pub const INPUT_LEN: usize = INPUT_SIZE * INPUT_SIZE * INPUT_CHANNELS;

/// Normalized RGB classifier input with logical shape `(1, 48, 48, 3)`.
///
/// Layout is NHWC row-major: the entry for pixel `(x, y)` and channel `c`
/// lives at `(y * 48 + x) * 3 + c`. The length is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    data: Vec<f32>,
}

impl InputTensor {
    /// Logical shape: batch, height, width, channel.
    pub const SHAPE: [usize; 4] = [1, INPUT_SIZE, INPUT_SIZE, INPUT_CHANNELS];

    /// Wraps a flat buffer, checking its length.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::TensorShape`] if `data` does not hold exactly
    /// 6912 entries.
    pub fn from_vec(data: Vec<f32>) -> Result<Self, InferenceError> {
        if data.len() != INPUT_LEN {
            return Err(InferenceError::TensorShape {
                expected: INPUT_LEN,
                actual: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// Wraps a buffer whose length the caller has already established.
    pub(crate) fn from_vec_unchecked(data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), INPUT_LEN);
        Self { data }
    }

    /// Builds a tensor by evaluating `f(x, y, channel)` for every entry.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(usize, usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(INPUT_LEN);
        for y in 0..INPUT_SIZE {
            for x in 0..INPUT_SIZE {
                for c in 0..INPUT_CHANNELS {
                    data.push(f(x, y, c));
                }
            }
        }
        Self { data }
    }

    /// Returns the flat NHWC buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Consumes the tensor, returning the flat buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Returns the entry at pixel `(x, y)`, channel `c`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize, c: usize) -> Option<f32> {
        if x >= INPUT_SIZE || y >= INPUT_SIZE || c >= INPUT_CHANNELS {
            return None;
        }
        self.data.get(Self::offset(x, y, c)).copied()
    }

    /// Flat offset of pixel `(x, y)`, channel `c`.
    #[must_use]
    pub const fn offset(x: usize, y: usize, c: usize) -> usize {
        (y * INPUT_SIZE + x) * INPUT_CHANNELS + c
    }

    /// Renders the tensor back into a 48x48 RGB image for inspection.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_image(&self) -> RgbImage {
        let side = INPUT_SIZE as u32;
        RgbImage::from_fn(side, side, |x, y| {
            let base = Self::offset(x as usize, y as usize, 0);
            let px = |c: usize| (self.data[base + c].clamp(0.0, 1.0) * 255.0).round() as u8;
            Rgb([px(0), px(1), px(2)])
        })
    }
}

/// Raw per-class classifier output, one entry per [`Emotion`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreVector([f32; NUM_EMOTIONS]);

impl ScoreVector {
    /// Validates raw model output.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::ScoreCount`] when `raw` does not have seven
    /// entries, or [`InferenceError::InvalidScores`] when an entry is negative
    /// or non-finite, or when all entries sum to zero.
    pub fn new(raw: &[f32]) -> Result<Self, InferenceError> {
        let scores: [f32; NUM_EMOTIONS] =
            raw.try_into().map_err(|_| InferenceError::ScoreCount {
                expected: NUM_EMOTIONS,
                actual: raw.len(),
            })?;

        if let Some((i, s)) = scores
            .iter()
            .enumerate()
            .find(|(_, s)| !s.is_finite() || **s < 0.0)
        {
            return Err(InferenceError::InvalidScores(format!(
                "score {i} is {s}, expected a finite non-negative value"
            )));
        }

        let vector = Self(scores);
        let sum = vector.sum();
        if !(sum.is_finite() && sum > 0.0) {
            return Err(InferenceError::InvalidScores(format!(
                "scores sum to {sum}"
            )));
        }
        Ok(vector)
    }

    /// Returns the raw scores in class order.
    #[must_use]
    pub const fn as_array(&self) -> &[f32; NUM_EMOTIONS] {
        &self.0
    }

    /// Sum of all raw scores, accumulated in `f64` so large finite scores
    /// cannot overflow.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.0.iter().map(|&s| f64::from(s)).sum()
    }

    /// Index of the highest score; the lowest index wins ties.
    #[must_use]
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, &s) in self.0.iter().enumerate().skip(1) {
            if s > self.0[best] {
                best = i;
            }
        }
        best
    }

    /// The winning class.
    #[must_use]
    pub fn top(&self) -> Emotion {
        Emotion::ALL[self.argmax()]
    }

    /// Winning score divided by the sum of all scores.
    ///
    /// This is a plain ratio, not a softmax.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn confidence(&self) -> f32 {
        (f64::from(self.0[self.argmax()]) / self.sum()) as f32
    }
}
