//! Labeled classifier output.

use std::fmt;

use serde::Serialize;

use super::{Emotion, InputTensor, ScoreVector};

/// A single labeled prediction.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Winning emotion class.
    pub emotion: Emotion,
    /// Winning score divided by the sum of all scores, in `[0, 1]`.
    pub score: f32,
    /// Emoji for `emotion`.
    pub emoji: &'static str,
    /// The input the prediction was made from, kept for diagnostics.
    #[serde(skip)]
    pub tensor: InputTensor,
}

impl Prediction {
    /// Builds a prediction from validated scores and the tensor that produced them.
    #[must_use]
    pub fn from_scores(scores: &ScoreVector, tensor: InputTensor) -> Self {
        let emotion = scores.top();
        Self {
            emotion,
            score: scores.confidence(),
            emoji: emotion.emoji(),
            tensor,
        }
    }

    /// Capitalized emotion label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.emotion.label()
    }

    /// Score formatted as a whole percentage, e.g. `"60%"`.
    #[must_use]
    pub fn percent(&self) -> String {
        format!("{:.0}%", self.score * 100.0)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.emoji, self.label(), self.percent())
    }
}
