//! Practice mode: did the face show the emotion the user aimed for?

use serde::{Deserialize, Serialize};

use crate::domain::{Emotion, Prediction};

/// Outcome of one practice attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeOutcome {
    /// Emotion the user tried to express.
    pub target: Emotion,
    /// Emotion the classifier saw.
    pub predicted: Emotion,
    /// Confidence of the predicted emotion.
    pub score: f32,
    /// Whether the prediction matches the target.
    pub matched: bool,
}

impl PracticeOutcome {
    /// Compares a prediction against the target emotion.
    #[must_use]
    pub fn evaluate(target: Emotion, prediction: &Prediction) -> Self {
        Self {
            target,
            predicted: prediction.emotion,
            score: prediction.score,
            matched: prediction.emotion == target,
        }
    }

    /// Short feedback line for display.
    #[must_use]
    pub fn feedback(&self) -> String {
        if self.matched {
            format!(
                "{} Nice! That looks like {} ({:.0}%).",
                self.target.emoji(),
                self.target.name(),
                self.score * 100.0
            )
        } else {
            format!(
                "{} That looks more like {} ({:.0}%). Try again for {}.",
                self.predicted.emoji(),
                self.predicted.name(),
                self.score * 100.0,
                self.target.name()
            )
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::{InputTensor, ScoreVector};

    fn prediction(scores: &[f32]) -> Prediction {
        let scores = ScoreVector::new(scores).unwrap();
        Prediction::from_scores(&scores, InputTensor::from_fn(|_, _, _| 0.0))
    }

    #[test]
    fn test_matched() {
        let p = prediction(&[0.1, 0.05, 0.05, 0.6, 0.1, 0.05, 0.05]);
        let outcome = PracticeOutcome::evaluate(Emotion::Happiness, &p);
        assert!(outcome.matched);
        assert_eq!(outcome.predicted, Emotion::Happiness);
        assert!(outcome.feedback().contains("Nice"));
    }

    #[test]
    fn test_mismatched() {
        let p = prediction(&[2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 3.0]);
        let outcome = PracticeOutcome::evaluate(Emotion::Fear, &p);
        assert!(!outcome.matched);
        assert_eq!(outcome.predicted, Emotion::Surprise);
        assert!(outcome.feedback().contains("Try again for fear"));
    }
}
