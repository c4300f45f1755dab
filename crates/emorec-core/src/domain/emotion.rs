//! The fixed emotion class table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of emotion classes the classifier distinguishes.
pub const NUM_EMOTIONS: usize = 7;

/// One of the seven facial-emotion classes.
///
/// Variant order matches the classifier output index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    /// Index 0.
    Anger,
    /// Index 1.
    Disgust,
    /// Index 2.
    Fear,
    /// Index 3.
    Happiness,
    /// Index 4.
    Neutral,
    /// Index 5.
    Sadness,
    /// Index 6.
    Surprise,
}

impl Emotion {
    /// All classes in classifier index order.
    pub const ALL: [Self; NUM_EMOTIONS] = [
        Self::Anger,
        Self::Disgust,
        Self::Fear,
        Self::Happiness,
        Self::Neutral,
        Self::Sadness,
        Self::Surprise,
    ];

    /// Returns the class for a classifier output index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the classifier output index of this class.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase class name, e.g. `"happiness"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Anger => "anger",
            Self::Disgust => "disgust",
            Self::Fear => "fear",
            Self::Happiness => "happiness",
            Self::Neutral => "neutral",
            Self::Sadness => "sadness",
            Self::Surprise => "surprise",
        }
    }

    /// Capitalized display label, e.g. `"Happiness"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Anger => "Anger",
            Self::Disgust => "Disgust",
            Self::Fear => "Fear",
            Self::Happiness => "Happiness",
            Self::Neutral => "Neutral",
            Self::Sadness => "Sadness",
            Self::Surprise => "Surprise",
        }
    }

    /// Emoji shown alongside the label.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Anger => "😡",
            Self::Disgust => "🤢",
            Self::Fear => "😱",
            Self::Happiness => "😀",
            Self::Neutral => "😐",
            Self::Sadness => "😞",
            Self::Surprise => "😲",
        }
    }

    /// One-sentence description of the emotion.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Anger => {
                "Anger is an intense emotion that arises when we feel frustrated, threatened, or wronged."
            }
            Self::Disgust => {
                "Disgust is an emotion that arises when we encounter something revolting or offensive."
            }
            Self::Fear => "Fear is a strong emotion that arises when we perceive a threat or danger.",
            Self::Happiness => {
                "We feel happiness when good things happen to us and we live pleasant moments."
            }
            Self::Neutral => {
                "Neutral describes a state of being neither positive nor negative, without strong emotional expression."
            }
            Self::Sadness => {
                "We experience sadness when we feel a deep sense of sorrow, disappointment, or loss."
            }
            Self::Surprise => {
                "Surprise is an emotion we experience when something unexpected or astonishing happens."
            }
        }
    }

    /// Steps for expressing the emotion in practice mode.
    #[must_use]
    pub const fn instructions(self) -> [&'static str; 4] {
        match self {
            Self::Anger => [
                "Tighten your lips, pressing them firmly together.",
                "Narrow your eyes, creating an intense and piercing gaze.",
                "Tense your facial muscles, emphasizing your jawline and forehead.",
                "Channel your anger with a forceful exhale or growl.",
            ],
            Self::Disgust => [
                "Curl your upper lip slightly, as if you are smelling something unpleasant.",
                "Wrinkle your nose, creating a crinkled appearance.",
                "Narrow your eyes and furrow your brow, conveying a sense of distaste.",
                "Gently retch or gag to express disgust.",
            ],
            Self::Fear => [
                "Tense your facial muscles, particularly around your eyes and forehead.",
                "Widely open your eyes, making them appear larger.",
                "Slightly part your lips, as if you are holding your breath.",
                "Take quick, shallow breaths or let out a high-pitched scream to convey fear.",
            ],
            Self::Happiness => [
                "Smile.",
                "Brighten your eyes.",
                "Relax your facial muscles.",
                "Add a gentle laugh.",
            ],
            Self::Neutral => [
                "Keep your facial muscles relaxed and in a neutral position.",
                "Maintain a relaxed gaze, without any specific intensity or brightness.",
                "Keep your lips in a natural, neutral position without any distinct expression.",
                "Maintain a calm and steady breath, without any additional laughter or sighs.",
            ],
            Self::Sadness => [
                "Allow your smile to fade.",
                "Soften your gaze, making your eyes appear less bright.",
                "Let your facial muscles relax, showing a slight droop or heaviness.",
                "Avoid laughter and let out a gentle sigh or a quiet sob.",
            ],
            Self::Surprise => [
                "Part your lips slightly, creating an \"O\" shape.",
                "Widen your eyes, allowing your eyebrows to raise in a startled manner.",
                "Open your mouth slightly, as if gasping or catching your breath.",
                "Let out a short and sharp intake of air to express surprise.",
            ],
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown emotion name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown emotion '{0}' (expected one of: anger, disgust, fear, happiness, neutral, sadness, surprise)")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.name() == wanted)
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}
