//! CLI command definitions and handlers.

pub mod classify;
pub mod emotions;
pub mod models;
pub mod practice;

use clap::{Parser, Subcommand};

/// emorec - Facial emotion recognition
#[derive(Parser)]
#[command(name = "emorec")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Shared classify arguments (paths, model, output flags).
    #[command(flatten)]
    pub classify: classify::ClassifyArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Classify the emotion shown in face images
    Classify(classify::ClassifyArgs),
    /// Practice an expression and check whether it reads as intended
    Practice(practice::PracticeArgs),
    /// List the emotions the model recognizes
    Emotions(emotions::EmotionsArgs),
    /// Manage model weights
    Models(models::ModelsArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every image was classified.
    Success,
    /// At least one image was skipped.
    Skipped,
    /// No practice attempt matched the target emotion.
    NoMatch,
    /// Fatal error: bad arguments, missing model, I/O failure.
    Error,
}

impl ExitCode {
    /// Numeric process status.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Skipped | Self::NoMatch => 1,
            Self::Error => 2,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code.code())
    }
}
