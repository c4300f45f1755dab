//! Practice command - check whether faces show a chosen emotion.

use anyhow::Result;
use clap::Args;
use emorec_core::Emotion;
use tracing::info;

use super::classify::{self, ClassifyArgs, RunSummary};
use crate::config::AppConfig;

/// Arguments for the practice command.
#[derive(Args, Clone)]
pub struct PracticeArgs {
    /// Emotion to practice (anger, disgust, fear, happiness, neutral, sadness, surprise)
    #[arg(short, long)]
    pub target: Emotion,

    /// Show how to make the target expression before classifying
    #[arg(long)]
    pub instructions: bool,

    #[command(flatten)]
    pub classify: ClassifyArgs,
}

impl PracticeArgs {
    /// Apply configuration file values to the shared classify arguments.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.classify = ClassifyArgs::with_config(args.classify, config);
        args
    }
}

/// Run the practice command.
pub fn run(args: &PracticeArgs) -> Result<RunSummary> {
    let target = args.target;
    info!("Practicing {target}");

    if args.instructions && !args.classify.quiet {
        eprintln!("{} {}: {}", target.emoji(), target.label(), target.description());
        for (i, step) in target.instructions().iter().enumerate() {
            eprintln!("  {}. {step}", i + 1);
        }
    }

    classify::run_batch(&args.classify, Some(target))
}
