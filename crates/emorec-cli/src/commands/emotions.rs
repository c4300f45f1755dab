//! Emotions command - list the emotion catalog.

use anyhow::Result;
use clap::Args;
use emorec_core::Emotion;
use serde_json::json;

/// Arguments for the emotions command.
#[derive(Args, Clone, Default)]
pub struct EmotionsArgs {
    /// Include the step-by-step instructions for each expression
    #[arg(long)]
    pub instructions: bool,

    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the emotions command.
pub fn run(args: &EmotionsArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog_json(args.instructions))?);
        return Ok(());
    }

    for emotion in Emotion::ALL {
        println!(
            "{} {:<10} {}",
            emotion.emoji(),
            emotion.label(),
            emotion.description()
        );
        if args.instructions {
            for (i, step) in emotion.instructions().iter().enumerate() {
                println!("     {}. {step}", i + 1);
            }
            println!();
        }
    }

    Ok(())
}

fn catalog_json(instructions: bool) -> serde_json::Value {
    Emotion::ALL
        .iter()
        .map(|e| {
            let mut entry = json!({
                "emotion": e,
                "label": e.label(),
                "emoji": e.emoji(),
                "description": e.description(),
            });
            if instructions {
                entry["instructions"] = json!(e.instructions());
            }
            entry
        })
        .collect()
}
