//! Models command - manage the emotion model weights.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use emorec_adapters::models::{
    ensure_model, file_sha256, list_models as adapter_list_models, models_dir, ModelSource,
};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{is_sha256_hex, AppConfig};

/// Arguments for the models command
#[derive(Args, Clone)]
pub struct ModelsArgs {
    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR", global = true)]
    pub models_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Models subcommands
#[derive(Subcommand, Clone)]
pub enum ModelsCommand {
    /// Download the emotion model weights
    Fetch {
        /// Download URL (overrides `[models] url` in config)
        #[arg(long)]
        url: Option<String>,

        /// Expected SHA-256 of the weights file
        #[arg(long, value_parser = parse_sha256)]
        sha256: Option<String>,

        /// Download again even if the weights are already installed
        #[arg(long)]
        force: bool,
    },
    /// List installed models
    List,
    /// Print model directory path
    Path,
}

fn parse_sha256(s: &str) -> Result<String, String> {
    if is_sha256_hex(s) {
        Ok(s.to_lowercase())
    } else {
        Err(format!("'{s}' is not a 64-character hex SHA-256"))
    }
}

impl ModelsArgs {
    fn dir(&self, config: &AppConfig) -> PathBuf {
        self.models_dir
            .clone()
            .or_else(|| config.models.dir.clone())
            .unwrap_or_else(models_dir)
    }
}

/// Run the models command.
pub fn run(args: &ModelsArgs, config: &AppConfig) -> Result<()> {
    let dir = args.dir(config);
    match &args.command {
        ModelsCommand::Fetch { url, sha256, force } => {
            let url = url
                .clone()
                .or_else(|| config.models.url.clone())
                .context("No download URL. Pass --url or set `url` under [models] in the config")?;
            let source = ModelSource {
                url,
                sha256: sha256.clone().or_else(|| config.models.sha256.clone()),
            };
            fetch_model(&dir, &source, *force)
        }
        ModelsCommand::List => list_models(&dir),
        ModelsCommand::Path => {
            println!("{}", dir.display());
            Ok(())
        }
    }
}

fn fetch_model(dir: &std::path::Path, source: &ModelSource, force: bool) -> Result<()> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
            .map_err(|e| anyhow::anyhow!("Invalid progress template: {e}"))?
            .progress_chars("#>-"),
    );
    pb.set_message("emotion-net");

    let mut on_progress = |downloaded: u64, total: Option<u64>| {
        if let Some(t) = total {
            pb.set_length(t);
        }
        pb.set_position(downloaded);
    };

    let path = ensure_model(dir, source, force, &mut on_progress)?;

    pb.finish_with_message("emotion-net ready");
    println!("{}", path.display());
    Ok(())
}

fn list_models(dir: &std::path::Path) -> Result<()> {
    let models = adapter_list_models(dir);

    println!("Models directory: {}", dir.display());
    println!();

    for model in &models {
        let status = if model.installed() { "✓" } else { "✗" };
        let filename = model
            .path
            .file_name()
            .map_or_else(String::new, |f| f.to_string_lossy().into_owned());
        match model.size {
            Some(size) => {
                let digest = file_sha256(&model.path)?;
                println!("  {status} {} ({filename}, {size} bytes, sha256 {digest})", model.name);
            }
            None => println!("  {status} {} ({filename})", model.name),
        }
    }

    println!();
    let installed_count = models.iter().filter(|m| m.installed()).count();
    println!("{}/{} models installed", installed_count, models.len());

    Ok(())
}
