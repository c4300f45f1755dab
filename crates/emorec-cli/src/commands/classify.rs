//! Classify command - predict the emotion shown in face images.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use emorec_adapters::{model_path, models_dir, FsImageSource, MemoryImageSource, STDIN_PATH};
use emorec_core::inference::{select_device, DevicePreference, EmotionNet, LazyModel};
use emorec_core::{
    ClassificationRecord, Emotion, EmotionModel, EmotionPipeline, ImageSource, PracticeOutcome,
    Preprocessor, ProgressEvent, ProgressSink, ResizeFilter, ResultOutput,
};
use tracing::{debug, info, warn};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Shared arguments for classifying images.
#[derive(Args, Clone, Default)]
pub struct ClassifyArgs {
    /// Image files or directories to classify (`-` reads one image from stdin)
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Weights file to use instead of the one in the models directory
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,

    /// Resize filter: triangle, catmull_rom, gaussian or lanczos3
    #[arg(long)]
    pub filter: Option<ResizeFilter>,

    /// Inference device: auto or cpu
    #[arg(long)]
    pub device: Option<DevicePreference>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Write each preprocessed 48x48 input as a PNG into DIR
    #[arg(long, value_name = "DIR")]
    pub dump_tensors: Option<PathBuf>,
}

impl ClassifyArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        args.filter = args.filter.or_else(|| config.filter());
        args.device = args.device.or_else(|| config.device());

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(|s| OutputFormat::from_str(s, true).ok());
        }

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        if args.model.is_none() {
            args.model.clone_from(&config.models.file);
        }
        if args.models_dir.is_none() {
            args.models_dir.clone_from(&config.models.dir);
        }

        args
    }

    /// Output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    /// Resize filter with fallback to bilinear.
    fn filter(&self) -> ResizeFilter {
        self.filter.unwrap_or_default()
    }

    /// Weights file: explicit `--model`, else inside the models directory.
    fn weights_path(&self) -> PathBuf {
        self.model.clone().unwrap_or_else(|| {
            let dir = self.models_dir.clone().unwrap_or_else(models_dir);
            model_path(&dir)
        })
    }
}

/// Options for one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Directory to dump preprocessed inputs into.
    pub dump_dir: Option<PathBuf>,
    /// Practice target, when running `practice`.
    pub target: Option<Emotion>,
}

/// Result of running a batch.
#[allow(dead_code)] // Counts exposed for programmatic use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of images classified.
    pub processed: usize,
    /// Number of images skipped.
    pub skipped: usize,
    /// Number of practice attempts that matched the target.
    pub matched: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the classify command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &ClassifyArgs) -> Result<RunSummary> {
    run_batch(args, None)
}

/// Classify every image named by `args`, optionally scoring against a
/// practice target.
pub fn run_batch(args: &ClassifyArgs, target: Option<Emotion>) -> Result<RunSummary> {
    info!("Classifying images from {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let sources = build_sources(&args.paths, args.recursive)?;
    let total = sources
        .iter()
        .map(|s| s.count_hint())
        .sum::<Option<usize>>();

    let weights = args.weights_path();
    let device = select_device(args.device.unwrap_or_default());
    let model = LazyModel::new(&weights, device, EmotionNet::new);

    if total != Some(0) {
        if !weights.is_file() {
            anyhow::bail!(
                "Model weights not found at {}. Run `emorec models fetch` or pass --model.",
                weights.display()
            );
        }
        model
            .get()
            .with_context(|| format!("Failed to load emotion model {}", weights.display()))?;
    }

    if let Some(dir) = &args.dump_tensors {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create dump directory {}", dir.display()))?;
    }

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);
    let output = JsonOutput::stdout().with_pretty(args.pretty);

    let pipeline = EmotionPipeline::with_preprocessor(model, Preprocessor::new(args.filter()));
    debug!("Using resize filter {}", args.filter());

    let options = BatchOptions {
        format: args.format(),
        dump_dir: args.dump_tensors.clone(),
        target,
    };

    process_images(&sources, &pipeline, &output, &progress, &options)
}

/// Splits the path list into sources, keeping argument order.
///
/// Consecutive filesystem paths share one source; `-` becomes a source
/// holding the image read from stdin.
fn build_sources(paths: &[PathBuf], recursive: bool) -> Result<Vec<Box<dyn ImageSource>>> {
    let mut sources: Vec<Box<dyn ImageSource>> = Vec::new();
    let mut pending: Vec<PathBuf> = Vec::new();
    let mut read_stdin = false;

    for path in paths {
        if path.as_os_str() == STDIN_PATH {
            if read_stdin {
                anyhow::bail!("`-` (stdin) may only be given once");
            }
            read_stdin = true;

            if !pending.is_empty() {
                sources.push(Box::new(FsImageSource::new(std::mem::take(&mut pending), recursive)));
            }
            let stdin = MemoryImageSource::from_reader(std::io::stdin().lock())?;
            sources.push(Box::new(stdin));
        } else {
            pending.push(path.clone());
        }
    }

    if !pending.is_empty() {
        sources.push(Box::new(FsImageSource::new(pending, recursive)));
    }

    Ok(sources)
}

/// Classify every image from `sources`, writing one record per success.
///
/// Sources are iterated once. JSONL records are written as they are
/// produced; JSON output is written as one batch at the end.
pub fn process_images<M: EmotionModel>(
    sources: &[Box<dyn ImageSource>],
    pipeline: &EmotionPipeline<M>,
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
    options: &BatchOptions,
) -> Result<RunSummary> {
    let total = sources
        .iter()
        .map(|s| s.count_hint())
        .sum::<Option<usize>>();
    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut matched = 0usize;
    let mut all_records: Vec<ClassificationRecord> = Vec::new();

    let items = sources.iter().flat_map(|s| s.images());
    for (index, item) in items.enumerate() {
        progress.on_event(ProgressEvent::Started {
            path: item.path.clone(),
            index,
            total,
        });

        let image = match item.image {
            Ok(img) => img,
            Err(e) => {
                progress.on_event(ProgressEvent::Skipped {
                    path: item.path,
                    reason: format!("{e:#}"),
                });
                skipped += 1;
                continue;
            }
        };

        let prediction = match pipeline.classify(&image) {
            Ok(p) => p,
            Err(e) => {
                progress.on_event(ProgressEvent::Skipped {
                    path: item.path,
                    reason: e.to_string(),
                });
                skipped += 1;
                continue;
            }
        };
        debug!("{}: {prediction}", item.path);

        if let Some(dir) = &options.dump_dir {
            let dest = dir.join(dump_file_name(index, &item.path));
            if let Err(e) = prediction.tensor.to_image().save(&dest) {
                warn!("Failed to dump tensor to {}: {e}", dest.display());
            }
        }

        let practice = options
            .target
            .map(|target| PracticeOutcome::evaluate(target, &prediction));
        if practice.as_ref().is_some_and(|p| p.matched) {
            matched += 1;
        }

        let record = ClassificationRecord {
            path: item.path,
            timestamp: iso_timestamp(),
            dimensions: image.dimensions(),
            prediction: (&prediction).into(),
            practice,
        };

        progress.on_event(ProgressEvent::Completed {
            record: Box::new(record.clone()),
        });

        match options.format {
            OutputFormat::Jsonl => output.write(&record)?,
            OutputFormat::Json => all_records.push(record),
        }

        processed += 1;
    }

    if options.format == OutputFormat::Json {
        output.write_batch(&all_records)?;
    }

    output.flush()?;

    progress.on_event(ProgressEvent::Finished { processed, skipped });

    let exit_code = if options.target.is_some() && matched == 0 {
        ExitCode::NoMatch
    } else if skipped > 0 {
        ExitCode::Skipped
    } else {
        ExitCode::Success
    };

    Ok(RunSummary {
        processed,
        skipped,
        matched,
        exit_code,
    })
}

/// File name for a dumped input: batch index plus the source file stem.
fn dump_file_name(index: usize, path: &str) -> String {
    let stem = if path == STDIN_PATH {
        "stdin".to_string()
    } else {
        Path::new(path)
            .file_stem()
            .map_or_else(|| "image".to_string(), |s| s.to_string_lossy().into_owned())
    };
    format!("{index:04}-{stem}.png")
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
