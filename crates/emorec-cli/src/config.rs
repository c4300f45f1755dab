//! Configuration file support for emorec.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/emorec/config.toml` (lowest priority)
//! - Project-local: `.emorec.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use emorec_core::inference::DevicePreference;
use emorec_core::ResizeFilter;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Name of the project-local config file.
const PROJECT_CONFIG: &str = ".emorec.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Preprocessing settings.
    pub preprocess: PreprocessConfig,
    /// Model settings.
    pub models: ModelsConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
    /// Inference device: "auto" or "cpu".
    pub device: Option<String>,
}

/// Preprocessing configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Resize filter name.
    pub filter: Option<String>,
}

/// Model configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Custom models directory path.
    pub dir: Option<PathBuf>,
    /// Explicit weights file, bypassing the models directory.
    pub file: Option<PathBuf>,
    /// Download URL used by `models fetch`.
    pub url: Option<String>,
    /// Expected SHA-256 of the downloaded weights.
    pub sha256: Option<String>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Missing files are silently ignored. Invalid values are logged as
    /// warnings and dropped.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        for problem in config.sanitize() {
            eprintln!("warning: {problem}");
        }

        config
    }

    /// Validate configuration values.
    fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(ref d) = self.general.device {
            if let Err(e) = d.parse::<DevicePreference>() {
                problems.push(format!("general.device: {e}"));
            }
        }

        if let Some(ref f) = self.preprocess.filter {
            if let Err(e) = f.parse::<ResizeFilter>() {
                problems.push(format!("preprocess.filter: {e}"));
            }
        }

        if let Some(ref h) = self.models.sha256 {
            if !is_sha256_hex(h) {
                problems.push(format!(
                    "models.sha256 must be 64 hex characters, got '{h}'"
                ));
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                problems.push(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        problems
    }

    /// Drops invalid values, returning what was wrong with them.
    fn sanitize(&mut self) -> Vec<String> {
        let problems = self.validate();
        if problems.is_empty() {
            return problems;
        }

        if self.general.device.as_deref().is_some_and(|d| d.parse::<DevicePreference>().is_err()) {
            self.general.device = None;
        }
        if self.preprocess.filter.as_deref().is_some_and(|f| f.parse::<ResizeFilter>().is_err()) {
            self.preprocess.filter = None;
        }
        if self.models.sha256.as_deref().is_some_and(|h| !is_sha256_hex(h)) {
            self.models.sha256 = None;
        }
        if self.output.format.as_deref().is_some_and(|f| f != "json" && f != "jsonl") {
            self.output.format = None;
        }

        warn!("Ignored {} invalid config value(s)", problems.len());
        problems
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // General
        self.general.recursive = other.general.recursive.or(self.general.recursive);
        self.general.device = other.general.device.or_else(|| self.general.device.take());

        // Preprocess
        self.preprocess.filter = other
            .preprocess
            .filter
            .or_else(|| self.preprocess.filter.take());

        // Models
        self.models.dir = other.models.dir.or_else(|| self.models.dir.take());
        self.models.file = other.models.file.or_else(|| self.models.file.take());
        self.models.url = other.models.url.or_else(|| self.models.url.take());
        self.models.sha256 = other.models.sha256.or_else(|| self.models.sha256.take());

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }

    /// Parsed resize filter, if configured and valid.
    pub fn filter(&self) -> Option<ResizeFilter> {
        self.preprocess.filter.as_deref().and_then(|f| f.parse().ok())
    }

    /// Parsed device preference, if configured and valid.
    pub fn device(&self) -> Option<DevicePreference> {
        self.general.device.as_deref().and_then(|d| d.parse().ok())
    }
}

/// Checks for a 64-character hex digest.
pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("emorec").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.emorec.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_CONFIG);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
