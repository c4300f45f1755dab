//! Model storage and download adapter.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

/// Name of the emotion classifier model.
pub const MODEL_NAME: &str = "emotion-net";

/// Filename of the emotion classifier weights inside the models directory.
pub const MODEL_FILENAME: &str = "emotion-net.safetensors";

const CHUNK_SIZE: usize = 64 * 1024;

/// Where to fetch the weights from, and what they should hash to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    /// Download URL.
    pub url: String,
    /// Expected lowercase hex SHA-256, if known.
    pub sha256: Option<String>,
}

/// Installation status of a model file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStatus {
    /// Model name.
    pub name: &'static str,
    /// Full path of the weights file.
    pub path: PathBuf,
    /// File size in bytes, when installed.
    pub size: Option<u64>,
}

impl ModelStatus {
    /// Returns true when the weights file exists.
    #[must_use]
    pub const fn installed(&self) -> bool {
        self.size.is_some()
    }
}

/// Called with `(bytes_downloaded, total_bytes)` as a download progresses.
pub type ProgressCallback<'a> = &'a mut dyn FnMut(u64, Option<u64>);

/// Returns the default models directory.
///
/// Uses `XDG_DATA_HOME/emorec/models` or `~/.local/share/emorec/models`.
#[must_use]
pub fn models_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("emorec")
        .join("models")
}

/// Returns the path of the weights file inside `dir`.
#[must_use]
pub fn model_path(dir: &Path) -> PathBuf {
    dir.join(MODEL_FILENAME)
}

/// Lists known models and whether they are installed in `dir`.
#[must_use]
pub fn list_models(dir: &Path) -> Vec<ModelStatus> {
    let path = model_path(dir);
    let size = fs::metadata(&path).ok().filter(|m| m.is_file()).map(|m| m.len());
    vec![ModelStatus {
        name: MODEL_NAME,
        path,
        size,
    }]
}

/// Downloads the weights into `dir` unless they are already present.
///
/// Returns the path of the weights file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the download fails,
/// or the checksum does not match.
pub fn ensure_model(
    dir: &Path,
    source: &ModelSource,
    force: bool,
    on_progress: ProgressCallback<'_>,
) -> Result<PathBuf> {
    let path = model_path(dir);
    if path.is_file() && !force {
        debug!("Model {MODEL_NAME} already exists at {}", path.display());
        return Ok(path);
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create models directory: {}", dir.display()))?;
    download_model(source, &path, on_progress)?;
    Ok(path)
}

/// Downloads a model to `dest`, verifying its checksum when one is given.
///
/// The body is streamed to a sibling `.part` file that is renamed into
/// place only after the checksum matched.
///
/// # Errors
///
/// Returns an error on HTTP failure, I/O failure or checksum mismatch.
pub fn download_model(source: &ModelSource, dest: &Path, on_progress: ProgressCallback<'_>) -> Result<()> {
    info!("Downloading model {MODEL_NAME} from {}", source.url);

    let mut response = reqwest::blocking::get(&source.url)
        .with_context(|| format!("Failed to download {}", source.url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status: {}", response.status());
    }

    let total = response.content_length();
    save_verified(&mut response, dest, source.sha256.as_deref(), total, on_progress)?;

    info!("Downloaded {MODEL_NAME} to {}", dest.display());
    Ok(())
}

/// Streams `reader` into `dest` through a `.part` file, verifying the
/// checksum before the rename. The partial file is removed on any failure.
fn save_verified(
    reader: &mut impl Read,
    dest: &Path,
    expected_sha256: Option<&str>,
    total: Option<u64>,
    on_progress: ProgressCallback<'_>,
) -> Result<()> {
    let partial = dest.with_extension("safetensors.part");

    let result = stream_to_file(reader, &partial, total, on_progress)
        .and_then(|digest| verify_checksum(expected_sha256, &digest))
        .and_then(|()| {
            fs::rename(&partial, dest)
                .with_context(|| format!("Failed to move model into {}", dest.display()))
        });

    if result.is_err() {
        remove_partial(&partial);
    }
    result
}

/// Copies `reader` into `path`, returning the SHA-256 of what was written.
fn stream_to_file(
    reader: &mut impl Read,
    path: &Path,
    total: Option<u64>,
    on_progress: ProgressCallback<'_>,
) -> Result<String> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut downloaded = 0u64;

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read response for {MODEL_NAME}"))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        writer
            .write_all(&buf[..n])
            .with_context(|| format!("Failed to write {}", path.display()))?;
        downloaded += n as u64;
        on_progress(downloaded, total);
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(format!("{:x}", hasher.finalize()))
}

fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed partial download {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial download {}: {e}", path.display()),
    }
}

/// Computes the SHA-256 of a file as lowercase hex.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(format!("{:x}", hasher.finalize()))
}

fn verify_checksum(expected: Option<&str>, actual: &str) -> Result<()> {
    match expected {
        None => {
            debug!("No checksum given for {MODEL_NAME}, skipping verification");
            Ok(())
        }
        Some(expected) if expected.trim().eq_ignore_ascii_case(actual) => Ok(()),
        Some(expected) => anyhow::bail!(
            "Checksum mismatch for {MODEL_NAME}: expected {}, got {actual}",
            expected.trim()
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_models_dir() {
        assert!(models_dir().ends_with("emorec/models"));
    }

    #[test]
    fn test_model_path() {
        let path = model_path(Path::new("/tmp/models"));
        assert_eq!(path, PathBuf::from("/tmp/models/emotion-net.safetensors"));
    }

    #[test]
    fn test_list_models_reports_size() {
        let dir = tempfile::tempdir().unwrap();
        let listed = list_models(dir.path());
        assert_eq!(listed.len(), 1);
        assert!(!listed[0].installed());

        fs::write(model_path(dir.path()), [0u8; 12]).unwrap();
        let listed = list_models(dir.path());
        assert_eq!(listed[0].size, Some(12));
    }

    #[test]
    fn test_verify_checksum() {
        assert!(verify_checksum(None, "abc").is_ok());
        assert!(verify_checksum(Some("ABC"), "abc").is_ok());
        assert!(verify_checksum(Some("abd"), "abc").is_err());
    }

    #[test]
    fn test_file_sha256() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();
        assert_eq!(file_sha256(&path).unwrap(), EMPTY_SHA256);
    }

    #[test]
    fn test_ensure_model_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(model_path(dir.path()), b"weights").unwrap();
        let source = ModelSource {
            url: "http://127.0.0.1:9/unreachable".to_string(),
            sha256: None,
        };
        let path = ensure_model(dir.path(), &source, false, &mut |_, _| {}).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"weights");
    }

    /// Yields some bytes, then fails like a dropped connection.
    struct BrokenStream {
        sent: bool,
    }

    impl Read for BrokenStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.sent {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                ));
            }
            self.sent = true;
            buf[..4].copy_from_slice(b"safe");
            Ok(4)
        }
    }

    #[test]
    fn test_read_error_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = model_path(dir.path());
        let mut progress = Vec::new();

        let err = save_verified(
            &mut BrokenStream { sent: false },
            &dest,
            None,
            Some(100),
            &mut |done, _| progress.push(done),
        )
        .unwrap_err();

        assert!(format!("{err:#}").contains("connection reset"));
        assert_eq!(progress, [4]);
        assert!(!dest.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_save_verified_moves_file_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let dest = model_path(dir.path());

        save_verified(&mut &b""[..], &dest, Some(EMPTY_SHA256), Some(0), &mut |_, _| {}).unwrap();

        assert!(dest.exists());
        assert!(!dest.with_extension("safetensors.part").exists());
    }

    #[test]
    fn test_remove_partial_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        remove_partial(&dir.path().join("never-created.part"));
    }
}
