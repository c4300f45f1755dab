//! Shared fixtures for CLI integration tests.

#![allow(dead_code, deprecated, clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use emorec_test_support::{write_biased_weights, write_image, write_uniform_weights, SyntheticImageBuilder};
use tempfile::TempDir;

/// Index of happiness in the class table.
pub const HAPPINESS: usize = 3;

/// A scratch directory with images, weights and an isolated config home.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("xdg-config")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Weights that predict anger with 1/7 confidence for every image.
    pub fn uniform_weights(&self) -> PathBuf {
        let path = self.path().join("uniform.safetensors");
        write_uniform_weights(&path).unwrap();
        path
    }

    /// Weights that predict happiness with about 96% confidence.
    pub fn happy_weights(&self) -> PathBuf {
        let path = self.path().join("happy.safetensors");
        write_biased_weights(&path, HAPPINESS).unwrap();
        path
    }

    /// Writes a synthetic face image under `name`.
    pub fn face(&self, name: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        write_image(&SyntheticImageBuilder::face(96), &path).unwrap();
        path
    }

    /// Writes a file that claims to be a PNG but is not decodable.
    pub fn corrupt(&self, name: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, b"\x89PNG\r\n\x1a\n not really").unwrap();
        path
    }

    pub fn write_config(&self, toml: &str) {
        std::fs::write(self.path().join(".emorec.toml"), toml).unwrap();
    }

    /// The `emorec` binary, run inside the workspace with user config isolated.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("emorec").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg-config"))
            .env("XDG_DATA_HOME", self.path().join("xdg-data"))
            .env_remove("RUST_LOG");
        cmd
    }
}

/// Parses each non-empty stdout line as JSON.
pub fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}
