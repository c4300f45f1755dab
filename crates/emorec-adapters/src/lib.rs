//! Emorec Adapters - External adapters for emorec.
//!
//! This crate provides adapters for:
//! - Filesystem and in-memory (stdin) image sources
//! - Model storage and download

pub mod fs;
pub mod memory;
pub mod models;

pub use fs::FsImageSource;
pub use memory::{MemoryImageSource, STDIN_PATH};
pub use models::{model_path, models_dir, ModelSource, ModelStatus};
