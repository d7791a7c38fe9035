//! The durable key-value port behind progress persistence.
//!
//! A store holds one opaque blob. Reads and writes cover the whole
//! blob; there is no partial update and no locking, so the
//! read-modify-write cycles in [`super::ProgressLog`] assume a single
//! writer.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Mutex;

/// Whole-blob read/write port for persisted progress
pub trait ProgressStore {
    /// The stored blob, or None when nothing was saved yet
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, blob: &str) -> Result<()>;
    fn delete(&self) -> Result<()>;
}

/// Stores the blob in a single JSON file on disk
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// A store at the platform-default progress path
    pub fn at_default_path() -> Result<Self> {
        Ok(Self::new(super::default_progress_path()?))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ProgressStore for FileStore {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let blob = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Ok(Some(blob))
    }

    fn write(&self, blob: &str) -> Result<()> {
        std::fs::write(&self.path, blob)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    fn delete(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to delete {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// In-memory store for tests and embedders without a filesystem
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.blob.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn write(&self, blob: &str) -> Result<()> {
        *self.blob.lock().unwrap_or_else(|e| e.into_inner()) = Some(blob.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        *self.blob.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
