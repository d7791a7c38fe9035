pub mod progress;
pub mod store;

pub use progress::{CURRENT_VERSION, ProgressLog};
pub use store::{FileStore, MemoryStore, ProgressStore};

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the path to the progress file using the platform data directory
pub fn default_progress_path() -> Result<PathBuf> {
    let mut path =
        dirs::data_dir().context("Unable to determine data directory for your platform")?;

    path.push("quiz-trainer");

    // Create directory if it doesn't exist
    std::fs::create_dir_all(&path).context("Failed to create quiz-trainer data directory")?;

    path.push("progress.json");
    Ok(path)
}
