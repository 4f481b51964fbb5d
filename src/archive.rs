//! Raw message archiving
//!
//! Each message is written as UTF-8 text to `<uid>.txt`. Saving the
//! same message twice overwrites the earlier copy.

use crate::error::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes raw messages into a single directory.
#[derive(Debug, Clone)]
pub struct Archiver {
    dir: PathBuf,
}

impl Archiver {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Archive into the process's working directory.
    #[must_use]
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name used for a message: `<uid>.txt`.
    #[must_use]
    pub fn file_name(id: impl fmt::Display) -> String {
        format!("{id}.txt")
    }

    /// Write `body` to `<dir>/<id>.txt` and return the path written.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the file cannot be written.
    pub async fn save(&self, id: impl fmt::Display, body: &str) -> Result<PathBuf> {
        let path = self.dir.join(Self::file_name(&id));
        tokio::fs::write(&path, body).await?;
        info!("Saved message {} to {}", id, path.display());
        Ok(path)
    }
}
