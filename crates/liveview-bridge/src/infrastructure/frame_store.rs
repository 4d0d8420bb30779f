//! Access to the frame images the UI writes to disk.
//!
//! The UI periodically renders itself to `<dir>/<prefix><stamp>.<ext>`.  Stamps
//! sort lexicographically in write order, so "newest" means the greatest
//! matching file name.  The bridge never writes frames; it only serves the
//! newest one to viewers and clears leftovers at startup.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

/// Errors from [`FrameStore`].
#[derive(Debug, Error)]
pub enum FrameStoreError {
    /// No file matching the frame pattern exists.
    #[error("no frame available in {dir}")]
    NotFound { dir: PathBuf },

    #[error("frame I/O failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A frame image read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// File name, without the directory.
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Locates frame images by directory, prefix, and extension.
#[derive(Debug, Clone)]
pub struct FrameStore {
    dir: PathBuf,
    prefix: String,
    extension: String,
}

impl FrameStore {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns `true` if `name` follows the frame naming pattern.
    pub fn matches(&self, name: &str) -> bool {
        name.strip_prefix(&self.prefix)
            .and_then(|rest| rest.strip_suffix(&self.extension))
            .and_then(|stem| stem.strip_suffix('.'))
            .is_some()
    }

    /// Reads the newest frame.
    ///
    /// A missing directory counts as "no frames yet".
    pub async fn fetch_newest(&self) -> Result<Frame, FrameStoreError> {
        let mut names = self.list().await?;
        names.sort();
        let name = names.pop().ok_or_else(|| FrameStoreError::NotFound {
            dir: self.dir.clone(),
        })?;

        let path = self.dir.join(&name);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Frame { name, bytes }),
            // Removed between listing and reading.
            Err(e) if e.kind() == ErrorKind::NotFound => Err(FrameStoreError::NotFound {
                dir: self.dir.clone(),
            }),
            Err(source) => Err(FrameStoreError::Io { path, source }),
        }
    }

    /// Deletes every frame file and returns how many were removed.
    ///
    /// A file that cannot be removed is logged and skipped.
    pub async fn purge_all(&self) -> Result<usize, FrameStoreError> {
        let mut removed = 0;
        for name in self.list().await? {
            let path = self.dir.join(&name);
            match fs::remove_file(&path).await {
                Ok(()) => {
                    debug!("removed old frame {}", path.display());
                    removed += 1;
                }
                Err(e) => warn!("could not remove {}: {e}", path.display()),
            }
        }
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<String>, FrameStoreError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(FrameStoreError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut names = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => {
                    return Err(FrameStoreError::Io {
                        path: self.dir.clone(),
                        source,
                    })
                }
            };
            if let Some(name) = entry.file_name().to_str() {
                if self.matches(name) {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
