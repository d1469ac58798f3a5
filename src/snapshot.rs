//! # Snapshot Module
//!
//! Copies a live history database into a uniquely named temporary file so
//! it can be opened without contending for the browser's locks. The copy is
//! removed when the [`Snapshot`] is dropped.

use std::path::{Path, PathBuf};

use tempfile::TempPath;
use thiserror::Error;

use crate::environment::{EnvError, Environment};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error("failed to create temporary file in {dir}: {source}")]
    Create {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{source}")]
    Copy {
        from: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct Snapshot {
    path: TempPath,
    bytes: u64,
}

impl Snapshot {
    /// Copy `source` into a fresh temp file named `<prefix>XXXXXX` under the
    /// environment's temp directory.
    pub fn create(
        env: &dyn Environment,
        source: &Path,
        prefix: &str,
    ) -> Result<Self, SnapshotError> {
        let dir = env.temp_dir()?;
        let path = tempfile::Builder::new()
            .prefix(prefix)
            .tempfile_in(&dir)
            .map_err(|source| SnapshotError::Create {
                dir: dir.clone(),
                source,
            })?
            .into_temp_path();

        // `path` already exists; fs::copy truncates it. On error the
        // TempPath drop removes the placeholder.
        let bytes = std::fs::copy(source, &path).map_err(|err| SnapshotError::Copy {
            from: source.to_path_buf(),
            source: err,
        })?;
        Ok(Self { path, bytes })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_copied(&self) -> u64 {
        self.bytes
    }

    /// Delete the copy now, reporting a removal failure instead of
    /// swallowing it on drop.
    pub fn close(self) -> std::io::Result<()> {
        self.path.close()
    }
}
