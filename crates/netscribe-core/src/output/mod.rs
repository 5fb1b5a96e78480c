// ── Output management ──
//
// Owns the output directory: timestamped documents, one backup of the
// previously-latest document, an atomically-updated latest pointer,
// and the run-status ledger. One controller's write failure never
// touches another's files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::render::OutputFormat;

mod latest;
mod status;

pub use status::{GenerationRecord, read as read_status};

use latest::LatestPointer;

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("i/o failure at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode status ledger")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

/// Writes generated documents into one output directory.
#[derive(Debug, Clone)]
pub struct OutputManager {
    dir: PathBuf,
}

impl OutputManager {
    /// Creates the output directory if missing.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, OutputError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|source| OutputError::Io { path: dir.clone(), source })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Commit one rendered document for `controller`.
    ///
    /// Keeps the previously-latest document as a single backup, writes
    /// the new timestamped file, then atomically repoints
    /// `{controller}-latest.{ext}` and records the run in the status
    /// ledger. Returns the path of the new document.
    pub fn commit(
        &self,
        controller: &str,
        bytes: &[u8],
        format: OutputFormat,
        timestamp: DateTime<Utc>,
        warnings: usize,
    ) -> Result<PathBuf, OutputError> {
        let ext = format.extension();
        let stamp = timestamp.format("%Y%m%d_%H%M%S");
        let file_name = format!("{controller}-{stamp}.{ext}");
        let path = self.dir.join(&file_name);

        let pointer = LatestPointer::new(&self.dir, format!("{controller}-latest.{ext}"));

        // Preserve whatever "latest" points at before superseding it,
        // dropping any older backup so only one generation survives.
        if let Some(previous) = pointer.resolve() {
            self.prune_backups(controller, ext)?;
            let backup = self.dir.join(format!("{controller}-backup-{stamp}.{ext}"));
            fs::rename(&previous, &backup)
                .map_err(|source| OutputError::Io { path: backup.clone(), source })?;
            debug!(backup = %backup.display(), "preserved previous document");
        }

        fs::write(&path, bytes)
            .map_err(|source| OutputError::Io { path: path.clone(), source })?;
        pointer.set(&file_name)?;

        status::update(&self.dir, controller, GenerationRecord {
            timestamp,
            success: true,
            file: Some(file_name),
            error: None,
            warnings,
        })?;

        info!(controller, path = %path.display(), "document committed");
        Ok(path)
    }

    /// Record a failed run in the status ledger. Existing documents
    /// and the latest pointer are left untouched.
    pub fn record_failure(
        &self,
        controller: &str,
        timestamp: DateTime<Utc>,
        error: &str,
    ) -> Result<(), OutputError> {
        status::update(&self.dir, controller, GenerationRecord {
            timestamp,
            success: false,
            file: None,
            error: Some(error.to_string()),
            warnings: 0,
        })
    }

    fn prune_backups(&self, controller: &str, ext: &str) -> Result<(), OutputError> {
        let prefix = format!("{controller}-backup-");
        let suffix = format!(".{ext}");
        let entries = fs::read_dir(&self.dir)
            .map_err(|source| OutputError::Io { path: self.dir.clone(), source })?;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(&prefix) && name.ends_with(&suffix) {
                let stale = entry.path();
                fs::remove_file(&stale)
                    .map_err(|source| OutputError::Io { path: stale, source })?;
            }
        }
        Ok(())
    }
}
