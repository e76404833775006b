//! Durable progress marker for the mirroring pipeline
//!
//! The marker is a single file holding the id of the last VOD that was fully
//! retrieved AND published. It is read once at the start of a run and
//! advanced exactly once per completed item. There is no history and no
//! rollback: the marker only ever moves forward.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Owns the marker file. No other component reads or writes it.
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Create a store backed by the given marker file, creating its parent
    /// directory if needed.
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create marker directory: {:?}", parent))?;
        }
        Ok(Self { path })
    }

    /// Path of the marker file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the stored marker. Absence of the file is a normal state (first
    /// run ever), not an error.
    pub fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let id = contents.trim().to_string();
                if id.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(id))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read marker file: {:?}", self.path))
            }
        }
    }

    /// Durably overwrite the marker with `id`.
    ///
    /// Writes to a temporary file in the same directory and renames it over
    /// the marker, so a crash mid-write leaves either the old or the new
    /// value readable, never a torn one.
    pub fn advance(&self, id: &str) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, id)
            .with_context(|| format!("Failed to write marker temp file: {:?}", tmp))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace marker file: {:?}", self.path))?;
        Ok(())
    }
}
