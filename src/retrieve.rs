//! VOD retrieval: metadata, filename derivation, and the quality ladder
//!
//! Retrieval for one VOD runs in a fixed order: authoritative metadata
//! first (fatal if missing), then download attempts down a descending ladder
//! of quality tiers, then a consistency check that the tool actually
//! produced a file for this VOD in the staging directory.

use anyhow::{Context, Result};
use deunicode::deunicode;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::vod::Vod;

/// Fixed extension for retrieved media files.
pub const MEDIA_EXTENSION: &str = "mp4";

/// Outcome of one download attempt at one quality tier.
///
/// "Quality unavailable" is expected control flow (the ladder moves to the
/// next tier); every true fault travels as an `Err` and aborts the item
/// without trying the remaining tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// The tool reported a completed download.
    Complete,
    /// The requested quality tier does not exist for this VOD.
    QualityUnavailable,
}

/// Media retrieval capability (metadata lookup plus the download tool).
pub trait MediaFetcher {
    /// Authoritative metadata for one VOD. Not-found or malformed responses
    /// are errors.
    fn fetch_metadata(&self, id: &str) -> Result<Vod>;

    /// Download one VOD at one quality tier to `dest`.
    fn fetch_media(&self, id: &str, quality: &str, dest: &Path) -> Result<FetchStatus>;
}

/// Retrieval failures with load-bearing taxonomy.
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// Every tier in the ladder reported "quality unavailable".
    #[error("No acceptable quality available for VOD {id} (tried: {tried})")]
    NoAcceptableQuality { id: String, tried: String },
    /// The tool reported success but no file for this VOD exists in staging.
    #[error("Retrieval of VOD {id} reported success but no output file was found")]
    OutputMissing { id: String },
    /// More than one staging file matches this VOD id. Never silently pick
    /// one; stale leftovers must be resolved by the operator.
    #[error("Found {count} staging files matching VOD {id}; expected exactly one")]
    AmbiguousOutput { id: String, count: usize },
}

/// Result of retrieving one VOD.
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// Path of the file the tool actually produced. Authoritative for
    /// downstream stages, regardless of the requested output path.
    pub path: PathBuf,
    /// Quality tier that succeeded.
    pub quality: String,
    /// Metadata fetched at the start of retrieval.
    pub vod: Vod,
}

/// Drives metadata fetch, the quality ladder, and output resolution for one
/// VOD at a time.
pub struct Retriever<'a> {
    fetcher: &'a dyn MediaFetcher,
    staging_dir: PathBuf,
    qualities: Vec<String>,
}

impl<'a> Retriever<'a> {
    pub fn new(fetcher: &'a dyn MediaFetcher, staging_dir: PathBuf, qualities: Vec<String>) -> Self {
        Self {
            fetcher,
            staging_dir,
            qualities,
        }
    }

    /// Retrieve one VOD: metadata, ladder download, output lookup.
    pub fn retrieve(&self, id: &str) -> Result<Retrieval> {
        // Metadata must succeed before any quality attempt begins.
        let vod = self
            .fetcher
            .fetch_metadata(id)
            .with_context(|| format!("Failed to fetch metadata for VOD {}", id))?;

        // The requested filename carries the id so the post-download scan
        // finds the output whether or not the tool honored the requested
        // name.
        let filename = derive_filename(&vod.title, vod.recorded_date());
        let dest = self.staging_dir.join(format!("{}_{}", id, filename));

        let quality = self.download_with_fallback(id, &dest)?;
        let path = self.locate_output(id)?;
        info!(id, quality = quality.as_str(), path = %path.display(), "retrieved VOD");

        Ok(Retrieval { path, quality, vod })
    }

    /// Walk the quality ladder top-down. Only "quality unavailable" moves to
    /// the next tier; any other failure aborts immediately.
    fn download_with_fallback(&self, id: &str, dest: &Path) -> Result<String> {
        for quality in &self.qualities {
            debug!(id, quality = quality.as_str(), "attempting download");
            match self
                .fetcher
                .fetch_media(id, quality, dest)
                .with_context(|| format!("Download of VOD {} at {} failed", id, quality))?
            {
                FetchStatus::Complete => return Ok(quality.clone()),
                FetchStatus::QualityUnavailable => {
                    debug!(id, quality = quality.as_str(), "quality unavailable");
                }
            }
        }

        Err(RetrieveError::NoAcceptableQuality {
            id: id.to_string(),
            tried: self.qualities.join(", "),
        }
        .into())
    }

    /// Resolve the file the tool actually wrote by scanning the staging
    /// directory for names containing the VOD id. Zero matches despite a
    /// reported success, or more than one match, are consistency errors.
    fn locate_output(&self, id: &str) -> Result<PathBuf> {
        let mut matches: Vec<PathBuf> = Vec::new();

        let entries = fs::read_dir(&self.staging_dir)
            .with_context(|| format!("Failed to read staging directory: {:?}", self.staging_dir))?;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name();
            if name.to_string_lossy().contains(id) {
                matches.push(path);
            }
        }

        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(RetrieveError::OutputMissing { id: id.to_string() }.into()),
            count => Err(RetrieveError::AmbiguousOutput {
                id: id.to_string(),
                count,
            }
            .into()),
        }
    }
}

/// Derive the staging filename from VOD metadata: ISO date prefix plus the
/// sanitized title and the fixed media extension.
///
/// Pure function of its inputs so the same metadata always yields the same
/// name byte-for-byte.
pub fn derive_filename(title: &str, date: chrono::NaiveDate) -> String {
    let safe = sanitize_title(title);
    if safe.is_empty() {
        format!("{}.{}", date.format("%Y-%m-%d"), MEDIA_EXTENSION)
    } else {
        format!("{}_{}.{}", date.format("%Y-%m-%d"), safe, MEDIA_EXTENSION)
    }
}

/// Sanitize a VOD title for use in a filename.
///
/// Transformations, in order:
/// 1. Unicode → ASCII transliteration
/// 2. Characters outside `[A-Za-z0-9_\- ]` removed
/// 3. Whitespace/underscore runs collapsed to a single underscore
/// 4. Leading/trailing underscores trimmed
/// 5. Lowercased
pub fn sanitize_title(title: &str) -> String {
    let ascii = deunicode(title);

    let mut result = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            if pending_separator && !result.is_empty() {
                result.push('_');
            }
            pending_separator = false;
            result.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '_' {
            pending_separator = true;
        }
        // Everything else is dropped without becoming a separator.
    }

    result
}
