//! Publishing retrieved VODs to the destination platform
//!
//! The publisher shapes destination-safe metadata for one local file and
//! hands it to the destination client for a resumable chunked transfer. It
//! never retries a transfer itself: item-level failure aborts the batch and
//! the next scheduled run is the retry mechanism.

use anyhow::{ensure, Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::vod::Vod;

/// Length ceiling the destination platform enforces on titles.
pub const TITLE_MAX_LENGTH: usize = 100;

/// Characters the destination platform rejects in titles.
const REJECTED_TITLE_CHARS: &[char] = &['<', '>'];

/// Metadata attached to one upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Destination visibility, e.g. "unlisted".
    pub visibility: String,
}

/// Destination platform upload capability.
pub trait VideoDestination {
    /// Transfer one local file with the given metadata, reporting progress
    /// as a monotonically increasing fraction in `0.0..=1.0`. Returns the
    /// destination-assigned video id.
    fn upload(
        &self,
        path: &Path,
        upload: &Upload,
        progress: &mut dyn FnMut(f64),
    ) -> Result<String>;
}

/// Publishes one retrieved file per call.
pub struct Publisher<'a> {
    destination: &'a dyn VideoDestination,
    visibility: String,
    tags: Vec<String>,
}

impl<'a> Publisher<'a> {
    pub fn new(destination: &'a dyn VideoDestination, visibility: String, tags: Vec<String>) -> Self {
        Self {
            destination,
            visibility,
            tags,
        }
    }

    /// Upload `path` with metadata derived from `vod`. Returns the
    /// destination video id.
    pub fn publish(&self, path: &Path, vod: &Vod) -> Result<String> {
        // Local precondition, checked before any authentication or transfer
        // is attempted.
        ensure!(
            path.is_file(),
            "Upload source file does not exist: {:?}",
            path
        );

        let upload = Upload {
            title: safe_title(&vod.title, &vod.id),
            description: build_description(vod),
            tags: self.tags.clone(),
            visibility: self.visibility.clone(),
        };

        info!(id = vod.id.as_str(), title = upload.title.as_str(), "publishing VOD");

        let video_id = self
            .destination
            .upload(path, &upload, &mut print_progress)
            .with_context(|| format!("Failed to upload VOD {}", vod.id))?;
        println!();

        Ok(video_id)
    }
}

fn print_progress(fraction: f64) {
    print!("\rUploading: {:>5.1}%", fraction * 100.0);
    let _ = std::io::stdout().flush();
}

/// Derive a title the destination platform accepts.
///
/// Strips rejected characters and control characters, trims whitespace,
/// enforces the length ceiling, and falls back to a deterministic title
/// keyed by the VOD id when sanitization empties the input.
pub fn safe_title(title: &str, id: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !REJECTED_TITLE_CHARS.contains(c) && !c.is_control())
        .collect();
    let trimmed = cleaned.trim();

    if trimmed.is_empty() {
        return format!("Twitch VOD {}", id);
    }

    if trimmed.chars().count() > TITLE_MAX_LENGTH {
        trimmed.chars().take(TITLE_MAX_LENGTH).collect()
    } else {
        trimmed.to_string()
    }
}

/// Generated description referencing the original broadcast.
pub fn build_description(vod: &Vod) -> String {
    let mut description = format!("Originally streamed on {}.", vod.recorded_date());
    if let Some(owner) = &vod.owner {
        description.push_str(&format!("\nChannel: {}", owner));
    }
    description.push_str(&format!("\nOriginal title: {}", vod.title));
    description.push_str("\n\nArchived automatically by vodsync.");
    description
}
