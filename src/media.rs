//! Media tool adapter: twitch-dl downloads and the optional ffmpeg re-encode
//!
//! Maps the download tool's exit behavior onto the pipeline's tagged fetch
//! outcome: a "quality not found" complaint on stderr is expected ladder
//! control flow, everything else is a fault.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::config::TranscodeConfig;
use crate::retrieve::{FetchStatus, MediaFetcher};
use crate::twitch::TwitchClient;
use crate::vod::Vod;

/// Fetches VOD media with the twitch-dl CLI; metadata comes from the Helix
/// client so both views of a VOD agree.
pub struct ToolFetcher<'a> {
    twitch: &'a TwitchClient,
    transcode: TranscodeConfig,
}

impl<'a> ToolFetcher<'a> {
    pub fn new(twitch: &'a TwitchClient, transcode: TranscodeConfig) -> Self {
        Self { twitch, transcode }
    }

    /// Check that twitch-dl is installed before the first download attempt.
    pub fn check_tool() -> Result<()> {
        let output = Command::new("twitch-dl")
            .arg("--version")
            .output()
            .context("twitch-dl not found. Please install it first.")?;

        if !output.status.success() {
            bail!("twitch-dl version check failed");
        }

        Ok(())
    }

    /// Re-encode `path` in place with ffmpeg using the configured codec
    /// settings.
    fn transcode_in_place(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("transcode.mp4");

        let mut command = Command::new("ffmpeg");
        if let Some(hwaccel) = &self.transcode.hwaccel {
            command.arg("-hwaccel").arg(hwaccel);
        }
        command
            .arg("-i")
            .arg(path)
            .arg("-c:v")
            .arg(&self.transcode.video_codec)
            .arg("-q:v")
            .arg(self.transcode.video_quality.to_string())
            .arg("-preset")
            .arg(&self.transcode.preset)
            .arg("-c:a")
            .arg("aac")
            .arg("-b:a")
            .arg(&self.transcode.audio_bitrate)
            .arg("-y")
            .arg(&tmp);

        debug!(path = %path.display(), "transcoding");
        let output = command.output().context("ffmpeg not found. Please install it first.")?;

        if !output.status.success() {
            // Leftover temp output would make the staging scan ambiguous on
            // the retry run.
            let _ = fs::remove_file(&tmp);
            bail!(
                "ffmpeg transcode failed for {:?}: {}",
                path,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace {:?} with transcoded output", path))?;
        Ok(())
    }
}

impl MediaFetcher for ToolFetcher<'_> {
    fn fetch_metadata(&self, id: &str) -> Result<Vod> {
        self.twitch.vod_by_id(id)
    }

    fn fetch_media(&self, id: &str, quality: &str, dest: &Path) -> Result<FetchStatus> {
        let output = Command::new("twitch-dl")
            .arg("download")
            .arg(id)
            .arg("-q")
            .arg(quality)
            .arg("-o")
            .arg(dest)
            .output()
            .context("twitch-dl not found. Please install it first.")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_quality_unavailable(&stderr) {
                return Ok(FetchStatus::QualityUnavailable);
            }
            bail!(
                "twitch-dl failed for VOD {} at {}: {}",
                id,
                quality,
                stderr.trim()
            );
        }

        if self.transcode.enabled {
            self.transcode_in_place(dest)?;
        }

        Ok(FetchStatus::Complete)
    }
}

/// Whether the tool's stderr indicates the requested quality tier does not
/// exist for this VOD, as opposed to a real failure.
fn is_quality_unavailable(stderr: &str) -> bool {
    let lowered = stderr.to_lowercase();
    lowered.contains("available qualities")
        || (lowered.contains("quality") && (lowered.contains("not found") || lowered.contains("invalid")))
}
