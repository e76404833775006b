//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub staging: StagingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub transcode: TranscodeConfig,
    #[serde(default)]
    pub publish: PublishConfig,
}

/// Source platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Channel whose archive is mirrored
    #[serde(default)]
    pub channel: String,
    /// VODs requested per listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Delay between listing-page fetches, to respect rate limits
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

pub fn default_page_size() -> u32 {
    20
}

pub fn default_page_delay_ms() -> u64 {
    1000
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            channel: String::new(),
            page_size: default_page_size(),
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

/// Staging storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Directory where downloaded VODs are staged before upload
    #[serde(default = "default_staging_directory")]
    pub directory: String,
}

pub fn default_staging_directory() -> String {
    "~/vodsync/staging".to_string()
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            directory: default_staging_directory(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Quality ladder attempted in order, highest first
    #[serde(default = "default_qualities")]
    pub qualities: Vec<String>,
}

pub fn default_qualities() -> Vec<String> {
    vec![
        "source".to_string(),
        "1080p60".to_string(),
        "720p60".to_string(),
        "480p30".to_string(),
    ]
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            qualities: default_qualities(),
        }
    }
}

/// Optional re-encode pass applied after download
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Hardware acceleration backend passed to ffmpeg, if any
    #[serde(default = "default_hwaccel")]
    pub hwaccel: Option<String>,
    #[serde(default = "default_video_codec")]
    pub video_codec: String,
    /// Encoder quality factor (lower is better)
    #[serde(default = "default_video_quality")]
    pub video_quality: u32,
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,
}

pub fn default_hwaccel() -> Option<String> {
    Some("qsv".to_string())
}

pub fn default_video_codec() -> String {
    "hevc_qsv".to_string()
}

pub fn default_video_quality() -> u32 {
    20
}

pub fn default_preset() -> String {
    "fast".to_string()
}

pub fn default_audio_bitrate() -> String {
    "192k".to_string()
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            hwaccel: default_hwaccel(),
            video_codec: default_video_codec(),
            video_quality: default_video_quality(),
            preset: default_preset(),
            audio_bitrate: default_audio_bitrate(),
        }
    }
}

/// Destination publishing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Destination visibility for new uploads
    #[serde(default = "default_visibility")]
    pub visibility: String,
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
    /// Destination category ("20" is Gaming)
    #[serde(default = "default_category_id")]
    pub category_id: String,
}

pub fn default_visibility() -> String {
    "unlisted".to_string()
}

pub fn default_tags() -> Vec<String> {
    vec![
        "twitch vod".to_string(),
        "livestream".to_string(),
        "gaming".to_string(),
    ]
}

pub fn default_category_id() -> String {
    "20".to_string()
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            visibility: default_visibility(),
            tags: default_tags(),
            category_id: default_category_id(),
        }
    }
}
