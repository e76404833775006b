//! vodsync library
//!
//! Incrementally mirrors finished Twitch broadcasts to YouTube: discovery of
//! VODs newer than a durable progress marker, quality-fallback retrieval via
//! twitch-dl, and resumable chunked uploads.

pub mod config;
pub mod discovery;
pub mod media;
pub mod pipeline;
pub mod progress;
pub mod publish;
pub mod retrieve;
pub mod twitch;
pub mod vod;
pub mod youtube;

pub use config::{Config, Credentials};
pub use discovery::{discover_pending, VodPage, VodSource};
pub use media::ToolFetcher;
pub use pipeline::{CycleOutcome, Pipeline, PipelineSettings};
pub use progress::ProgressStore;
pub use publish::{Publisher, Upload, VideoDestination};
pub use retrieve::{FetchStatus, MediaFetcher, Retrieval, RetrieveError, Retriever};
pub use twitch::TwitchClient;
pub use vod::Vod;
pub use youtube::YouTubeClient;
