//! End-to-end mirroring pipeline
//!
//! One `run_cycle` call performs one batch: live gate, discovery, then a
//! strictly ordered retrieve → publish → advance loop. The marker is moved
//! only after a publish succeeds, so it never points at a half-finished
//! item; any item failure aborts the remaining batch and the next scheduled
//! run re-discovers everything the marker did not cover.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::discovery::{discover_pending, VodSource};
use crate::progress::ProgressStore;
use crate::publish::{Publisher, VideoDestination};
use crate::retrieve::{MediaFetcher, Retriever};

/// How one mirroring cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The channel was live; nothing was discovered or retrieved.
    Deferred,
    /// Discovery found nothing newer than the marker.
    NoNewVods,
    /// Every pending VOD was mirrored and the marker advanced past it.
    Completed(usize),
}

/// Settings the pipeline needs, resolved from config once at startup.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub staging_dir: PathBuf,
    pub marker_path: PathBuf,
    pub qualities: Vec<String>,
    pub page_delay: Duration,
    pub visibility: String,
    pub tags: Vec<String>,
}

impl PipelineSettings {
    /// Resolve settings from loaded configuration, validating the values a
    /// run cannot start without.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate_for_run()?;
        Ok(Self {
            staging_dir: config.staging_directory(),
            marker_path: Config::marker_path()?,
            qualities: config.retrieval.qualities.clone(),
            page_delay: Duration::from_millis(config.source.page_delay_ms),
            visibility: config.publish.visibility.clone(),
            tags: config.publish.tags.clone(),
        })
    }
}

/// Drives one batch per call. Single thread of control; no two VODs are
/// ever in flight at once.
pub struct Pipeline<'a> {
    source: &'a dyn VodSource,
    retriever: Retriever<'a>,
    publisher: Publisher<'a>,
    store: ProgressStore,
    page_delay: Duration,
}

impl<'a> Pipeline<'a> {
    /// Set up the pipeline: create staging storage and the progress store.
    /// Failure here is fatal before any discovery happens.
    pub fn new(
        settings: PipelineSettings,
        source: &'a dyn VodSource,
        fetcher: &'a dyn MediaFetcher,
        destination: &'a dyn VideoDestination,
    ) -> Result<Self> {
        fs::create_dir_all(&settings.staging_dir).with_context(|| {
            format!(
                "Failed to create staging directory: {:?}",
                settings.staging_dir
            )
        })?;
        let store = ProgressStore::new(settings.marker_path.clone())?;

        Ok(Self {
            source,
            retriever: Retriever::new(fetcher, settings.staging_dir, settings.qualities),
            publisher: Publisher::new(destination, settings.visibility, settings.tags),
            store,
            page_delay: settings.page_delay,
        })
    }

    /// Run one mirroring cycle.
    pub fn run_cycle(&self) -> Result<CycleOutcome> {
        // A broadcast in progress is not a finished recording; defer the
        // whole cycle rather than pick up a partial VOD.
        if self
            .source
            .is_live()
            .context("Failed to query live status")?
        {
            info!("channel is live, deferring this cycle");
            return Ok(CycleOutcome::Deferred);
        }

        let marker = self.store.read()?;
        let batch = discover_pending(self.source, marker.as_deref(), self.page_delay)
            .context("VOD discovery failed")?;

        if batch.is_empty() {
            return Ok(CycleOutcome::NoNewVods);
        }

        info!(count = batch.len(), "mirroring pending VODs");
        println!("Found {} pending VOD(s)", batch.len());

        for vod in &batch {
            self.process_item(&vod.id)
                .with_context(|| format!("Aborting batch: VOD {} failed", vod.id))?;
        }

        Ok(CycleOutcome::Completed(batch.len()))
    }

    /// Retrieve, publish, then advance the marker for one VOD. The marker
    /// write happens after publish success and before the next item starts.
    fn process_item(&self, id: &str) -> Result<()> {
        let retrieval = self.retriever.retrieve(id)?;
        let video_id = self.publisher.publish(&retrieval.path, &retrieval.vod)?;
        self.store.advance(id)?;

        println!("Published VOD {} as {}", id, video_id);

        // The staging copy is transient; the marker has already moved, so a
        // failed cleanup only costs disk space.
        if let Err(e) = fs::remove_file(&retrieval.path) {
            warn!(path = %retrieval.path.display(), error = %e, "failed to remove staging file");
        }

        Ok(())
    }

    /// Marker currently on disk, for status display.
    pub fn last_processed(&self) -> Result<Option<String>> {
        self.store.read()
    }
}
