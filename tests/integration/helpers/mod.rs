//! Test helper utilities: in-memory platform collaborators

#![allow(dead_code)]

use anyhow::{bail, Result};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use vodsync::{FetchStatus, MediaFetcher, Upload, VideoDestination, Vod, VodPage, VodSource};

/// Build a VOD record with a derived timestamp.
pub fn vod(id: &str, title: &str) -> Vod {
    Vod {
        id: id.to_string(),
        title: title.to_string(),
        created_at: Some("2025-12-18T20:00:00Z".to_string()),
        owner: Some("somecaster".to_string()),
    }
}

/// In-memory source platform: a newest-first history served in pages.
pub struct FakeSource {
    /// Full archive, newest first (index 0 is the most recent VOD).
    pub history: Vec<Vod>,
    pub page_size: usize,
    pub live: Cell<bool>,
    /// Page number (1-based) whose fetch should fail, if any.
    pub fail_page: Option<usize>,
    pub pages_fetched: Cell<usize>,
}

impl FakeSource {
    pub fn new(history: Vec<Vod>, page_size: usize) -> Self {
        Self {
            history,
            page_size,
            live: Cell::new(false),
            fail_page: None,
            pages_fetched: Cell::new(0),
        }
    }
}

impl VodSource for FakeSource {
    fn list_vods(&self, cursor: Option<&str>) -> Result<VodPage> {
        let page_number = self.pages_fetched.get() + 1;
        self.pages_fetched.set(page_number);
        if self.fail_page == Some(page_number) {
            bail!("listing page {} unavailable", page_number);
        }

        let offset: usize = match cursor {
            Some(c) => c.parse().expect("fake cursor is an offset"),
            None => 0,
        };
        let end = (offset + self.page_size).min(self.history.len());
        let vods = self.history[offset..end].to_vec();
        let next = if end < self.history.len() {
            Some(end.to_string())
        } else {
            None
        };

        Ok(VodPage { vods, cursor: next })
    }

    fn is_live(&self) -> Result<bool> {
        Ok(self.live.get())
    }
}

/// Scripted media fetcher. Qualities listed in `unavailable` report the
/// expected fallback condition; `fail_quality` simulates a hard tool error;
/// successful downloads write a small file, either at the requested path or
/// at `override_name` within the same directory.
pub struct FakeFetcher {
    pub metadata: Vec<Vod>,
    pub unavailable: Vec<String>,
    pub fail_quality: Option<String>,
    pub fail_metadata: bool,
    pub override_name: Option<String>,
    pub attempts: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn new(metadata: Vec<Vod>) -> Self {
        Self {
            metadata,
            unavailable: Vec::new(),
            fail_quality: None,
            fail_metadata: false,
            override_name: None,
            attempts: RefCell::new(Vec::new()),
        }
    }

    pub fn attempted(&self) -> Vec<String> {
        self.attempts.borrow().clone()
    }
}

impl MediaFetcher for FakeFetcher {
    fn fetch_metadata(&self, id: &str) -> Result<Vod> {
        if self.fail_metadata {
            bail!("no metadata for VOD {}", id);
        }
        match self.metadata.iter().find(|v| v.id == id) {
            Some(vod) => Ok(vod.clone()),
            None => bail!("no metadata for VOD {}", id),
        }
    }

    fn fetch_media(&self, id: &str, quality: &str, dest: &Path) -> Result<FetchStatus> {
        self.attempts.borrow_mut().push(quality.to_string());

        if self.fail_quality.as_deref() == Some(quality) {
            bail!("disk full while downloading VOD {}", id);
        }
        if self.unavailable.iter().any(|q| q == quality) {
            return Ok(FetchStatus::QualityUnavailable);
        }

        let path: PathBuf = match &self.override_name {
            Some(name) => dest.parent().expect("dest has a parent").join(name),
            None => dest.to_path_buf(),
        };
        fs::write(path, b"media")?;
        Ok(FetchStatus::Complete)
    }
}

/// Records uploads; optionally fails the nth call (1-based).
pub struct FakeDestination {
    pub fail_on_call: Option<usize>,
    pub uploads: RefCell<Vec<Upload>>,
}

impl FakeDestination {
    pub fn new() -> Self {
        Self {
            fail_on_call: None,
            uploads: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            uploads: RefCell::new(Vec::new()),
        }
    }

    pub fn upload_titles(&self) -> Vec<String> {
        self.uploads.borrow().iter().map(|u| u.title.clone()).collect()
    }
}

impl VideoDestination for FakeDestination {
    fn upload(
        &self,
        path: &Path,
        upload: &Upload,
        progress: &mut dyn FnMut(f64),
    ) -> Result<String> {
        assert!(path.is_file(), "upload source must exist: {:?}", path);

        let call = self.uploads.borrow().len() + 1;
        if self.fail_on_call == Some(call) {
            bail!("destination rejected the transfer");
        }

        progress(0.5);
        progress(1.0);
        self.uploads.borrow_mut().push(upload.clone());
        Ok(format!("yt-{}", call))
    }
}
