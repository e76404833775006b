//! Incremental VOD discovery against the source platform's paginated listing
//!
//! The listing is walked newest-first until either the stored marker id is
//! encountered (sentinel hit: that VOD and everything older has already been
//! processed) or pagination is exhausted. The accumulated records are then
//! reversed so the caller processes oldest-pending-first.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

use crate::vod::Vod;

/// One page of the source platform's archive listing, newest-first.
pub struct VodPage {
    pub vods: Vec<Vod>,
    /// Continuation cursor for the next (older) page, if any.
    pub cursor: Option<String>,
}

/// Source platform listing capability.
pub trait VodSource {
    /// Fetch one page of finished VODs, newest-first. `cursor` of `None`
    /// starts from the most recent.
    fn list_vods(&self, cursor: Option<&str>) -> Result<VodPage>;

    /// Whether the channel is currently broadcasting.
    fn is_live(&self) -> Result<bool>;
}

/// Collect every VOD newer than `marker`, oldest first.
///
/// With no marker (first run ever) this walks the full pagination history,
/// which can be many pages; that is expected, not an error. A fixed
/// `page_delay` is slept between page fetches to respect the platform's
/// rate limits. Any page-fetch failure is fatal for the run: no partial
/// batch is synthesized from a failed page.
pub fn discover_pending(
    source: &dyn VodSource,
    marker: Option<&str>,
    page_delay: Duration,
) -> Result<Vec<Vod>> {
    let mut pending: Vec<Vod> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page_count = 0u32;

    loop {
        let page = source
            .list_vods(cursor.as_deref())
            .with_context(|| format!("Failed to list VODs (page {})", page_count + 1))?;
        page_count += 1;

        let mut sentinel_hit = false;
        for vod in page.vods {
            if marker.is_some_and(|m| m == vod.id) {
                // Everything from here on is older than the marker and has
                // already been processed.
                sentinel_hit = true;
                break;
            }
            pending.push(vod);
        }

        if sentinel_hit {
            debug!(page_count, "discovery stopped at marker");
            break;
        }
        match page.cursor {
            Some(next) => {
                cursor = Some(next);
                std::thread::sleep(page_delay);
            }
            None => {
                debug!(page_count, "discovery exhausted listing history");
                break;
            }
        }
    }

    // Accumulated newest-first; the pipeline wants oldest-pending-first.
    pending.reverse();
    Ok(pending)
}
