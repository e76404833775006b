//! Status command handler

use anyhow::Result;
use humansize::{format_size, BINARY};
use std::fs;

use vodsync::{Config, ProgressStore};

/// Display the progress marker and staging directory usage.
#[cfg(not(tarpaulin_include))]
pub fn handle() -> Result<()> {
    let config = Config::load()?;
    let store = ProgressStore::new(Config::marker_path()?)?;

    match store.read()? {
        Some(id) => println!("Last mirrored VOD: {}", id),
        None => println!("Last mirrored VOD: none (next run processes the full backlog)"),
    }
    println!("Marker file: {}", store.path().display());

    let staging = config.staging_directory();
    let (count, bytes) = staging_usage(&staging)?;
    println!(
        "Staging: {:?} ({} file(s), {})",
        staging,
        count,
        format_size(bytes, BINARY)
    );

    Ok(())
}

/// Count files and bytes currently staged.
fn staging_usage(dir: &std::path::Path) -> Result<(usize, u64)> {
    if !dir.exists() {
        return Ok((0, 0));
    }

    let mut count = 0usize;
    let mut bytes = 0u64;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_file() {
            count += 1;
            bytes += metadata.len();
        }
    }
    Ok((count, bytes))
}
