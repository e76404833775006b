//! Tests for the quality ladder and staging output resolution

use std::fs;
use tempfile::TempDir;

use crate::helpers::{vod, FakeFetcher};
use vodsync::{RetrieveError, Retriever};

fn ladder() -> Vec<String> {
    vec![
        "source".to_string(),
        "720p60".to_string(),
        "480p30".to_string(),
    ]
}

#[test]
fn first_quality_success_stops_the_ladder() {
    let temp = TempDir::new().unwrap();
    let fetcher = FakeFetcher::new(vec![vod("123", "some stream")]);
    let retriever = Retriever::new(&fetcher, temp.path().to_path_buf(), ladder());

    let retrieval = retriever.retrieve("123").unwrap();

    assert_eq!(fetcher.attempted(), vec!["source"]);
    assert_eq!(retrieval.quality, "source");
    assert!(retrieval.path.is_file());
}

#[test]
fn unavailable_qualities_fall_through_in_order() {
    let temp = TempDir::new().unwrap();
    let mut fetcher = FakeFetcher::new(vec![vod("123", "some stream")]);
    fetcher.unavailable = vec!["source".to_string(), "720p60".to_string()];
    let retriever = Retriever::new(&fetcher, temp.path().to_path_buf(), ladder());

    let retrieval = retriever.retrieve("123").unwrap();

    assert_eq!(fetcher.attempted(), vec!["source", "720p60", "480p30"]);
    assert_eq!(retrieval.quality, "480p30");
}

#[test]
fn hard_failure_aborts_without_trying_lower_tiers() {
    let temp = TempDir::new().unwrap();
    let mut fetcher = FakeFetcher::new(vec![vod("123", "some stream")]);
    fetcher.unavailable = vec!["source".to_string()];
    fetcher.fail_quality = Some("720p60".to_string());
    let retriever = Retriever::new(&fetcher, temp.path().to_path_buf(), ladder());

    let result = retriever.retrieve("123");

    assert!(result.is_err());
    // 480p30 must never be attempted after a non-"unavailable" failure.
    assert_eq!(fetcher.attempted(), vec!["source", "720p60"]);
}

#[test]
fn exhausted_ladder_reports_no_acceptable_quality() {
    let temp = TempDir::new().unwrap();
    let mut fetcher = FakeFetcher::new(vec![vod("123", "some stream")]);
    fetcher.unavailable = ladder();
    let retriever = Retriever::new(&fetcher, temp.path().to_path_buf(), ladder());

    let error = retriever.retrieve("123").unwrap_err();

    assert!(matches!(
        error.downcast_ref::<RetrieveError>(),
        Some(RetrieveError::NoAcceptableQuality { .. })
    ));
}

#[test]
fn metadata_failure_prevents_any_download_attempt() {
    let temp = TempDir::new().unwrap();
    let mut fetcher = FakeFetcher::new(Vec::new());
    fetcher.fail_metadata = true;
    let retriever = Retriever::new(&fetcher, temp.path().to_path_buf(), ladder());

    let result = retriever.retrieve("123");

    assert!(result.is_err());
    assert!(fetcher.attempted().is_empty());
}

#[test]
fn reported_success_without_output_is_a_consistency_error() {
    let temp = TempDir::new().unwrap();
    let mut fetcher = FakeFetcher::new(vec![vod("123", "some stream")]);
    // Tool claims success but writes somewhere without the VOD id in the name.
    fetcher.override_name = Some("unrelated.mp4".to_string());
    let retriever = Retriever::new(&fetcher, temp.path().to_path_buf(), ladder());

    let error = retriever.retrieve("123").unwrap_err();

    assert!(matches!(
        error.downcast_ref::<RetrieveError>(),
        Some(RetrieveError::OutputMissing { .. })
    ));
}

#[test]
fn multiple_matching_outputs_are_a_consistency_error() {
    let temp = TempDir::new().unwrap();
    // A stale file from an earlier crashed run also carries the id.
    fs::write(temp.path().join("123_stale.mp4"), b"old").unwrap();
    let fetcher = FakeFetcher::new(vec![vod("123", "some stream")]);
    let retriever = Retriever::new(&fetcher, temp.path().to_path_buf(), ladder());

    let error = retriever.retrieve("123").unwrap_err();

    assert!(matches!(
        error.downcast_ref::<RetrieveError>(),
        Some(RetrieveError::AmbiguousOutput { count: 2, .. })
    ));
}

#[test]
fn tool_chosen_output_name_is_authoritative() {
    let temp = TempDir::new().unwrap();
    let mut fetcher = FakeFetcher::new(vec![vod("123", "some stream")]);
    fetcher.override_name = Some("123_tool_named.mp4".to_string());
    let retriever = Retriever::new(&fetcher, temp.path().to_path_buf(), ladder());

    let retrieval = retriever.retrieve("123").unwrap();

    assert_eq!(
        retrieval.path.file_name().unwrap().to_str().unwrap(),
        "123_tool_named.mp4"
    );
}
