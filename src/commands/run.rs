//! Run command handler

use anyhow::Result;

use vodsync::{
    Config, Credentials, CycleOutcome, Pipeline, PipelineSettings, ToolFetcher, TwitchClient,
    YouTubeClient,
};

/// Execute one mirroring cycle.
///
/// Wires the real platform clients into the pipeline and reports the
/// outcome. Any setup, discovery, or item failure propagates and terminates
/// the process with a non-zero status; a deferred or empty cycle is a
/// normal zero-status run.
#[cfg(not(tarpaulin_include))]
pub fn handle() -> Result<()> {
    let config = Config::load()?;
    let settings = PipelineSettings::from_config(&config)?;
    let credentials = Credentials::from_env()?;

    ToolFetcher::check_tool()?;

    let twitch = TwitchClient::connect(
        &credentials,
        &config.source.channel,
        config.source.page_size,
    )?;
    let fetcher = ToolFetcher::new(&twitch, config.transcode.clone());
    let youtube = YouTubeClient::new(&credentials, config.publish.category_id.clone())?;

    let pipeline = Pipeline::new(settings, &twitch, &fetcher, &youtube)?;

    match pipeline.run_cycle()? {
        CycleOutcome::Deferred => {
            println!("Channel is currently live; trying again next cycle.");
        }
        CycleOutcome::NoNewVods => {
            println!("No new VODs since the last run.");
        }
        CycleOutcome::Completed(count) => {
            println!("Mirrored {} VOD(s).", count);
        }
    }

    Ok(())
}
