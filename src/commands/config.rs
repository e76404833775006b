//! Config command handlers

use anyhow::Result;

use vodsync::Config;

/// Print the active configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn show() -> Result<()> {
    let config = Config::load()?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Print the config file path.
#[cfg(not(tarpaulin_include))]
pub fn path() -> Result<()> {
    println!("{}", Config::config_path()?.display());
    Ok(())
}

/// Write a default config file if none exists yet.
#[cfg(not(tarpaulin_include))]
pub fn init() -> Result<()> {
    let config_path = Config::config_path()?;
    if config_path.exists() {
        println!("Config already exists: {}", config_path.display());
        return Ok(());
    }

    Config::default().save()?;
    println!("Wrote default config to {}", config_path.display());
    println!("Set [source].channel before the first run.");
    Ok(())
}
