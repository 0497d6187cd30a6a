//! Config command handlers.

use anyhow::{Context, Result};
use scolar_client::config::{Config, paths};

pub fn path() -> Result<()> {
    println!("{}", paths::config_path().display());
    Ok(())
}

pub fn init() -> Result<()> {
    let config_path = paths::config_path();
    Config::init_at(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn show(config: &Config) -> Result<()> {
    let toml = toml_string(config)?;
    print!("{toml}");
    Ok(())
}

fn toml_string(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).context("serialize config")
}
