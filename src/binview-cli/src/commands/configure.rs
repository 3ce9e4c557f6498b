//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up binview defaults.

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Handle the configure command
///
/// # Arguments
/// * `file` - Optional default file to present
/// * `log_filter` - Optional default log filter
/// * `show` - If true, show current configuration
pub fn handle(file: Option<PathBuf>, log_filter: Option<String>, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if file.is_none() && log_filter.is_none() {
        show_usage();
        return Ok(());
    }

    apply(&mut config, file, log_filter)?;
    config.save()?;

    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Update `config` with the given values
fn apply(config: &mut Config, file: Option<PathBuf>, log_filter: Option<String>) -> Result<()> {
    if let Some(file) = file {
        let file = file
            .canonicalize()
            .with_context(|| format!("Cannot resolve {}", file.display()))?;
        println!("Default file: {}", file.display());
        config.last_file = Some(file);
    }

    if let Some(filter) = log_filter {
        println!("Log filter: {}", filter);
        config.log_filter = Some(filter);
    }

    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) {
    match &config.last_file {
        Some(file) => println!("Default file: {}", file.display()),
        None => println!("No default file configured"),
    }
    println!("Log filter: {}", config.log_filter());

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: binview configure --file PATH");
    println!("   or: binview configure --log-filter FILTER");
    println!("   or: binview configure --show");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_usage_does_not_panic() {
        show_usage();
    }

    #[test]
    fn test_apply_resolves_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, [0u8; 4]).unwrap();

        let mut config = Config::default();
        apply(&mut config, Some(path.clone()), Some("binview=trace".into())).unwrap();
        assert_eq!(config.last_file, Some(path.canonicalize().unwrap()));
        assert_eq!(config.log_filter(), "binview=trace");
    }

    #[test]
    fn test_apply_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        assert!(apply(&mut config, Some(dir.path().join("nope")), None).is_err());
        assert!(config.last_file.is_none());
    }
}
