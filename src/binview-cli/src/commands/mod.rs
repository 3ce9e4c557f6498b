//! Command handlers for the binview CLI
//!
//! Every command drives the provider the way a host would: enumerate,
//! open, inspect, close.

pub mod configure;
pub mod inspect;
pub mod read;

use crate::config::Config;
use crate::selector::PromptSelector;
use anyhow::{Context, Result};
use binview::{AccessRights, Handle, ProcessInfo, ProcessProvider, TracingSink};
use std::path::PathBuf;

/// Parse raw host access bits (hex with 0x prefix, or decimal)
pub fn parse_access(bits: &str) -> Result<AccessRights> {
    let raw = read::parse_address(bits).context("Invalid access bits")?;
    let raw = u32::try_from(raw).context("Access bits do not fit in 32 bits")?;
    Ok(AccessRights::from_raw(raw))
}

/// An open virtual process, closed on drop
pub struct Session {
    pub provider: ProcessProvider<PromptSelector, TracingSink>,
    pub handle: Handle,
    pub process: ProcessInfo,
}

impl Session {
    /// Offer `file` (or the configured default, or a prompt) and open it
    pub fn open(file: Option<PathBuf>, access: AccessRights, config: &Config) -> Result<Self> {
        let preset = file.or_else(|| config.last_file.clone());
        let provider = ProcessProvider::new(PromptSelector::new(preset), TracingSink);

        let process = provider
            .enumerate_available()
            .into_iter()
            .next()
            .context("No file selected")?;

        let handle = provider
            .try_open(process.id, access)
            .with_context(|| format!("Failed to open {}", process.path.display()))?;

        Ok(Self {
            provider,
            handle,
            process,
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.provider.close(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_opens_given_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, [0xAAu8; 64]).unwrap();

        let session = Session::open(Some(path.clone()), AccessRights::READ, &Config::default()).unwrap();
        assert_eq!(session.process.path, path);
        assert!(session.provider.is_valid(session.handle));
    }

    #[test]
    fn test_session_falls_back_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configured.bin");
        std::fs::write(&path, [1u8; 8]).unwrap();

        let config = Config {
            last_file: Some(path.clone()),
            log_filter: None,
        };
        let session = Session::open(None, AccessRights::READ, &config).unwrap();
        assert_eq!(session.process.name, "configured.bin");
    }

    #[test]
    fn test_parse_access() {
        assert_eq!(parse_access("0x1").unwrap(), AccessRights::READ);
        assert_eq!(parse_access("15").unwrap(), AccessRights::all());
        assert!(parse_access("0x100000000").is_err());
        assert!(parse_access("rw").is_err());
    }

    #[test]
    fn test_session_narrows_requested_access() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, [0u8; 8]).unwrap();

        let session = Session::open(Some(path), AccessRights::all(), &Config::default()).unwrap();
        let details = session.provider.describe(session.handle).unwrap();
        assert_eq!(details.access, AccessRights::SUPPORTED);
    }

    #[test]
    fn test_session_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Session::open(
            Some(dir.path().join("missing.bin")),
            AccessRights::READ,
            &Config::default(),
        );
        assert!(result.is_err());
    }
}
