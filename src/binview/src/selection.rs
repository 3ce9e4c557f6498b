//! Selection
//!
//! The one file currently offered to the host as an openable process, and
//! the collaborator that picks it.

use byteorder::{ByteOrder, LE};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier the host uses to ask for a virtual process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ProcessId(u32);

impl ProcessId {
    /// Stable id for a path: the first four bytes of the SHA-256 of its raw
    /// bytes, little-endian
    pub fn for_path(path: &Path) -> Self {
        let digest = Sha256::digest(path.as_os_str().as_encoded_bytes());
        ProcessId(LE::read_u32(&digest[..4]))
    }

    pub const fn from_raw(raw: u32) -> Self {
        ProcessId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The file currently available to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: PathBuf,
    pub id: ProcessId,
    pub name: String,
}

impl Selection {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let id = ProcessId::for_path(&path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, id, name }
    }

    pub fn info(&self) -> ProcessInfo {
        ProcessInfo {
            id: self.id,
            name: self.name.clone(),
            path: self.path.clone(),
        }
    }
}

/// One entry of the "available processes" listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub id: ProcessId,
    pub name: String,
    pub path: PathBuf,
}

/// Picks the file to present, typically by asking the user
pub trait PathSelector: Send + Sync {
    /// `None` means the pick was cancelled
    fn prompt_for_path(&self) -> Option<PathBuf>;
}

/// Selector that always answers with the same path
#[derive(Debug, Clone, Default)]
pub struct FixedPath(Option<PathBuf>);

impl FixedPath {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FixedPath(Some(path.into()))
    }

    /// A selector whose every pick is cancelled
    pub fn cancelled() -> Self {
        FixedPath(None)
    }
}

impl PathSelector for FixedPath {
    fn prompt_for_path(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

impl<F> PathSelector for F
where
    F: Fn() -> Option<PathBuf> + Send + Sync,
{
    fn prompt_for_path(&self) -> Option<PathBuf> {
        self()
    }
}
