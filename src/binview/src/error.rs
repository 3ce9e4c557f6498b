//! Error types for the provider and its resource layer.

use crate::handle::Handle;
use crate::selection::ProcessId;
use std::io;
use std::path::PathBuf;

/// Failure of the backing resource itself
///
/// A resource that produced one of these is no longer trusted; the provider
/// evicts its handle.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to map {}: {source}", .path.display())]
    Map {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Cannot map empty file: {}", .0.display())]
    Empty(PathBuf),

    #[error("{} shrank to {actual} bytes, {expected} are mapped", .path.display())]
    Truncated {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Resource already released: {}", .0.display())]
    Released(PathBuf),
}

/// Error from a bounded read against a mapped resource
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The requested range lies past the end of the resource
    #[error("Read of {len} bytes at {offset:#x} exceeds size {size:#x}")]
    OutOfRange { offset: u64, len: usize, size: u64 },

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Error surfaced at the provider boundary
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Unknown, closed or evicted handle
    #[error("Unknown handle {0}")]
    Validation(Handle),

    /// Open request for a process that is not the current selection
    #[error("Process {0} is not the current selection")]
    NotSelected(ProcessId),

    /// Range outside the virtual process; the handle stays open
    #[error("Address {address:#x} + {len} is outside the {size} byte image")]
    Access { address: u64, len: usize, size: u64 },

    /// The backing failed and the handle was evicted
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Operation this provider never performs
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
