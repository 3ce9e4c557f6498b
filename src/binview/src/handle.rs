//! Virtual Process Handles
//!
//! Opaque identifiers handed to the host for each open virtual process.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque handle to an open virtual process
///
/// A handle is only meaningful to the provider that minted it. It is valid
/// for as long as the provider's handle table holds an entry for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Handle(u64);

impl Handle {
    /// Sentinel returned when an open request is refused
    pub const INVALID: Handle = Handle(0);

    /// Rebuild a handle from the raw value a host passed back
    pub const fn from_raw(raw: u64) -> Self {
        Handle(raw)
    }

    /// Raw value to hand to the host
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// True only for [`Handle::INVALID`]
    ///
    /// A non-sentinel handle is not necessarily open; ask the provider.
    pub const fn is_sentinel(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Monotonic handle generator
///
/// Never yields [`Handle::INVALID`] and never repeats a value.
#[derive(Debug)]
pub struct HandleAllocator {
    next: AtomicU64,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Mint a fresh handle
    pub fn mint(&self) -> Handle {
        Handle(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_allocator_never_mints_sentinel() {
        let alloc = HandleAllocator::new();
        let first = alloc.mint();
        assert!(!first.is_sentinel());
        assert_ne!(first, Handle::INVALID);
    }

    #[test]
    fn test_allocator_is_unique() {
        let alloc = HandleAllocator::new();
        let minted: HashSet<Handle> = (0..1000).map(|_| alloc.mint()).collect();
        assert_eq!(minted.len(), 1000);
    }

    #[test]
    fn test_raw_roundtrip() {
        let alloc = HandleAllocator::new();
        let handle = alloc.mint();
        assert_eq!(Handle::from_raw(handle.raw()), handle);
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(Handle::from_raw(255).to_string(), "0xff");
    }
}
