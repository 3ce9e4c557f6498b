//! Handle Table
//!
//! Owns every open [`MappedResource`], keyed by the handle given to the host.

use crate::handle::Handle;
use crate::mapped::MappedResource;
use std::collections::HashMap;

/// Map from handle to the resource it owns
///
/// Not synchronized; the provider only touches it while holding its lock.
#[derive(Debug, Default)]
pub struct HandleTable {
    entries: HashMap<Handle, MappedResource>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `resource` under `handle`
    ///
    /// Hands the resource back if the handle is already taken.
    pub fn insert(&mut self, handle: Handle, resource: MappedResource) -> Result<(), MappedResource> {
        if handle.is_sentinel() || self.entries.contains_key(&handle) {
            return Err(resource);
        }
        self.entries.insert(handle, resource);
        Ok(())
    }

    pub fn lookup(&self, handle: Handle) -> Option<&MappedResource> {
        self.entries.get(&handle)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Take ownership of the entry for `handle`
    pub fn remove(&mut self, handle: Handle) -> Option<MappedResource> {
        self.entries.remove(&handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry
    pub fn drain(&mut self) -> impl Iterator<Item = (Handle, MappedResource)> + '_ {
        self.entries.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::HandleAllocator;
    use crate::mapped::tests::{pattern, MockBacking};

    fn resource(len: usize) -> MappedResource {
        MappedResource::from_backing("mem.bin", Box::new(MockBacking::new(pattern(len))))
    }

    #[test]
    fn test_insert_lookup_remove() {
        let alloc = HandleAllocator::new();
        let mut table = HandleTable::new();
        let handle = alloc.mint();

        table.insert(handle, resource(32)).unwrap();
        assert!(table.contains(handle));
        assert_eq!(table.lookup(handle).unwrap().len(), 32);
        assert_eq!(table.len(), 1);

        let removed = table.remove(handle).unwrap();
        assert_eq!(removed.len(), 32);
        assert!(table.lookup(handle).is_none());
        assert!(table.remove(handle).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_duplicate_insert_returns_resource() {
        let alloc = HandleAllocator::new();
        let mut table = HandleTable::new();
        let handle = alloc.mint();

        table.insert(handle, resource(8)).unwrap();
        let rejected = table.insert(handle, resource(16)).unwrap_err();
        assert_eq!(rejected.len(), 16);
        assert_eq!(table.lookup(handle).unwrap().len(), 8);
    }

    #[test]
    fn test_sentinel_is_never_stored() {
        let mut table = HandleTable::new();
        assert!(table.insert(Handle::INVALID, resource(8)).is_err());
        assert!(!table.contains(Handle::INVALID));
    }

    #[test]
    fn test_drain_empties_table() {
        let alloc = HandleAllocator::new();
        let mut table = HandleTable::new();
        for _ in 0..3 {
            table.insert(alloc.mint(), resource(4)).unwrap();
        }
        assert_eq!(table.len(), 3);

        let drained: Vec<_> = table.drain().collect();
        assert_eq!(drained.len(), 3);
        assert!(table.is_empty());
    }
}
