//! Process Provider
//!
//! The contract a memory-inspection host talks to. Every operation that
//! touches the handle table or the selection runs under one lock, so the
//! provider behaves as if calls from all threads happened one at a time.

use crate::access::AccessRights;
use crate::control::{ControlAction, DebugEvent, HardwareBreakpoint};
use crate::error::{MapError, ProviderError, ProviderResult, ResourceError};
use crate::handle::{Handle, HandleAllocator};
use crate::layout::ImageLayout;
use crate::mapped::{MappedResource, MmapOpener, ResourceOpener};
use crate::selection::{FixedPath, PathSelector, ProcessId, ProcessInfo, Selection};
use crate::sink::{ErrorSink, TracingSink};
use crate::table::HandleTable;

use byteorder::{ByteOrder, LE};
use parking_lot::Mutex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// State guarded by the provider's lock
#[derive(Debug, Default)]
struct State {
    table: HandleTable,
    selection: Option<Selection>,
}

impl State {
    /// Remove and release every open resource
    fn release_all(&mut self) -> usize {
        let mut released = 0;
        for (handle, mut resource) in self.table.drain() {
            if resource.dispose() {
                released += 1;
            }
            tracing::debug!(%handle, path = %resource.path().display(), "released on shutdown");
        }
        self.selection = None;
        released
    }
}

/// Summary of one open handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandleInfo {
    pub handle: Handle,
    pub path: PathBuf,
    pub size: u64,
    pub access: AccessRights,
}

/// Presents files as virtual processes
///
/// `S` picks the file to offer; `E` receives resource failures.
pub struct ProcessProvider<S = FixedPath, E = TracingSink> {
    gate: Mutex<State>,
    handles: HandleAllocator,
    selector: S,
    sink: E,
    opener: Box<dyn ResourceOpener>,
}

impl<S: PathSelector, E: ErrorSink> ProcessProvider<S, E> {
    pub fn new(selector: S, sink: E) -> Self {
        Self {
            gate: Mutex::new(State::default()),
            handles: HandleAllocator::new(),
            selector,
            sink,
            opener: Box::new(MmapOpener),
        }
    }

    /// Use a different way of turning paths into backings
    pub fn with_opener<O: ResourceOpener + 'static>(mut self, opener: O) -> Self {
        self.opener = Box::new(opener);
        self
    }

    // === Selection ===

    /// Make `path` the file offered to the host, replacing any previous one
    ///
    /// Handles opened against the previous selection stay open.
    pub fn select<P: Into<PathBuf>>(&self, path: P) -> Selection {
        let selection = Selection::new(path);
        tracing::debug!(id = %selection.id, path = %selection.path.display(), "selected");
        self.gate.lock().selection = Some(selection.clone());
        selection
    }

    pub fn current_selection(&self) -> Option<Selection> {
        self.gate.lock().selection.clone()
    }

    /// Ask the selector for a file and list it as the one available process
    ///
    /// A cancelled pick lists nothing and keeps the current selection.
    pub fn enumerate_available(&self) -> Vec<ProcessInfo> {
        // The selector may wait on a user; keep the lock out of it.
        match self.selector.prompt_for_path() {
            Some(path) => vec![self.select(path).info()],
            None => {
                tracing::debug!("selection cancelled");
                Vec::new()
            }
        }
    }

    // === Handles ===

    /// True while `handle` refers to an open resource
    pub fn is_valid(&self, handle: Handle) -> bool {
        self.gate.lock().table.contains(handle)
    }

    pub fn open_handles(&self) -> usize {
        self.gate.lock().table.len()
    }

    /// Open the selected file, or return [`Handle::INVALID`]
    ///
    /// Failing to map the file is reported to the error sink; asking for a
    /// process other than the current selection is not.
    pub fn open(&self, id: ProcessId, access: AccessRights) -> Handle {
        self.try_open(id, access).unwrap_or(Handle::INVALID)
    }

    /// Like [`open`](Self::open), with the reason for a refusal
    pub fn try_open(&self, id: ProcessId, access: AccessRights) -> ProviderResult<Handle> {
        let mut state = self.gate.lock();

        let path = match &state.selection {
            Some(selection) if selection.id == id => selection.path.clone(),
            _ => return Err(ProviderError::NotSelected(id)),
        };

        let granted = access.grant();
        let missing = access.missing_from(granted);
        if !missing.is_empty() {
            tracing::debug!(%id, requested = %access, %granted, "access narrowed");
        }

        let resource = match MappedResource::open_with(&path, self.opener.as_ref()) {
            Ok(resource) => resource.with_access(granted),
            Err(err) => {
                drop(state);
                self.sink.report(&err);
                return Err(err.into());
            }
        };

        let handle = self.handles.mint();
        let size = resource.len();
        if let Err(mut rejected) = state.table.insert(handle, resource) {
            // Minted handles are unique, so this means the table is corrupt.
            rejected.dispose();
            tracing::error!(%handle, "freshly minted handle already registered");
            return Err(ProviderError::Validation(handle));
        }

        tracing::debug!(%handle, %id, path = %path.display(), size, "opened");
        Ok(handle)
    }

    /// Close `handle`; unknown handles are ignored
    pub fn close(&self, handle: Handle) {
        let removed = self.gate.lock().table.remove(handle);
        if let Some(mut resource) = removed {
            resource.dispose();
            tracing::debug!(%handle, path = %resource.path().display(), "closed");
        }
    }

    pub fn describe(&self, handle: Handle) -> Option<HandleInfo> {
        let state = self.gate.lock();
        state.table.lookup(handle).map(|resource| HandleInfo {
            handle,
            path: resource.path().to_path_buf(),
            size: resource.len(),
            access: resource.access(),
        })
    }

    // === Memory ===

    /// Fill `buf` from `address`
    ///
    /// An out-of-range request leaves the handle open. A resource failure
    /// closes the handle and is reported to the error sink.
    pub fn read_into(&self, handle: Handle, address: u64, buf: &mut [u8]) -> ProviderResult<()> {
        self.with_resource(handle, |resource| resource.read_into(address, buf))
    }

    /// Read exactly `len` bytes from `address`
    ///
    /// Nothing is allocated until the handle and range have been checked.
    pub fn read(&self, handle: Handle, address: u64, len: usize) -> ProviderResult<Vec<u8>> {
        self.with_resource(handle, |resource| resource.read(address, len))
    }

    pub fn read_u32(&self, handle: Handle, address: u64) -> ProviderResult<u32> {
        let mut buf = [0u8; 4];
        self.read_into(handle, address, &mut buf)?;
        Ok(LE::read_u32(&buf))
    }

    pub fn read_u64(&self, handle: Handle, address: u64) -> ProviderResult<u64> {
        let mut buf = [0u8; 8];
        self.read_into(handle, address, &mut buf)?;
        Ok(LE::read_u64(&buf))
    }

    /// Run `op` on the resource behind `handle`, evicting it on a resource
    /// failure
    ///
    /// The sink is called after the lock is released, so it may call back
    /// into the provider.
    fn with_resource<T>(
        &self,
        handle: Handle,
        op: impl FnOnce(&MappedResource) -> Result<T, MapError>,
    ) -> ProviderResult<T> {
        let mut state = self.gate.lock();

        let outcome = op(state
            .table
            .lookup(handle)
            .ok_or(ProviderError::Validation(handle))?);

        match outcome {
            Ok(value) => Ok(value),
            Err(MapError::OutOfRange { offset, len, size }) => Err(ProviderError::Access {
                address: offset,
                len,
                size,
            }),
            Err(MapError::Resource(err)) => {
                Self::evict(&mut state, handle, &err);
                drop(state);
                self.sink.report(&err);
                Err(ProviderError::Resource(err))
            }
        }
    }

    /// Files are presented read-only; this always fails
    pub fn write(&self, _handle: Handle, _address: u64, _data: &[u8]) -> ProviderResult<()> {
        Err(ProviderError::Unsupported("write"))
    }

    /// One module and one section covering the file, or nothing for an
    /// unknown handle
    pub fn enumerate_modules_and_sections(&self, handle: Handle) -> ImageLayout {
        let state = self.gate.lock();
        state
            .table
            .lookup(handle)
            .map(ImageLayout::for_resource)
            .unwrap_or_default()
    }

    fn evict(state: &mut State, handle: Handle, err: &ResourceError) {
        if let Some(mut resource) = state.table.remove(handle) {
            resource.dispose();
            tracing::warn!(%handle, path = %resource.path().display(), error = %err, "evicted");
        }
    }

    // === Debugging and process control ===

    pub fn attach_debugger(&self, _id: ProcessId) -> bool {
        false
    }

    pub fn detach_debugger(&self, _id: ProcessId) {}

    /// Never blocks; a file produces no debug events
    pub fn await_debug_event(&self, _timeout: Duration) -> Option<DebugEvent> {
        None
    }

    pub fn handle_debug_event(&self, _event: &DebugEvent) {}

    pub fn set_hardware_breakpoint(
        &self,
        _id: ProcessId,
        _breakpoint: HardwareBreakpoint,
        _enable: bool,
    ) -> bool {
        false
    }

    pub fn control_process(&self, _handle: Handle, _action: ControlAction) -> bool {
        false
    }

    // === Lifecycle ===

    /// Close every handle and forget the selection
    ///
    /// Returns how many resources were released.
    pub fn shutdown(&self) -> usize {
        self.gate.lock().release_all()
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.current_selection().map(|s| s.path)
    }

    /// Select `path` and open it in one step
    pub fn open_path<P: AsRef<Path>>(&self, path: P, access: AccessRights) -> ProviderResult<Handle> {
        let selection = self.select(path.as_ref());
        self.try_open(selection.id, access)
    }
}

impl<S, E> Drop for ProcessProvider<S, E> {
    fn drop(&mut self) {
        self.gate.get_mut().release_all();
    }
}
