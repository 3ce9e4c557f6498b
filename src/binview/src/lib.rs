//! # binview
//!
//! Present an ordinary file as the addressable memory of a virtual process,
//! for hosts built around inspecting live process memory.
//!
//! A host asks the provider for the available processes (a path selector
//! supplies one file), opens the one it was offered, then reads from it by
//! address for as long as it likes. The provider:
//! - never hands out a handle it cannot serve,
//! - closes a handle the moment its backing fails, and
//! - serializes every operation behind one lock, so it can be shared freely
//!   between threads.
//!
//! ## Example
//!
//! ```no_run
//! use binview::{AccessRights, FixedPath, ProcessProvider, TracingSink};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = ProcessProvider::new(FixedPath::new("dump.bin"), TracingSink);
//!
//! let available = provider.enumerate_available();
//! let handle = provider.open(available[0].id, AccessRights::READ);
//!
//! let header = provider.read(handle, 0, 64)?;
//! println!("{:02x?}", header);
//!
//! let layout = provider.enumerate_modules_and_sections(handle);
//! println!("image size: {}", layout.modules[0].size);
//!
//! provider.close(handle);
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod control;
pub mod error;
pub mod handle;
pub mod layout;
pub mod mapped;
pub mod provider;
pub mod selection;
pub mod sink;
pub mod table;

#[doc(inline)]
pub use access::AccessRights;
#[doc(inline)]
pub use control::{BreakpointTrigger, ContinueStatus, ControlAction, DebugEvent, HardwareBreakpoint};
#[doc(inline)]
pub use error::{MapError, ProviderError, ProviderResult, ResourceError};
#[doc(inline)]
pub use handle::Handle;
#[doc(inline)]
pub use layout::{
    ImageLayout, SectionCategory, SectionProtection, SectionType, SyntheticModule,
    SyntheticSection,
};
#[doc(inline)]
pub use mapped::{Backing, MappedResource, MmapBacking, MmapOpener, ResourceOpener};
#[doc(inline)]
pub use provider::{HandleInfo, ProcessProvider};
#[doc(inline)]
pub use selection::{FixedPath, PathSelector, ProcessId, ProcessInfo, Selection};
#[doc(inline)]
pub use sink::{ErrorSink, TracingSink};
#[doc(inline)]
pub use table::HandleTable;
