//! Debug and process-control request types.
//!
//! A file has nothing to suspend or break into, so the provider answers
//! every one of these requests negatively; the types exist so the contract
//! has the same shape as a real process provider's.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlAction {
    Suspend,
    Resume,
    Terminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakpointTrigger {
    Execute,
    Access,
    Write,
}

/// A hardware breakpoint request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareBreakpoint {
    pub address: u64,
    /// Debug register index (0-3)
    pub register: u8,
    pub trigger: BreakpointTrigger,
    /// Watched width in bytes (1, 2, 4 or 8)
    pub size: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContinueStatus {
    Handled,
    NotHandled,
}

/// A debug event as a host would receive it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugEvent {
    pub thread_id: u64,
    pub address: u64,
    pub status: ContinueStatus,
}
