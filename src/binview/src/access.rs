//! Access Rights
//!
//! The capability set a host asks for when opening a virtual process.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested or granted capabilities on a virtual process
#[allow(clippy::struct_excessive_bools)] // One flag per host access bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessRights {
    pub read: bool,
    pub write: bool,
    pub query: bool,
    pub operation: bool,
}

impl AccessRights {
    /// Raw flag bits as exchanged with the host
    pub const RAW_READ: u32 = 0x01;
    pub const RAW_WRITE: u32 = 0x02;
    pub const RAW_QUERY: u32 = 0x04;
    pub const RAW_OPERATION: u32 = 0x08;

    pub const NONE: Self = Self {
        read: false,
        write: false,
        query: false,
        operation: false,
    };

    pub const READ: Self = Self {
        read: true,
        write: false,
        query: false,
        operation: false,
    };

    /// Everything a file-backed process can actually offer
    pub const SUPPORTED: Self = Self {
        read: true,
        write: false,
        query: true,
        operation: false,
    };

    pub fn all() -> Self {
        Self {
            read: true,
            write: true,
            query: true,
            operation: true,
        }
    }

    /// Decode host flag bits; unknown bits are ignored
    pub fn from_raw(bits: u32) -> Self {
        Self {
            read: bits & Self::RAW_READ != 0,
            write: bits & Self::RAW_WRITE != 0,
            query: bits & Self::RAW_QUERY != 0,
            operation: bits & Self::RAW_OPERATION != 0,
        }
    }

    pub fn to_raw(self) -> u32 {
        let mut bits = 0;
        if self.read {
            bits |= Self::RAW_READ;
        }
        if self.write {
            bits |= Self::RAW_WRITE;
        }
        if self.query {
            bits |= Self::RAW_QUERY;
        }
        if self.operation {
            bits |= Self::RAW_OPERATION;
        }
        bits
    }

    fn intersect(self, other: Self) -> Self {
        Self {
            read: self.read && other.read,
            write: self.write && other.write,
            query: self.query && other.query,
            operation: self.operation && other.operation,
        }
    }

    /// Rights in `self` that `granted` does not include
    pub fn missing_from(self, granted: Self) -> Self {
        Self {
            read: self.read && !granted.read,
            write: self.write && !granted.write,
            query: self.query && !granted.query,
            operation: self.operation && !granted.operation,
        }
    }

    /// What a provider grants for this request
    ///
    /// Reading is always granted, even for an empty request.
    pub fn grant(self) -> Self {
        let mut granted = self.intersect(Self::SUPPORTED);
        granted.read = true;
        granted
    }

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

impl fmt::Display for AccessRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            flag(self.read, 'r'),
            flag(self.write, 'w'),
            flag(self.query, 'q'),
            flag(self.operation, 'o')
        )
    }
}
