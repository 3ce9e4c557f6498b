//! Mapped Resources
//!
//! The owned backing behind one open virtual process: a memory-mapped file
//! plus the length it had when it was opened.

use crate::access::AccessRights;
use crate::error::{MapError, ResourceError};

use memmap2::Mmap;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Byte storage a [`MappedResource`] reads from
pub trait Backing: Send {
    /// Length of the backing in bytes
    fn size(&self) -> u64;

    /// Copy `buf.len()` bytes starting at `offset`
    ///
    /// Callers have already checked `offset + buf.len() <= self.size()`.
    fn copy_to(&self, offset: u64, buf: &mut [u8]) -> Result<(), ResourceError>;
}

/// Produces backings for paths
pub trait ResourceOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn Backing>, ResourceError>;
}

/// Read-only memory map of a file
///
/// The file handle is kept open so every read can confirm the file has not
/// shrunk underneath the mapping; touching pages past the new end of file
/// would fault the whole process.
pub struct MmapBacking {
    path: PathBuf,
    file: File,
    mmap: Mmap,
}

impl MmapBacking {
    pub fn open(path: &Path) -> Result<Self, ResourceError> {
        let path = path.to_path_buf();
        let file = File::open(&path).map_err(|source| ResourceError::Open {
            path: path.clone(),
            source,
        })?;

        let metadata = file.metadata().map_err(|source| ResourceError::Open {
            path: path.clone(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(ResourceError::NotAFile(path));
        }
        if metadata.len() == 0 {
            return Err(ResourceError::Empty(path));
        }

        // SAFETY: the map is read-only and every access first re-checks the
        // on-disk length, so shrinking the file cannot fault a read.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| ResourceError::Map {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, file, mmap })
    }

    fn current_file_len(&self) -> Result<u64, ResourceError> {
        self.file
            .metadata()
            .map(|m| m.len())
            .map_err(|source| ResourceError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

impl Backing for MmapBacking {
    fn size(&self) -> u64 {
        self.mmap.len() as u64
    }

    fn copy_to(&self, offset: u64, buf: &mut [u8]) -> Result<(), ResourceError> {
        let actual = self.current_file_len()?;
        let end = offset + buf.len() as u64;
        if actual < end {
            return Err(ResourceError::Truncated {
                path: self.path.clone(),
                expected: self.size(),
                actual,
            });
        }

        let start = offset as usize;
        let src = self
            .mmap
            .get(start..start + buf.len())
            .ok_or_else(|| ResourceError::Truncated {
                path: self.path.clone(),
                expected: end,
                actual: self.size(),
            })?;
        buf.copy_from_slice(src);
        Ok(())
    }
}

/// Opens files with [`MmapBacking`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MmapOpener;

impl ResourceOpener for MmapOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn Backing>, ResourceError> {
        Ok(Box::new(MmapBacking::open(path)?))
    }
}

/// One open virtual process's backing and its fixed length
pub struct MappedResource {
    path: PathBuf,
    len: u64,
    access: AccessRights,
    backing: Option<Box<dyn Backing>>,
}

impl MappedResource {
    /// Memory-map `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ResourceError> {
        Self::open_with(path, &MmapOpener)
    }

    /// Open `path` through a specific opener
    pub fn open_with<P: AsRef<Path>>(
        path: P,
        opener: &dyn ResourceOpener,
    ) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let backing = opener.open(path)?;
        Ok(Self::from_backing(path, backing))
    }

    /// Wrap an already-open backing
    pub fn from_backing<P: Into<PathBuf>>(path: P, backing: Box<dyn Backing>) -> Self {
        Self {
            path: path.into(),
            len: backing.size(),
            access: AccessRights::READ,
            backing: Some(backing),
        }
    }

    pub(crate) fn with_access(mut self, access: AccessRights) -> Self {
        self.access = access;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Length recorded at open; never changes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Rights granted when this resource was opened
    pub fn access(&self) -> AccessRights {
        self.access
    }

    pub fn is_disposed(&self) -> bool {
        self.backing.is_none()
    }

    fn backing(&self) -> Result<&dyn Backing, ResourceError> {
        self.backing
            .as_deref()
            .ok_or_else(|| ResourceError::Released(self.path.clone()))
    }

    /// Fail unless `len` bytes from `offset` lie inside the resource
    fn check_range(&self, offset: u64, len: usize) -> Result<(), MapError> {
        let in_range = u64::try_from(len)
            .ok()
            .and_then(|len| offset.checked_add(len))
            .is_some_and(|end| end <= self.len);
        if !in_range {
            return Err(MapError::OutOfRange {
                offset,
                len,
                size: self.len,
            });
        }
        Ok(())
    }

    /// Fill `buf` from `offset`
    pub fn read_into(&self, offset: u64, buf: &mut [u8]) -> Result<(), MapError> {
        let backing = self.backing()?;
        self.check_range(offset, buf.len())?;
        backing.copy_to(offset, buf)?;
        Ok(())
    }

    /// Read exactly `len` bytes from `offset`
    ///
    /// The range is checked before anything is allocated.
    pub fn read(&self, offset: u64, len: usize) -> Result<Vec<u8>, MapError> {
        let backing = self.backing()?;
        self.check_range(offset, len)?;
        let mut buf = vec![0u8; len];
        backing.copy_to(offset, &mut buf)?;
        Ok(buf)
    }

    /// Release the backing
    ///
    /// Returns false when it was already released.
    pub fn dispose(&mut self) -> bool {
        self.backing.take().is_some()
    }
}

impl fmt::Debug for MappedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedResource")
            .field("path", &self.path)
            .field("len", &self.len)
            .field("access", &self.access)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
