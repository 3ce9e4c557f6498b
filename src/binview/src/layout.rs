//! Synthetic Image Layout
//!
//! A file has no real modules or sections, so one of each is made up on
//! demand, both covering the whole file from address zero.

use crate::mapped::MappedResource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionType {
    Unknown,
    Private,
    Mapped,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionCategory {
    Unknown,
    Code,
    Data,
    Heap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionProtection {
    NoAccess,
    ReadOnly,
    ReadWrite,
    Execute,
}

/// A module spanning a whole virtual process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticModule {
    pub base: u64,
    pub size: u64,
    pub path: PathBuf,
}

/// A section spanning a whole virtual process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticSection {
    pub base: u64,
    pub size: u64,
    pub kind: SectionType,
    pub category: SectionCategory,
    pub protection: SectionProtection,
    pub name: String,
}

/// Modules and sections reported for one handle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLayout {
    pub modules: Vec<SyntheticModule>,
    pub sections: Vec<SyntheticSection>,
}

impl ImageLayout {
    /// Layout for an open resource
    pub fn for_resource(resource: &MappedResource) -> Self {
        let size = resource.len();
        Self {
            modules: vec![SyntheticModule {
                base: 0,
                size,
                path: resource.path().to_path_buf(),
            }],
            sections: vec![SyntheticSection {
                base: 0,
                size,
                kind: SectionType::Image,
                category: SectionCategory::Unknown,
                protection: SectionProtection::ReadOnly,
                name: String::new(),
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapped::tests::{pattern, MockBacking};

    #[test]
    fn test_layout_spans_resource() {
        let resource =
            MappedResource::from_backing("/tmp/data.bin", Box::new(MockBacking::new(pattern(1024))));
        let layout = ImageLayout::for_resource(&resource);

        assert_eq!(layout.modules.len(), 1);
        assert_eq!(layout.modules[0].base, 0);
        assert_eq!(layout.modules[0].size, 1024);
        assert_eq!(layout.modules[0].path, PathBuf::from("/tmp/data.bin"));

        assert_eq!(layout.sections.len(), 1);
        let section = &layout.sections[0];
        assert_eq!((section.base, section.size), (0, 1024));
        assert_eq!(section.kind, SectionType::Image);
        assert_eq!(section.category, SectionCategory::Unknown);
        assert_eq!(section.protection, SectionProtection::ReadOnly);
        assert!(section.name.is_empty());
    }

    #[test]
    fn test_default_layout_is_empty() {
        assert!(ImageLayout::default().is_empty());
    }
}
