//! Info and layout command handlers

use super::{parse_access, Session};
use crate::config::Config;
use anyhow::{Context, Result};
use binview::{AccessRights, ImageLayout, SectionProtection};
use std::path::PathBuf;

/// Handle the Info command
pub fn info(file: Option<PathBuf>, access: &str, config: &Config) -> Result<()> {
    let requested = parse_access(access)?;
    let session = Session::open(file, requested, config)?;
    let details = session
        .provider
        .describe(session.handle)
        .context("Handle closed before it could be described")?;

    println!("Process: {}", session.process.name);
    println!("  Id:     {}", session.process.id);
    println!("  Path:   {}", details.path.display());
    println!("  Handle: {}", details.handle);
    println!("  Size:   {:#x} ({} bytes)", details.size, details.size);
    println!(
        "  Access: {} ({:#04x}, requested {} ({:#04x}))",
        details.access,
        details.access.to_raw(),
        requested,
        requested.to_raw()
    );

    Ok(())
}

/// Handle the Layout command
pub fn layout(file: Option<PathBuf>, json: bool, config: &Config) -> Result<()> {
    let session = Session::open(file, AccessRights::READ, config)?;
    let layout = session.provider.enumerate_modules_and_sections(session.handle);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&layout).context("Failed to serialize layout")?
        );
    } else {
        print!("{}", format_layout(&layout));
    }

    Ok(())
}

fn protection_str(protection: SectionProtection) -> &'static str {
    match protection {
        SectionProtection::NoAccess => "---",
        SectionProtection::ReadOnly => "r--",
        SectionProtection::ReadWrite => "rw-",
        SectionProtection::Execute => "r-x",
    }
}

/// Render a layout as a plain table
pub fn format_layout(layout: &ImageLayout) -> String {
    let mut out = String::from("Modules:\n");
    for module in &layout.modules {
        out.push_str(&format!(
            "  {:#014x}-{:#014x}  {}\n",
            module.base,
            module.base + module.size,
            module.path.display()
        ));
    }
    out.push_str("Sections:\n");
    for section in &layout.sections {
        out.push_str(&format!(
            "  {:#014x}-{:#014x}  {}  {:?}/{:?}  {}\n",
            section.base,
            section.base + section.size,
            protection_str(section.protection),
            section.kind,
            section.category,
            section.name
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_file(dir: &tempfile::TempDir, len: usize) -> PathBuf {
        let path = dir.path().join("data.bin");
        std::fs::write(&path, vec![0u8; len]).unwrap();
        path
    }

    #[test]
    fn test_format_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = session_file(&dir, 1024);
        let session = Session::open(Some(path), AccessRights::READ, &Config::default()).unwrap();
        let layout = session.provider.enumerate_modules_and_sections(session.handle);

        let text = format_layout(&layout);
        assert!(text.contains("0x000000000000-0x000000000400"));
        assert!(text.contains("r--  Image/Unknown"));
    }

    #[test]
    fn test_info_and_layout_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = session_file(&dir, 64);
        assert!(info(Some(path.clone()), "0x1", &Config::default()).is_ok());
        assert!(info(Some(path.clone()), "0xf", &Config::default()).is_ok());
        assert!(info(Some(path.clone()), "bad", &Config::default()).is_err());
        assert!(layout(Some(path.clone()), true, &Config::default()).is_ok());
        assert!(layout(Some(path), false, &Config::default()).is_ok());
    }
}
