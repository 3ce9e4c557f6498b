//! Read command handler
//!
//! Reads bytes from the virtual process and displays them as a hex dump.

use super::{parse_access, Session};
use crate::cli::DumpFormat;
use crate::config::Config;
use anyhow::{bail, Context, Result};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Parse a hex or decimal address string
pub fn parse_address(address: &str) -> Result<u64> {
    if let Some(hex) = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).context("Invalid hex address")
    } else {
        address.parse::<u64>().context("Invalid address")
    }
}

/// Format `data` as 16-byte hex dump lines starting at `base`
pub fn hex_dump(base: u64, data: &[u8]) -> String {
    let mut out = String::new();
    for (i, chunk) in data.chunks(16).enumerate() {
        let _ = write!(out, "{:08x}  ", base + (i * 16) as u64);
        for (j, byte) in chunk.iter().enumerate() {
            let _ = write!(out, "{:02x} ", byte);
            if j == 7 {
                out.push(' ');
            }
        }
        // Pad if last line is short
        for j in chunk.len()..16 {
            out.push_str("   ");
            if j == 7 {
                out.push(' ');
            }
        }
        out.push_str(" |");
        for byte in chunk {
            let c = *byte as char;
            if c.is_ascii_graphic() || c == ' ' {
                out.push(c);
            } else {
                out.push('.');
            }
        }
        out.push_str("|\n");
    }
    out
}

/// Format little-endian words as lines of 16 bytes starting at `base`
pub fn word_dump(base: u64, width: usize, words: &[u64]) -> String {
    let per_line = 16 / width;
    let mut out = String::new();
    for (i, chunk) in words.chunks(per_line).enumerate() {
        let _ = write!(out, "{:08x} ", base + (i * 16) as u64);
        for word in chunk {
            let _ = write!(out, " {:0w$x}", word, w = width * 2);
        }
        out.push('\n');
    }
    out
}

/// Handle the Read command
pub fn handle(
    file: Option<PathBuf>,
    address: &str,
    size: usize,
    format: DumpFormat,
    access: &str,
    config: &Config,
) -> Result<()> {
    let addr = parse_address(address)?;
    let session = Session::open(file, parse_access(access)?, config)?;

    println!(
        "Reading {} bytes at {:#x} of {}:",
        size, addr, session.process.name
    );

    let width = match format {
        DumpFormat::Bytes => {
            let data = session
                .provider
                .read(session.handle, addr, size)
                .with_context(|| format!("Failed to read {} bytes at {:#x}", size, addr))?;
            print!("{}", hex_dump(addr, &data));
            return Ok(());
        }
        DumpFormat::U32 => 4,
        DumpFormat::U64 => 8,
    };

    if size % width != 0 {
        bail!("Size {} is not a multiple of the {}-byte word size", size, width);
    }

    let mut words = Vec::new();
    for index in 0..size / width {
        let at = addr
            .checked_add((index * width) as u64)
            .context("Address overflows the address space")?;
        let word = match format {
            DumpFormat::U32 => session.provider.read_u32(session.handle, at).map(u64::from),
            _ => session.provider.read_u64(session.handle, at),
        }
        .with_context(|| format!("Failed to read a {}-byte word at {:#x}", width, at))?;
        words.push(word);
    }
    print!("{}", word_dump(addr, width, &words));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x1000").unwrap(), 0x1000);
        assert_eq!(parse_address("0XfF").unwrap(), 0xff);
        assert_eq!(parse_address("4096").unwrap(), 4096);
        assert!(parse_address("0xzz").is_err());
        assert!(parse_address("-1").is_err());
    }

    #[test]
    fn test_hex_dump_full_line() {
        let data: Vec<u8> = (0x41..0x51).collect();
        let dump = hex_dump(0x10, &data);
        assert_eq!(
            dump,
            "00000010  41 42 43 44 45 46 47 48  49 4a 4b 4c 4d 4e 4f 50  |ABCDEFGHIJKLMNOP|\n"
        );
    }

    #[test]
    fn test_hex_dump_short_line_is_padded() {
        let dump = hex_dump(0, &[0x00, 0x41]);
        let line = dump.lines().next().unwrap();
        assert!(line.starts_with("00000000  00 41 "));
        assert!(line.ends_with(" |.A|"));
        assert_eq!(line.len(), hex_dump(0, &[0u8; 16]).lines().next().unwrap().len() - 14);
    }

    #[test]
    fn test_handle_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, [0x55u8; 32]).unwrap();

        let config = Config::default();
        assert!(handle(Some(path.clone()), "0x0", 16, DumpFormat::Bytes, "0x1", &config).is_ok());
        assert!(handle(Some(path.clone()), "0x10", 64, DumpFormat::Bytes, "0x1", &config).is_err());
        assert!(handle(Some(path), "0x0", usize::MAX, DumpFormat::Bytes, "0x1", &config).is_err());
    }

    #[test]
    fn test_handle_reads_words() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.bin");
        std::fs::write(&path, [0x11u8; 32]).unwrap();

        let config = Config::default();
        assert!(handle(Some(path.clone()), "0", 32, DumpFormat::U32, "0x1", &config).is_ok());
        assert!(handle(Some(path.clone()), "8", 24, DumpFormat::U64, "0x1", &config).is_ok());
        assert!(handle(Some(path.clone()), "0", 6, DumpFormat::U32, "0x1", &config).is_err());
        assert!(handle(Some(path), "16", 24, DumpFormat::U64, "0x1", &config).is_err());
    }

    #[test]
    fn test_word_dump() {
        let dump = word_dump(0x20, 4, &[0x04030201, 0xdeadbeef, 0, 1, 2]);
        assert_eq!(
            dump,
            "00000020  04030201 deadbeef 00000000 00000001\n00000030  00000002\n"
        );
        assert_eq!(word_dump(0, 8, &[1]), "00000000  0000000000000001\n");
    }
}
