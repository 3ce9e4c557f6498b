//! Core CLI definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "binview")]
#[command(about = "Inspect a file as if it were process memory", long_about = None)]
pub struct Cli {
    /// Override the log filter (e.g. "binview=debug")
    #[arg(long, global = true, env = "BINVIEW_LOG")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Display format for the read command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    /// Hex dump with ASCII column
    Bytes,
    /// Little-endian 32-bit words
    U32,
    /// Little-endian 64-bit words
    U64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the virtual process a file becomes
    #[command(visible_alias = "i")]
    Info {
        /// File to present (prompts, or uses the configured file, if omitted)
        file: Option<PathBuf>,

        /// Desired access as raw host bits (1=read 2=write 4=query 8=operation)
        #[arg(long, default_value = "0x1")]
        access: String,
    },

    /// Hex dump memory of the virtual process
    #[command(visible_alias = "r")]
    Read {
        /// Address to read from (hex with 0x prefix, or decimal)
        address: String,

        /// Number of bytes to read
        #[arg(default_value = "256")]
        size: usize,

        /// File to present (prompts, or uses the configured file, if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// How to display the bytes
        #[arg(long, value_enum, default_value_t = DumpFormat::Bytes)]
        format: DumpFormat,

        /// Desired access as raw host bits (1=read 2=write 4=query 8=operation)
        #[arg(long, default_value = "0x1")]
        access: String,
    },

    /// List the modules and sections of the virtual process
    #[command(visible_alias = "l")]
    Layout {
        /// File to present (prompts, or uses the configured file, if omitted)
        file: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set the default file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Set the default log filter
        #[arg(long)]
        log_filter: Option<String>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_read() {
        let cli = Cli::parse_from(["binview", "read", "0x10", "32", "--file", "data.bin"]);
        match cli.command {
            Commands::Read {
                address,
                size,
                file,
                format,
                access,
            } => {
                assert_eq!(address, "0x10");
                assert_eq!(size, 32);
                assert_eq!(file, Some(PathBuf::from("data.bin")));
                assert_eq!(format, DumpFormat::Bytes);
                assert_eq!(access, "0x1");
            }
            _ => panic!("expected read"),
        }
    }

    #[test]
    fn test_parse_read_words_and_access() {
        let cli = Cli::parse_from([
            "binview", "r", "0", "16", "--format", "u32", "--access", "0x5",
        ]);
        assert!(matches!(
            cli.command,
            Commands::Read {
                format: DumpFormat::U32,
                ref access,
                ..
            } if access == "0x5"
        ));
    }

    #[test]
    fn test_parse_layout_alias() {
        let cli = Cli::parse_from(["binview", "l", "data.bin", "--json"]);
        assert!(matches!(cli.command, Commands::Layout { json: true, .. }));
    }
}
