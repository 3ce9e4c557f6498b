mod cli;
mod commands;
mod config;
mod selector;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn init_tracing(directive: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| directive.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    init_tracing(cli.log.as_deref().unwrap_or(config.log_filter()));

    match cli.command {
        Commands::Info { file, access } => {
            commands::inspect::info(file, &access, &config)?;
        }

        Commands::Read {
            address,
            size,
            file,
            format,
            access,
        } => {
            commands::read::handle(file, &address, size, format, &access, &config)?;
        }

        Commands::Layout { file, json } => {
            commands::inspect::layout(file, json, &config)?;
        }

        Commands::Configure {
            file,
            log_filter,
            show,
        } => {
            commands::configure::handle(file, log_filter, show)?;
        }
    }

    Ok(())
}
