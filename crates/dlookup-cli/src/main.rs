//! # dlookup
//!
//! Command-line front end for the directory lookup client:
//! - `search` runs one lookup and prints the filtered results
//! - `interactive` keeps a search session open with selection and export

mod cli;
mod command;
mod interactive;
mod render;
mod search;

use clap::Parser;
use dlookup_client::LookupClient;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = dlookup_common::config::init(cli.config.as_deref())?;

    // Structured logging to stderr; stdout carries results
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.as_str().into()),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("dlookup v{} using {}", env!("CARGO_PKG_VERSION"), config.lookup.base_url);

    let client = LookupClient::new(&config.lookup)?;

    match cli.command {
        Command::Search(args) => search::run(&client, args).await,
        Command::Interactive => interactive::run(client).await,
    }
}
