//! linkpeek CLI: link-preview metadata for any URL.
//!
//! Scrapes a single page into a preview record, or serves the same
//! extraction over HTTP.

mod commands;
mod server;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
