//! srsgen CLI: turn project requirements into an SRS document.
//!
//! Collects free text, a PDF/text document or an `.xlsx` requirement sheet,
//! asks the generative service for an SRS and renders it to PDF.

mod commands;

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
