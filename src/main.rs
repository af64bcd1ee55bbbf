mod auth;
mod browser;
mod cli;
mod config;
mod duration;
mod error;
mod git;
mod output;
mod providers;
mod watch;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting circle-wait");
    cli.execute().await?;

    Ok(())
}
