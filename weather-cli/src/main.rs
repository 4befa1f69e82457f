//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Validating tool input and formatting results for humans
//! - Serving the same tools to MCP clients over stdio
//! - Logging to stderr and a rolling file, so stdout only carries tool output

use clap::Parser;
use weather_core::Config;

mod cli;
mod logging;
mod server;
mod tools;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    let config = Config::load()?;

    let log_dir = config.logging.log_dir().ok();
    let _guard = logging::init(cmd.verbose, log_dir.as_deref());

    cmd.run(config).await
}
