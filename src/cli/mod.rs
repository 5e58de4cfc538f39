//! Command-line interface for template-bot
//!
//! A single launch command: resolve configuration, apply flag overrides,
//! load extensions and run the bot.

use anyhow::Result;
use clap::Parser;

mod launch;
mod utils;

pub use launch::LaunchArgs;

/// Launch this Discord bot application.
#[derive(Parser, Debug)]
#[command(name = "template-bot")]
#[command(author, version, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    launch: LaunchArgs,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    launch::run(cli.launch)
}
