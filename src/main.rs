//! template-bot: launch the Discord bot application

use anyhow::Result;

fn main() -> Result<()> {
    template_bot::cli::run()
}
