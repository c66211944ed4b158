//! Tax Companion CLI — business profile checklist without the interactive UI.
//!
//! Walks the same wizard as the TUI from an answers file and/or flags and
//! prints the resulting pre-filing checklist.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
