//! Tax Companion TUI — interactive terminal wizard.
//!
//! Walks through the business questions one step at a time, keeps a
//! transcript, and shows the derived pre-filing checklist, built with
//! `ratatui` + `crossterm`.

mod app;
mod screens;
mod widgets;

use std::sync::Mutex;

use color_eyre::eyre::Result;
use taxcompanion_shared::{AppConfig, load_config, tui_log_path};

fn main() -> Result<()> {
    color_eyre::install()?;
    let config = load_config()?;
    init_tracing(&config)?;
    app::run(config)
}

/// Log to the configured file; the terminal itself belongs to the UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let Some(path) = tui_log_path(config)? else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("taxcompanion=info"));

    fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
