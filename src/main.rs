use std::fs::File;
use std::process;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use crossterm::terminal;
use tracing_subscriber::EnvFilter;

use modulo_circle::{config::AppConfig, player::Player};

/// Log filter directives; logging is off unless this is set.
const LOG_ENV: &str = "MODULO_CIRCLE_LOG";
const LOG_FILE_ENV: &str = "MODULO_CIRCLE_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "modulo-circle.log";

const USAGE: &str = "Usage: modulo-circle\n\n  r  restart    Space  pause    q/Esc  quit\n\nConfig: ~/.config/modulo-circle/config.json";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    if std::env::args().len() > 1 {
        bail!("modulo-circle takes no arguments\n\n{USAGE}");
    }

    init_logging()?;

    let config = AppConfig::load();
    let size = terminal::size().context("Failed to query terminal size")?;
    let mut player = Player::new(config, size)?;
    player.play()
}

/// The terminal belongs to the animation, so logs go to a file.
fn init_logging() -> Result<()> {
    let Ok(directives) = std::env::var(LOG_ENV) else {
        return Ok(());
    };
    let path = std::env::var(LOG_FILE_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILE.into());
    let file = File::create(&path).with_context(|| format!("Failed to create log file {path}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}
