//! File-backed `tracing` setup.
//!
//! The terminal belongs to the TUI, so log lines go to a file instead of
//! stderr. `RUST_LOG` overrides `logging.level` when set.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::Settings;

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns the log file in use, or `None`
/// when no file could be opened (logging is then off).
pub fn init(settings: &Settings) -> Option<PathBuf> {
    let path = settings.log_path()?;
    let file = match open_log_file(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("calmride: cannot open log file {}: {e}", path.display());
            return None;
        }
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_line_number(true)
        .with_target(false)
        .with_file(true);

    tracing_subscriber::registry()
        .with(env_filter(&settings.logging.level))
        .with(fmt_layer)
        .try_init()
        .ok()?;

    Some(path)
}

#[cfg(test)]
mod tests;
