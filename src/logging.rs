use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::{eyre, Result};
use tracing_subscriber::EnvFilter;

const APP_DIR: &str = "simple-storage-tui";
const LOG_FILE: &str = "simple-storage-tui.log";

/// Default log location: ~/.cache/simple-storage-tui/simple-storage-tui.log on Linux.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_DIR).join(LOG_FILE))
}

/// Send tracing output to a file, since the terminal belongs to the UI.
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init(log_file: Option<PathBuf>) -> Result<Option<PathBuf>> {
    let Some(path) = log_file.or_else(default_log_path) else {
        return Ok(None);
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("failed to initialise logging: {e}"))?;

    Ok(Some(path))
}
