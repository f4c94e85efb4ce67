use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::{self, LogSettings};

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber, writing to the configured log file.
///
/// Stdout belongs to the terminal UI, so nothing is logged when the file
/// cannot be opened. Returns the file in use.
pub fn init(settings: &LogSettings) -> Option<PathBuf> {
    let path = settings.file.clone().or_else(config::default_log_path)?;
    let file = match open_log_file(&path) {
        Ok(f) => f,
        Err(_) => return None,
    };

    // `RUST_LOG` wins over `log.level`.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .ok()?;

    Some(path)
}
