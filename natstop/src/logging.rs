//! tracing setup. The terminal belongs to the UI, so log lines go to a file.
//!
//! `NATSTOP_LOG` sets the filter (default `info`), `NATSTOP_LOG_FILE` the
//! destination (default `$XDG_CACHE_HOME/natstop/natstop.log`).

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub fn log_path() -> PathBuf {
    if let Some(p) = std::env::var_os("NATSTOP_LOG_FILE") {
        return PathBuf::from(p);
    }
    dirs_next::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("natstop")
        .join("natstop.log")
}

fn open_log(path: &PathBuf) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Falls back to discarding output if the
/// log file cannot be opened.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("NATSTOP_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let path = log_path();
    match open_log(&path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(_) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
}
