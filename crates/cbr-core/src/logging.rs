//! Logging setup.
//!
//! Log lines go to `~/.local/state/cbr/cbr.log` so the progress lines the
//! wait loop prints on stdout stay clean; when the state directory cannot
//! be used, lines go to stderr instead.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. Returns the log file path, or
/// `None` when logging fell back to stderr.
pub fn init() -> Option<PathBuf> {
    let (writer, path) = match open_log_file() {
        Ok((file, path)) => (BoxMakeWriter::new(Mutex::new(file)), Some(path)),
        Err(_) => (BoxMakeWriter::new(io::stderr), None),
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cbr_core=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    if let Some(path) = &path {
        tracing::info!("logging to {}", path.display());
    }
    path
}

fn open_log_file() -> io::Result<(fs::File, PathBuf)> {
    let dirs = xdg::BaseDirectories::with_prefix("cbr")
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let dir = dirs.get_state_home();
    fs::create_dir_all(&dir)?;
    let path = dir.join("cbr.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    Ok((file, path))
}
