//! Diagnostic logging.
//!
//! The terminal is owned by the user interface while the application runs, so log lines cannot
//! go to standard output. They are appended to a file chosen on the command line instead, and
//! when no file is given no subscriber is installed at all.

use std::{fs::OpenOptions, path::Path, sync::Mutex};

use color_eyre::eyre::{eyre, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "dijkstrui=info";

/// Installs the global tracing subscriber writing to `log_file`.
///
/// The verbosity follows `RUST_LOG` and falls back to [`DEFAULT_FILTER`].
///
/// # Errors
///
/// This function returns an error if the log file cannot be opened or a global subscriber has
/// already been installed.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))?;

    tracing::info!(path = %path.display(), "logging initialised");

    Ok(())
}
