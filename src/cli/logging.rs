//! Logging initialization
//!
//! Log output goes to a file, never the terminal: stdout/stderr belong to
//! the interactive picker and the foreground kubectl children.

use std::path::PathBuf;

/// Initialize logging based on the debug flag
///
/// Returns the log file path if debug logging is enabled.
pub fn init_logging(debug: bool) -> Option<PathBuf> {
    if !debug {
        // Silent by default
        return None;
    }

    let log_file = tempfile::Builder::new()
        .prefix("kubenav-")
        .suffix(".log")
        .tempfile()
        .and_then(|file| file.keep().map_err(|e| e.error))
        .map(|(_, path)| path)
        .unwrap_or_else(|_| {
            std::env::temp_dir().join(format!("kubenav-{}.log", std::process::id()))
        });

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&log_file)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Could not open log file {}: {}", log_file.display(), e);
            return None;
        }
    };

    tracing_subscriber::fmt()
        .with_writer(file)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(log_file)
}
