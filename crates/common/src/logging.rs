//! Tracing subscriber setup.
//!
//! Logs go to stdout unless [`LoggingConfig::file`] names a file, in which
//! case they are appended there without ANSI colors. `RUST_LOG` takes
//! precedence over the configured level.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let (writer, ansi, file_error) = log_writer(config);

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(ansi);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish()).ok();
    } else {
        let subscriber = builder
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }

    if let Some(e) = file_error {
        tracing::warn!(error = %e, "Could not open log file, logging to stdout");
    }
}

/// Where log lines go, whether to colorize them, and why the log file was
/// skipped, if it was.
fn log_writer(config: &LoggingConfig) -> (BoxMakeWriter, bool, Option<io::Error>) {
    match config.file.as_deref().map(open_log_file) {
        Some(Ok(file)) => (BoxMakeWriter::new(Mutex::new(file)), false, None),
        Some(Err(e)) => (BoxMakeWriter::new(io::stdout), true, Some(e)),
        None => (BoxMakeWriter::new(io::stdout), true, None),
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[test]
    fn test_file_writer_appends_to_configured_path() {
        let dir = std::env::temp_dir().join("mosaic_test_logging");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("logs/mosaic.log");
        std::fs::create_dir_all(&dir).unwrap();

        let config = LoggingConfig {
            file: Some(path.clone()),
            ..LoggingConfig::default()
        };
        let (writer, ansi, error) = log_writer(&config);
        assert!(!ansi);
        assert!(error.is_none());
        writer.make_writer().write_all(b"first\n").unwrap();

        let (writer, _, _) = log_writer(&config);
        writer.make_writer().write_all(b"second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unopenable_file_falls_back_to_stdout() {
        let dir = std::env::temp_dir().join("mosaic_test_logging_blocked");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        // A directory cannot be opened as a log file.
        let config = LoggingConfig {
            file: Some(dir.clone()),
            ..LoggingConfig::default()
        };

        let (_, ansi, error) = log_writer(&config);
        assert!(ansi);
        assert!(error.is_some());
        std::fs::remove_dir_all(&dir).ok();
    }
}
