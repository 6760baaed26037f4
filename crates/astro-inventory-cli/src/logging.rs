use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";
const DEFAULT_LOG_FILE: &str = "./logs/astro-inventory.log";

/// Log file location split into the directory the appender writes to and
/// the file name inside it.
fn log_file_location() -> (PathBuf, String) {
    let path = env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let path = Path::new(&path);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "astro-inventory.log".to_string());
    (dir, file)
}

/// Console output for humans, full records in the log file.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init_logger() -> WorkerGuard {
    let level = env::var("TRACING_LEVEL").unwrap_or_else(|_| DEFAULT_LEVEL.to_string());

    let (dir, file) = log_file_location();
    let file_appender = tracing_appender::rolling::never(&dir, &file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .compact()
                .with_target(false)
                .without_time()
                .with_ansi(true),
        )
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(EnvFilter::new(level))
        .init();

    debug!("Logging to {}", dir.join(&file).display());

    guard
}
