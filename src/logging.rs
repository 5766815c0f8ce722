//! Logging setup.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `level`. When `file` is set, logs are also written
/// to a daily-rolling file; keep the returned guard alive until exit so the
/// writer flushes.
pub fn setup_logging(level: &str, json: bool, file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_writer, guard) = match file {
        Some(path) => {
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
            let prefix = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "pulse.log".to_string());
            let appender =
                tracing_appender::rolling::daily(directory.unwrap_or(Path::new(".")), prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .with(file_writer.map(|writer| fmt::layer().json().with_ansi(false).with_writer(writer)))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .with(file_writer.map(|writer| fmt::layer().json().with_ansi(false).with_writer(writer)))
            .init();
    }

    guard
}
