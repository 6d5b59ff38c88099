use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::{DomainError, LoggingConfig};

/// Default filter directive for the crate at `level`, everything else at warn.
fn default_directive(level: &str) -> String {
    format!("macmodel_lib={},macmodel={},warn", level, level)
}

/// Initialize logging: console output, plus daily-rotated JSON files when enabled.
///
/// Returns a guard that must be kept alive for the duration of the process.
/// Calling this more than once keeps the first subscriber.
pub fn init_logging(
    logs_dir: &Path,
    config: &LoggingConfig,
) -> Result<Option<WorkerGuard>, DomainError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.level)));

    // Logs go to stderr so stdout stays clean for the resolved model.
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(env_filter);

    if !config.file_logging {
        let _ = tracing_subscriber::registry().with(console_layer).try_init();
        tracing::debug!(level = %config.level, "Logging initialized (console only)");
        return Ok(None);
    }

    fs::create_dir_all(logs_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("macmodel")
        .filename_suffix("log")
        .max_log_files(config.max_files.max(1) as usize)
        .build(logs_dir)
        .map_err(|e| DomainError::Config(format!("Failed to create log appender: {}", e)))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(EnvFilter::new(default_directive(&config.level)));

    if tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        tracing::debug!(
            logs_dir = ?logs_dir,
            level = %config.level,
            "Logging initialized with file output"
        );
    }

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(
            default_directive("debug"),
            "macmodel_lib=debug,macmodel=debug,warn"
        );
    }

    #[test]
    fn test_file_logging_creates_logs_dir() {
        let dir = tempfile::tempdir().unwrap();
        let logs_dir = dir.path().join("logs");
        let config = LoggingConfig {
            level: "debug".to_string(),
            file_logging: true,
            max_files: 2,
        };

        // A global subscriber may already be set by another test; the
        // directory and guard are still produced.
        let guard = init_logging(&logs_dir, &config).unwrap();
        assert!(guard.is_some());
        assert!(logs_dir.is_dir());
    }
}
