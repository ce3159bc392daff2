use crate::models::LogSettings;
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Prefix of the rotating log files (`typesforge.YYYY-MM-DD`).
pub const LOG_PREFIX: &str = "typesforge";

/// Setup logging with a daily rotating file appender and optional console output.
///
/// `RUST_LOG` overrides the level; otherwise `debug_mode` picks debug or info.
/// Console output goes to stderr so command output on stdout stays clean.
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active
pub fn setup_logging(settings: &LogSettings, log_prefix: &str) -> Result<WorkerGuard> {
    let log_path = ensure_log_dir(&settings.log_dir)?;

    let file_appender = rolling::daily(&log_path, log_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = if settings.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false) // No ANSI codes in log files
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let console_layer = settings.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(level_filter(settings.debug_mode))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Logging is already initialized")?;

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}",
        log_path,
        log_prefix,
        settings.debug_mode,
        settings.console
    );

    Ok(guard)
}

fn level_filter(debug_mode: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug_mode {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    })
}

fn ensure_log_dir(log_dir: &str) -> Result<Utf8PathBuf> {
    let log_path = Utf8PathBuf::from(log_dir);
    if !log_path.exists() {
        fs::create_dir_all(&log_path)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_setup_logging_creates_dir() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");
        let settings = LogSettings {
            log_dir: log_dir.to_str().unwrap().to_string(),
            console: false,
            ..Default::default()
        };

        // May fail if another test installed a subscriber first; the
        // directory is created either way
        let _guard = setup_logging(&settings, "test");

        assert!(log_dir.exists());
    }

    #[test]
    fn test_ensure_log_dir_existing() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().to_str().unwrap();

        let path = ensure_log_dir(log_dir).unwrap();
        assert_eq!(path.as_str(), log_dir);
    }
}
