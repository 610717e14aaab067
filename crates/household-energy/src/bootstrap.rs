use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `<home>/.household-energy/` exists and return it.
pub fn ensure_directories_in(home: &Path) -> anyhow::Result<PathBuf> {
    let app_dir = home.join(".household-energy");
    std::fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}

/// Ensure the standard `~/.household-energy/` directory exists.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI log-level name to a tracing filter directive.
///
/// Unrecognised names are passed through unchanged.
pub fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// A plain-text `fmt` layer appending to `path`.
pub fn file_layer<S>(path: &Path) -> anyhow::Result<fmt::Layer<S, DefaultFields, Format, Mutex<File>>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file)))
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to stderr; when `log_file` is given they are also appended to
/// that file without ANSI colours.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let log_layer = log_file.map(|path| file_layer(path)).transpose()?;

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(log_layer)
        .init();

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directories_creates_app_dir() {
        let tmp = TempDir::new().expect("tempdir");
        let dir = ensure_directories_in(tmp.path()).expect("ensure");
        assert!(dir.is_dir());
        assert_eq!(dir, tmp.path().join(".household-energy"));
    }

    #[test]
    fn test_ensure_directories_is_idempotent() {
        let tmp = TempDir::new().expect("tempdir");
        ensure_directories_in(tmp.path()).expect("first");
        ensure_directories_in(tmp.path()).expect("second");
    }

    #[test]
    fn test_filter_directive_maps_levels() {
        assert_eq!(filter_directive("DEBUG"), "debug");
        assert_eq!(filter_directive("warning"), "warn");
        assert_eq!(filter_directive("CRITICAL"), "error");
        assert_eq!(filter_directive("trace"), "trace");
    }

    #[test]
    fn test_file_layer_appends_plain_text() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("household-energy.log");
        std::fs::write(&path, "earlier run\n").expect("seed");

        let subscriber = tracing_subscriber::registry().with(file_layer(&path).expect("layer"));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("Analysed 8 rows");
        });

        let content = std::fs::read_to_string(&path).expect("read log");
        assert!(content.starts_with("earlier run\n"));
        assert!(content.contains("WARN"));
        assert!(content.contains("Analysed 8 rows"));
        assert!(!content.contains('\u{1b}'), "log file must not carry ANSI codes");
    }
}
