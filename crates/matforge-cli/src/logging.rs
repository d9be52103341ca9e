//! Subscriber setup for the `matforge` binary.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error>;

fn open_log_file(path: &str) -> Result<File, BoxError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| format!("Failed to open log file: {err}").into())
}

fn map_init_err<E: std::fmt::Display>(err: E) -> BoxError {
    format!("Failed to initialize logging: {err}").into()
}

/// Filter for `level`, or `MATFORGE_TRACE`, or `warn`.
pub fn resolve_filter(level: Option<&str>) -> Result<EnvFilter, BoxError> {
    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var("MATFORGE_TRACE").ok())
        .unwrap_or_else(|| "warn".to_string());

    if level_value.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()));
    }
    EnvFilter::try_new(&level_value).map_err(|err| format!("Invalid log filter: {err}").into())
}

/// Install the global subscriber. Logs always go to stderr.
///
/// `MATFORGE_LOG_FORMAT` picks `pretty` (default) or `json`;
/// `MATFORGE_LOG_FILE` adds an appending file sink. Returns false when a
/// subscriber is already installed.
pub fn init(level: Option<&str>) -> Result<bool, BoxError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let filter = resolve_filter(level)?;
    let format = env::var("MATFORGE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let log_file = env::var("MATFORGE_LOG_FILE").ok();
    let use_json = format.eq_ignore_ascii_case("json");

    if !use_json && !format.eq_ignore_ascii_case("pretty") {
        return Err("Invalid MATFORGE_LOG_FORMAT (expected 'json' or 'pretty')".into());
    }

    if use_json {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .json();
        let base = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer);
        if let Some(path) = log_file {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(open_log_file(&path)?)
                .with_ansi(false)
                .json();
            base.with(file_layer).try_init().map_err(map_init_err)?;
        } else {
            base.try_init().map_err(map_init_err)?;
        }
    } else {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .pretty();
        let base = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer);
        if let Some(path) = log_file {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(open_log_file(&path)?)
                .with_ansi(false)
                .pretty();
            base.with(file_layer).try_init().map_err(map_init_err)?;
        } else {
            base.try_init().map_err(map_init_err)?;
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::resolve_filter;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn explicit_level_wins() {
        let filter = resolve_filter(Some("debug")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn off_disables_everything() {
        let filter = resolve_filter(Some("OFF")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::OFF));
    }

    #[test]
    fn malformed_filter_is_an_error() {
        assert!(resolve_filter(Some("matforge=loud")).is_err());
    }
}
