//! Structured logging for the biome map tools.
//!
//! Console output with uptime timestamps and module paths, plus a JSON log
//! file in debug builds. The level comes from `RUST_LOG` when set, otherwise
//! from the config's `debug.log_level`.

use std::path::Path;

use biomap_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "biomap.log";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - Optional directory for the JSON log file (debug builds only)
/// * `debug_build` - Whether file logging is enabled
/// * `config` - Optional configuration supplying the log level
///
/// ```no_run
/// use biomap_config::Config;
/// use biomap_log::init_logging;
///
/// let config = Config::default();
/// init_logging(None, false, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_string(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true) // the preview worker is named
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// The filter directive derived from the config, or [`DEFAULT_FILTER`].
pub fn filter_string(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.trim().to_string()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter = default_env_filter();
        assert!(format!("{}", filter).contains("info"));
    }

    #[test]
    fn test_filter_string_from_config() {
        let mut config = Config::default();
        config.debug.log_level = "biomap_preview=trace,warn".to_string();
        assert_eq!(filter_string(Some(&config)), "biomap_preview=trace,warn");
    }

    #[test]
    fn test_filter_string_falls_back_to_default() {
        let mut config = Config::default();
        config.debug.log_level = "   ".to_string();
        assert_eq!(filter_string(Some(&config)), DEFAULT_FILTER);
        assert_eq!(filter_string(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,biomap_preview=trace",
            "warn,biomap_world=debug",
            "error",
        ];

        for filter_str in &valid_filters {
            let result = filter_str.parse::<EnvFilter>();
            assert!(result.is_ok(), "Failed to parse filter: {}", filter_str);
        }
    }

    // The only test in this crate that installs the global subscriber.
    #[test]
    fn test_debug_build_writes_json_log_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("logs");
        init_logging(Some(&log_dir), true, Some(&Config::default()));

        tracing::error!(request_id = 7, "preview failed in test");

        let contents = std::fs::read_to_string(log_dir.join(LOG_FILE_NAME)).unwrap();
        let line = contents
            .lines()
            .find(|line| line.contains("preview failed in test"))
            .expect("event should be in the log file");
        assert!(line.starts_with('{'), "not JSON: {line}");
        assert!(line.contains("\"level\":\"ERROR\""));
        assert!(line.contains("\"request_id\":7"));
    }
}
