//! Structured logging for driftfield.
//!
//! Console output goes through `tracing-subscriber`'s fmt layer with an uptime
//! timer. Debug builds can additionally write JSON lines to a log file for
//! post-mortem analysis. The level comes from `RUST_LOG`, then from the config
//! file, then from [`DEFAULT_FILTER`].

use driftfield_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// File name of the JSON log written in debug builds.
pub const LOG_FILE_NAME: &str = "driftfield.log";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - whether file logging is enabled
/// * `config` - optional configuration whose `debug.log_level` is used as the filter
///
/// ```no_run
/// use driftfield_log::init_logging;
///
/// init_logging(None, false, None);
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_string(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
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

/// The filter directive used when `RUST_LOG` is unset.
///
/// A bare level from the config (e.g. `"debug"`) still keeps the GPU crates at
/// `warn`, otherwise wgpu floods the console.
pub fn filter_string(config: Option<&Config>) -> String {
    match config.map(|c| c.debug.log_level.trim()) {
        Some(level) if !level.is_empty() && !level.contains(['=', ',']) => {
            format!("{level},wgpu=warn,naga=warn")
        }
        Some(level) if !level.is_empty() => level.to_string(),
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
        let filter_str = format!("{}", default_env_filter());
        assert!(filter_str.contains("wgpu=warn"));
        assert!(filter_str.contains("naga=warn"));
        assert!(filter_str.contains("info"));
    }

    #[test]
    fn test_filter_without_config_is_default() {
        assert_eq!(filter_string(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_bare_level_keeps_gpu_quiet() {
        let mut config = Config::default();
        config.debug.log_level = "debug".to_string();
        assert_eq!(filter_string(Some(&config)), "debug,wgpu=warn,naga=warn");
    }

    #[test]
    fn test_directive_list_used_verbatim() {
        let mut config = Config::default();
        config.debug.log_level = "warn,driftfield_sim=trace".to_string();
        assert_eq!(filter_string(Some(&config)), "warn,driftfield_sim=trace");
    }

    #[test]
    fn test_empty_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_string(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,driftfield_render=trace",
            "warn,driftfield_sim=debug,driftfield_input=trace",
            "error",
        ];

        for filter_str in &valid_filters {
            let result = EnvFilter::try_from(*filter_str);
            assert!(result.is_ok(), "Failed to parse filter: {}", filter_str);
        }
    }

    #[test]
    fn test_file_logger_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_file_path = temp_dir.path().join(LOG_FILE_NAME);
        std::fs::File::create(&log_file_path).unwrap();
        assert!(log_file_path.exists());
        assert_eq!(log_file_path.file_name().unwrap(), "driftfield.log");
    }
}
