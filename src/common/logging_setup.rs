use crate::app_config::ApplicationConfig;
use env_logger::Builder;
use log::LevelFilter;

pub fn initialize_logging(config: Option<&ApplicationConfig>, cli_matches: &clap::ArgMatches) {
    let mut builder = Builder::new();

    // Determine log level from CLI, then config, then default
    let log_level_str = if cli_matches.get_flag("debug") {
        "debug".to_string()
    } else {
        config
            .and_then(|c| c.log_level.clone())
            .unwrap_or_else(|| "info".to_string())
    };

    let mut unrecognized = None;
    let level = match log_level_str.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        s => {
            unrecognized = Some(s.to_string());
            LevelFilter::Info
        }
    };
    builder.filter_level(level);
    builder.format_timestamp_millis();

    builder.try_init().unwrap_or_else(|e| {
        eprintln!("Failed to initialize logger: {}. Logging might not work as expected.", e);
    });

    if let Some(s) = unrecognized {
        log::warn!("Unrecognized log level '{}', defaulting to info.", s);
    }
}
